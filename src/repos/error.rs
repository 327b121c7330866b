/*
 * Responsibility
 * - repo が上位に伝える意味の定義
 * - timeout は接続・ping・クエリそれぞれ別スコープで扱う
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("db {0} timed out")]
    Timeout(&'static str),
}

pub type RepoResult<T> = Result<T, RepoError>;
