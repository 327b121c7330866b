/*
 * Responsibility
 * - users テーブル向け SQLx 操作 (読み取り専用)
 * - token 列の完全一致で 1 件を引く
 * - テーブル名は設定から受け取る (起動時に識別子として検証済み)
 */
use sqlx::{FromRow, PgPool};

use crate::config::IdentityTable;
use crate::repos::error::RepoResult;

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    // userId は不透明な文字列として扱う (uuid / text どちらの列型でも読める)
    #[sqlx(rename = "userId")]
    pub id: String,
    pub email: String,
}

pub async fn find_by_token(
    db: &PgPool,
    table: &IdentityTable,
    token: &str,
) -> RepoResult<Option<UserRow>> {
    // token の一意性は store 側の前提 (ここでは LIMIT 1 で先頭を採る)
    let sql = format!(
        r#"
        SELECT "userId"::text AS "userId", email
        FROM {}
        WHERE token = $1
        LIMIT 1
        "#,
        table.qualified()
    );

    let row = sqlx::query_as::<_, UserRow>(&sql)
        .bind(token)
        .fetch_optional(db)
        .await?;

    Ok(row)
}
