/*
 * Responsibility
 * - DB アクセス層 (pool 生成 / users 読み取り)
 */
pub mod error;
pub mod pool;
pub mod user_repo;
