/*
 * Responsibility
 * - PgPool の生成 (connect) と疎通確認 (ping)
 * - connect / ping は別々の timeout で囲む (遅い connect が後続の予算を食わないように)
 * - 起動時の失敗はそのまま上位へ返す (プロセス起動失敗扱い)
 */
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::config::Config;
use crate::repos::error::{RepoError, RepoResult};

pub async fn connect(config: &Config) -> RepoResult<PgPool> {
    let timeouts = &config.db_timeouts;

    let pool = tokio::time::timeout(
        timeouts.connect,
        PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(timeouts.connect)
            .connect(config.database_url.as_str()),
    )
    .await
    .map_err(|_| RepoError::Timeout("connect"))??;

    ping(&pool, timeouts.ping).await?;

    tracing::info!(
        database = %config.redacted_database_url(),
        max_connections = config.db_max_connections,
        "connected to database"
    );

    Ok(pool)
}

pub async fn ping(pool: &PgPool, budget: std::time::Duration) -> RepoResult<()> {
    tokio::time::timeout(budget, sqlx::query("SELECT 1").execute(pool))
        .await
        .map_err(|_| RepoError::Timeout("ping"))??;

    Ok(())
}
