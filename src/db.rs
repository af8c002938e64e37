use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePoolOptions;

pub type DbPool = sqlx::SqlitePool;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub async fn init_db(database_url: &str) -> anyhow::Result<DbPool> {
    let pool = connect_with_settings(database_url, 5, 30).await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("PRAGMA foreign_keys = ON")
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}

/// In-memory database with the schema applied, for tests.
pub async fn init_test_db() -> DbPool {
    let pool = connect_with_settings("sqlite::memory:", 1, 5)
        .await
        .expect("in-memory pool should connect");
    MIGRATOR.run(&pool).await.expect("migrations should apply");
    pool
}
