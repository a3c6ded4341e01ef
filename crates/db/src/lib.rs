//! PostgreSQL persistence for interview queues.
//!
//! Row models live in [`models`]; each table is accessed through a
//! zero-sized repository in [`repositories`].

use std::time::Duration;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

pub mod error;
pub mod models;
pub mod repositories;

pub use error::RepoError;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
///
/// `storage_timeout` bounds pool acquisition and is installed as the
/// session `statement_timeout` and `lock_timeout`, so no storage call can
/// block indefinitely (a queue lock held too long surfaces as `55P03`).
pub async fn create_pool(
    database_url: &str,
    storage_timeout: Duration,
) -> Result<DbPool, sqlx::Error> {
    let timeout_ms = storage_timeout.as_millis().to_string();
    let options = database_url
        .parse::<PgConnectOptions>()?
        .options([
            ("statement_timeout", timeout_ms.as_str()),
            ("lock_timeout", timeout_ms.as_str()),
        ]);

    PgPoolOptions::new()
        .max_connections(20)
        .acquire_timeout(storage_timeout)
        .connect_with(options)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
