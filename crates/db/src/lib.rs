//! Persistence layer: connection pool, migrations, models, repositories,
//! and the store traits the authorization code is written against.

pub mod models;
pub mod repositories;
pub mod stores;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Errors raised while preparing the database at process start.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("database health check failed: {0}")]
    Health(#[from] sqlx::Error),

    #[error("database migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// One-time startup initialization: health check, then migrations.
///
/// Called once from the binary before the listener binds. Migrations are
/// tracked by sqlx, so running this again (or from two processes at once)
/// applies nothing new.
pub async fn initialize(pool: &DbPool) -> Result<(), InitError> {
    health_check(pool).await?;
    tracing::info!("Database health check passed");

    run_migrations(pool).await?;
    tracing::info!("Database migrations applied");
    Ok(())
}
