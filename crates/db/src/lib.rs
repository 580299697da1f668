//! PostgreSQL persistence for templates, layouts, shapes and their geometry.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod representation;
pub mod repositories;

pub use error::DbError;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Whether the `shape_kinds` lookup rows match the in-code kind registry.
pub async fn registry_in_sync(pool: &DbPool) -> Result<bool, sqlx::Error> {
    let rows: Vec<(i16, String, String)> =
        sqlx::query_as("SELECT id, name, wire_type FROM shape_kinds ORDER BY id")
            .fetch_all(pool)
            .await?;

    let mut expected: Vec<(i16, &str, &str)> = uptemplate_core::registry::REGISTRY
        .iter()
        .map(|e| (e.kind.tag(), e.name, e.wire_type))
        .collect();
    expected.sort_unstable();

    let stored: Vec<(i16, &str, &str)> = rows
        .iter()
        .map(|(id, name, wire)| (*id, name.as_str(), wire.as_str()))
        .collect();
    Ok(stored == expected)
}

/// Apply the embedded migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
