//! Database initialization
//!
//! Opens (or creates) the local cache database and ensures its schema.
//! The cache is a single key/value table; the roster payload lives under
//! one fixed key.

use qscan_common::Result;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};
use std::path::Path;

/// Open the cache database, creating file and schema on first run.
///
/// mode=rwc: read-write, create if missing
pub async fn open_or_create(db_path: &Path) -> Result<Pool<Sqlite>> {
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Create the cache schema if it does not exist
pub async fn create_schema(db: &Pool<Sqlite>) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS app_cache (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(db)
    .await?;

    Ok(())
}
