//! Roster cache access
//!
//! The whole roster is stored wholesale as one JSON array under a fixed
//! key. There is no per-record versioning; every save overwrites the
//! previous payload. A payload that fails to decode is treated the same as
//! an absent one (logged, never surfaced) so a corrupt cache cannot take
//! the service down.

use qscan_common::records::{RecordSet, STORAGE_KEY};
use qscan_common::{Error, Result};
use sqlx::{Pool, Sqlite};
use tracing::warn;

/// Save the roster wholesale, overwriting any previous payload.
///
/// The write is awaited to completion before this returns; cache writes
/// cannot race each other within one process.
pub async fn save_roster(db: &Pool<Sqlite>, records: &RecordSet) -> Result<()> {
    let payload = serde_json::to_string(records)
        .map_err(|e| Error::Internal(format!("Failed to encode roster: {}", e)))?;

    sqlx::query(
        r#"
        INSERT INTO app_cache (key, value)
        VALUES (?, ?)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value
        "#,
    )
    .bind(STORAGE_KEY)
    .bind(payload)
    .execute(db)
    .await?;

    Ok(())
}

/// Load the cached roster.
///
/// Returns `None` when no payload was ever saved, and also when the stored
/// payload fails to decode; the decode failure is logged and otherwise
/// indistinguishable from an absent cache.
pub async fn load_roster(db: &Pool<Sqlite>) -> Result<Option<RecordSet>> {
    let value: Option<String> = sqlx::query_scalar("SELECT value FROM app_cache WHERE key = ?")
        .bind(STORAGE_KEY)
        .fetch_optional(db)
        .await?;

    match value {
        Some(payload) => match serde_json::from_str::<RecordSet>(&payload) {
            Ok(records) => Ok(Some(records)),
            Err(e) => {
                warn!("Cached roster payload is unreadable, treating as absent: {}", e);
                Ok(None)
            }
        },
        None => Ok(None),
    }
}

/// Remove the cached roster entirely. Idempotent.
pub async fn clear_roster(db: &Pool<Sqlite>) -> Result<()> {
    sqlx::query("DELETE FROM app_cache WHERE key = ?")
        .bind(STORAGE_KEY)
        .execute(db)
        .await?;

    Ok(())
}
