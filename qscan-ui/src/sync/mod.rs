//! Synchronization controller
//!
//! Pairs the local cache with the remote store and owns the sync-in-flight
//! signal. The controller favors availability over strict consistency:
//! local reads and writes always complete first, and the remote is
//! authoritative only when it demonstrably has data. Concurrent pushes are
//! neither queued nor cancelled; they race and the last write to land wins.

pub mod remote;

pub use remote::{RemoteStore, SyncError};

use crate::db::cache;
use qscan_common::events::AppEvent;
use qscan_common::records::RecordSet;
use qscan_common::Result;
use sqlx::{Pool, Sqlite};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Which operator action triggered a remote push.
///
/// A failed push after a load surfaces a distinct operator warning; a
/// failed push after a clear is logged only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushKind {
    Load,
    Clear,
}

/// Orchestrates the local cache and the remote store client
pub struct SyncController {
    db: Pool<Sqlite>,
    remote: RemoteStore,
    in_flight: Arc<AtomicBool>,
    event_tx: broadcast::Sender<AppEvent>,
}

impl SyncController {
    pub fn new(db: Pool<Sqlite>, remote: RemoteStore, event_tx: broadcast::Sender<AppEvent>) -> Self {
        Self {
            db,
            remote,
            in_flight: Arc::new(AtomicBool::new(false)),
            event_tx,
        }
    }

    /// Whether a remote operation is currently outstanding (UI feedback
    /// only, irrelevant to correctness)
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn set_in_flight(&self, value: bool) {
        flag_in_flight(&self.in_flight, &self.event_tx, value);
    }

    /// Read the cached roster for immediate visibility at startup.
    ///
    /// A corrupt payload comes back as `None` (logged inside the cache
    /// layer); only a database-level failure propagates.
    pub async fn load_local(&self) -> Result<Option<RecordSet>> {
        cache::load_roster(&self.db).await
    }

    /// Write the roster to the local cache. Awaited to completion before
    /// returning; local success never depends on the remote.
    pub async fn save_local(&self, records: &RecordSet) -> Result<()> {
        cache::save_roster(&self.db, records).await
    }

    /// Remove the cached roster.
    pub async fn clear_local(&self) -> Result<()> {
        cache::clear_roster(&self.db).await
    }

    /// Remote phase of startup reconciliation.
    ///
    /// Returns the fetched roster when it should replace the observable
    /// set (fetch succeeded AND was non-empty), writing it through to the
    /// cache. Returns `None` when local data should be retained: the fetch
    /// failed (transient network trouble must not erase local data) or
    /// succeeded empty (a never-initialized remote must not wipe a
    /// populated cache).
    pub async fn fetch_remote(&self) -> Option<RecordSet> {
        self.set_in_flight(true);
        let fetched = self.remote.fetch_all().await;
        self.set_in_flight(false);

        match fetched {
            Ok(records) if records.is_empty() => {
                debug!("Remote roster is empty; keeping local data");
                None
            }
            Ok(records) => {
                info!(count = records.len(), "Adopting remote roster");
                if let Err(e) = cache::save_roster(&self.db, &records).await {
                    warn!("Failed to write fetched roster to cache: {}", e);
                }
                Some(records)
            }
            Err(e) => {
                warn!("Remote roster fetch failed; keeping local data: {}", e);
                None
            }
        }
    }

    /// Push the given roster to the remote store in a background task.
    ///
    /// Local state is never rolled back on failure. After a load, failure
    /// is surfaced to the operator as a sync warning; after a clear it is
    /// logged only (the remote may then retain stale data until some
    /// client's next successful push, a documented gap).
    pub fn spawn_push(&self, records: RecordSet, kind: PushKind) -> JoinHandle<()> {
        let remote = self.remote.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let event_tx = self.event_tx.clone();

        tokio::spawn(async move {
            flag_in_flight(&in_flight, &event_tx, true);
            let result = remote.replace_all(&records).await;
            flag_in_flight(&in_flight, &event_tx, false);

            if let Err(e) = result {
                match kind {
                    PushKind::Load => {
                        warn!("Roster push failed after load: {}", e);
                        let _ = event_tx.send(AppEvent::sync_failed(
                            "Saved locally, but cloud sync failed. Other devices may not see this update.",
                        ));
                    }
                    PushKind::Clear => {
                        warn!("Remote clear failed; remote may retain stale data: {}", e);
                    }
                }
            } else {
                debug!(count = records.len(), "Roster push completed");
            }
        })
    }
}

fn flag_in_flight(
    in_flight: &AtomicBool,
    event_tx: &broadcast::Sender<AppEvent>,
    value: bool,
) {
    in_flight.store(value, Ordering::SeqCst);
    // No receivers is fine; the send result is deliberately ignored
    let _ = event_tx.send(AppEvent::sync_state_changed(value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use qscan_common::records::Record;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup() -> Arc<SyncController> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::init::create_schema(&pool).await.unwrap();

        // Unreachable remote: connection refused immediately
        let remote = RemoteStore::new("http://127.0.0.1:1/roster").unwrap();
        let (event_tx, _) = broadcast::channel(32);
        Arc::new(SyncController::new(pool, remote, event_tx))
    }

    fn roster(n: usize) -> RecordSet {
        (0..n)
            .map(|i| Record {
                employee_id: format!("{}", i),
                card_number: format!("c{}", i),
                ..Default::default()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_fetch_failure_retains_local_and_clears_flag() {
        let sync = setup().await;
        sync.save_local(&roster(5)).await.unwrap();

        assert!(sync.fetch_remote().await.is_none());
        assert!(!sync.is_in_flight());

        // Local cache untouched by the failed fetch
        assert_eq!(sync.load_local().await.unwrap(), Some(roster(5)));
    }

    #[tokio::test]
    async fn test_push_failure_after_load_emits_sync_warning() {
        let sync = setup().await;
        let mut events = sync.event_tx.subscribe();

        let handle = sync.spawn_push(roster(2), PushKind::Load);
        handle.await.unwrap();

        let mut saw_warning = false;
        while let Ok(event) = events.try_recv() {
            if matches!(event, AppEvent::SyncFailed { .. }) {
                saw_warning = true;
            }
        }
        assert!(saw_warning, "push failure after load must emit SyncFailed");
        assert!(!sync.is_in_flight());
    }

    #[tokio::test]
    async fn test_push_failure_after_clear_is_silent() {
        let sync = setup().await;
        let mut events = sync.event_tx.subscribe();

        let handle = sync.spawn_push(Vec::new(), PushKind::Clear);
        handle.await.unwrap();

        while let Ok(event) = events.try_recv() {
            assert!(
                !matches!(event, AppEvent::SyncFailed { .. }),
                "clear push failure must not surface an operator warning"
            );
        }
    }
}
