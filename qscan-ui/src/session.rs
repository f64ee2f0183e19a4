//! Session controller
//!
//! Owns the observable roster, the currently resolved record, and the
//! interaction mode, behind `RwLock`s for concurrent read access with rare
//! writes. All mutating entry points are invoked serially by the single
//! user-interaction surface; network propagation runs in background tasks
//! owned by the sync controller. Every transition and mutation is broadcast
//! for the presentation layer.

use crate::sync::{PushKind, RemoteStore, SyncController};
use qscan_common::events::{AppEvent, Mode};
use qscan_common::lookup::{resolve, LookupError};
use qscan_common::records::{normalize_rows, Record, RecordSet};
use qscan_common::Result;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::{Pool, Sqlite};
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::info;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Synchronously queryable view of the session state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub record_count: usize,
    pub current: Option<Record>,
    pub sync_in_flight: bool,
}

/// Session state shared across HTTP handlers
pub struct SessionController {
    records: Arc<RwLock<RecordSet>>,
    current: RwLock<Option<Record>>,
    mode: RwLock<Mode>,
    sync: Arc<SyncController>,
    event_tx: broadcast::Sender<AppEvent>,
}

impl SessionController {
    pub fn new(db: Pool<Sqlite>, remote: RemoteStore) -> Arc<Self> {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let sync = Arc::new(SyncController::new(db, remote, event_tx.clone()));

        Arc::new(Self {
            records: Arc::new(RwLock::new(Vec::new())),
            current: RwLock::new(None),
            mode: RwLock::new(Mode::Idle),
            sync,
            event_tx,
        })
    }

    /// Subscribe to session and sync events
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }

    /// Startup reconciliation.
    ///
    /// The cached roster becomes visible immediately; the remote fetch runs
    /// in a background task and replaces the observable set only when it
    /// succeeds with data (applied on arrival, even if local state changed
    /// meanwhile; last applied wins). The returned handle belongs to that
    /// background phase.
    pub async fn start(&self) -> Result<JoinHandle<()>> {
        if let Some(cached) = self.sync.load_local().await? {
            info!(count = cached.len(), "Loaded cached roster");
            *self.records.write().await = cached;
        }

        let records = Arc::clone(&self.records);
        let sync = Arc::clone(&self.sync);
        let event_tx = self.event_tx.clone();
        let handle = tokio::spawn(async move {
            if let Some(fetched) = sync.fetch_remote().await {
                let count = fetched.len();
                *records.write().await = fetched;
                let _ = event_tx.send(AppEvent::roster_replaced(count));
            }
        });

        Ok(handle)
    }

    /// Resolve a token against the current roster.
    ///
    /// A hit moves the session to `Result` mode with the record current; a
    /// miss or an empty roster moves it to `Error` mode. The error value
    /// carries the operator-facing message.
    pub async fn submit_query(&self, token: &str) -> std::result::Result<Record, LookupError> {
        let outcome = {
            let records = self.records.read().await;
            resolve(&records, token).map(Record::clone)
        };

        match outcome {
            Ok(found) => {
                *self.current.write().await = Some(found.clone());
                self.set_mode(Mode::Result).await;
                Ok(found)
            }
            Err(e) => {
                *self.current.write().await = None;
                self.set_mode(Mode::Error).await;
                Err(e)
            }
        }
    }

    /// Import raw workbook rows: normalize, then adopt and propagate.
    pub async fn load_rows(&self, rows: &[Map<String, Value>]) -> Result<usize> {
        self.load_records(normalize_rows(rows)).await
    }

    /// Adopt a new roster wholesale: local cache first (awaited), then a
    /// background push to the remote. A failed push never rolls the local
    /// state back. Resets the session to `Idle` and clears any result.
    pub async fn load_records(&self, records: RecordSet) -> Result<usize> {
        let count = records.len();

        self.sync.save_local(&records).await?;
        *self.records.write().await = records.clone();
        *self.current.write().await = None;
        self.set_mode(Mode::Idle).await;
        let _ = self.event_tx.send(AppEvent::roster_replaced(count));

        self.sync.spawn_push(records, PushKind::Load);

        info!(count, "Roster loaded");
        Ok(count)
    }

    /// Destroy the roster wholesale. The clear is complete locally once
    /// this returns; the background remote clear may still fail (logged
    /// only).
    pub async fn clear(&self) -> Result<()> {
        self.sync.clear_local().await?;
        self.records.write().await.clear();
        *self.current.write().await = None;
        self.set_mode(Mode::Idle).await;
        let _ = self.event_tx.send(AppEvent::roster_cleared());

        self.sync.spawn_push(Vec::new(), PushKind::Clear);

        info!("Roster cleared");
        Ok(())
    }

    /// Toggle the scanner: Scanning from any other mode, back to Idle when
    /// already scanning. Entering Scanning drops the current result.
    pub async fn toggle_scan(&self) -> Mode {
        let scanning = *self.mode.read().await == Mode::Scanning;
        let next = if scanning { Mode::Idle } else { Mode::Scanning };

        if next == Mode::Scanning {
            *self.current.write().await = None;
        }
        self.set_mode(next).await;
        next
    }

    /// Current session state, queryable synchronously after any operation
    /// completes its synchronous portion
    pub async fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: *self.mode.read().await,
            record_count: self.records.read().await.len(),
            current: self.current.read().await.clone(),
            sync_in_flight: self.sync.is_in_flight(),
        }
    }

    /// Clone of the current roster
    pub async fn records(&self) -> RecordSet {
        self.records.read().await.clone()
    }

    async fn set_mode(&self, mode: Mode) {
        *self.mode.write().await = mode;
        let _ = self.event_tx.send(AppEvent::mode_changed(mode));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_session() -> Arc<SessionController> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::db::init::create_schema(&pool).await.unwrap();

        // Unreachable remote; these tests exercise local behavior only
        let remote = RemoteStore::new("http://127.0.0.1:1/roster").unwrap();
        SessionController::new(pool, remote)
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
    async fn test_initial_state() {
        let session = setup_session().await;
        let snapshot = session.snapshot().await;

        assert_eq!(snapshot.mode, Mode::Idle);
        assert_eq!(snapshot.record_count, 0);
        assert!(snapshot.current.is_none());
        assert!(!snapshot.sync_in_flight);
    }

    #[tokio::test]
    async fn test_query_on_empty_roster_is_error_mode() {
        let session = setup_session().await;

        let result = session.submit_query("anything").await;
        assert_eq!(result, Err(LookupError::EmptyDataset));
        assert_eq!(session.snapshot().await.mode, Mode::Error);
    }

    #[tokio::test]
    async fn test_successful_query_sets_result_mode_and_current() {
        let session = setup_session().await;
        session.load_records(roster(3)).await.unwrap();

        let found = session.submit_query(" c1 ").await.unwrap();
        assert_eq!(found.employee_id, "1");

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.mode, Mode::Result);
        assert_eq!(snapshot.current.unwrap().employee_id, "1");
    }

    #[tokio::test]
    async fn test_failed_query_clears_current() {
        let session = setup_session().await;
        session.load_records(roster(3)).await.unwrap();
        session.submit_query("c1").await.unwrap();

        let result = session.submit_query("missing").await;
        assert_eq!(result, Err(LookupError::NotFound("missing".to_string())));

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.mode, Mode::Error);
        assert!(snapshot.current.is_none());
    }

    #[tokio::test]
    async fn test_toggle_scan_round_trip() {
        let session = setup_session().await;

        assert_eq!(session.toggle_scan().await, Mode::Scanning);
        assert_eq!(session.snapshot().await.mode, Mode::Scanning);
        assert_eq!(session.toggle_scan().await, Mode::Idle);
    }

    #[tokio::test]
    async fn test_entering_scan_from_result_drops_current() {
        let session = setup_session().await;
        session.load_records(roster(2)).await.unwrap();
        session.submit_query("c0").await.unwrap();

        assert_eq!(session.toggle_scan().await, Mode::Scanning);
        assert!(session.snapshot().await.current.is_none());
    }

    #[tokio::test]
    async fn test_load_resets_mode_and_current() {
        let session = setup_session().await;
        session.load_records(roster(2)).await.unwrap();
        session.submit_query("c0").await.unwrap();

        session.load_records(roster(5)).await.unwrap();

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.mode, Mode::Idle);
        assert_eq!(snapshot.record_count, 5);
        assert!(snapshot.current.is_none());
    }

    #[tokio::test]
    async fn test_load_survives_remote_push_failure() {
        let session = setup_session().await;
        let mut events = session.subscribe();

        let rows: Vec<Map<String, Value>> = vec![
            serde_json::json!({ "Empoyee_ID": "100", "Card_Number": "A1" }),
            serde_json::json!({ "Empoyee_ID": "200", "Card_Number": "A2" }),
        ]
        .into_iter()
        .map(|v| match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        })
        .collect();

        let count = session.load_rows(&rows).await.unwrap();
        assert_eq!(count, 2);

        // The push to the unreachable remote fails; wait for the warning
        let warned = tokio::time::timeout(std::time::Duration::from_secs(5), async {
            loop {
                match events.recv().await {
                    Ok(AppEvent::SyncFailed { .. }) => break true,
                    Ok(_) => continue,
                    Err(_) => break false,
                }
            }
        })
        .await
        .unwrap();
        assert!(warned);

        // Local state reflects the new roster after the failure
        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.record_count, 2);
        assert_eq!(session.records().await[0].employee_id, "100");
    }

    #[tokio::test]
    async fn test_clear_empties_roster_and_cache() {
        let session = setup_session().await;
        session.load_records(roster(4)).await.unwrap();

        session.clear().await.unwrap();

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.record_count, 0);
        assert_eq!(snapshot.mode, Mode::Idle);

        // Subsequent lookups see the empty roster
        assert_eq!(
            session.submit_query("c0").await,
            Err(LookupError::EmptyDataset)
        );
    }

    #[tokio::test]
    async fn test_startup_with_failing_remote_keeps_cached_roster() {
        let session = setup_session().await;
        // Seed the cache through the normal load path, then simulate a
        // fresh session over the same database
        session.load_records(roster(5)).await.unwrap();

        let handle = session.start().await.unwrap();
        handle.await.unwrap();

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.record_count, 5);
        assert!(!snapshot.sync_in_flight);
    }
}
