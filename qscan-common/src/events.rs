//! Event types for the QSCAN event system
//!
//! Every session mode transition and roster mutation is broadcast so the
//! presentation layer can observe state without polling.

use serde::{Deserialize, Serialize};

/// Session interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Nothing in progress; the initial mode
    Idle,
    /// Camera scanner open, waiting for a decoded token
    Scanning,
    /// A lookup resolved to a record
    Result,
    /// A lookup failed (empty roster or no match)
    Error,
}

/// QSCAN event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AppEvent {
    /// Roster replaced wholesale by an import or a remote adoption
    RosterReplaced {
        count: usize,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Roster cleared wholesale
    RosterCleared {
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Session mode changed
    ModeChanged {
        mode: Mode,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Sync in-flight flag edge (UI feedback only)
    SyncStateChanged {
        in_flight: bool,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// A remote push after a local change did not complete; the local
    /// device keeps the new data
    SyncFailed {
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl AppEvent {
    pub fn roster_replaced(count: usize) -> Self {
        AppEvent::RosterReplaced {
            count,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn roster_cleared() -> Self {
        AppEvent::RosterCleared {
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn mode_changed(mode: Mode) -> Self {
        AppEvent::ModeChanged {
            mode,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn sync_state_changed(in_flight: bool) -> Self {
        AppEvent::SyncStateChanged {
            in_flight,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn sync_failed(message: impl Into<String>) -> Self {
        AppEvent::SyncFailed {
            message: message.into(),
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_serialize_with_type_tag() {
        let json = serde_json::to_value(AppEvent::roster_replaced(3)).unwrap();
        assert_eq!(json["type"], "RosterReplaced");
        assert_eq!(json["count"], 3);

        let json = serde_json::to_value(AppEvent::mode_changed(Mode::Scanning)).unwrap();
        assert_eq!(json["type"], "ModeChanged");
        assert_eq!(json["mode"], "Scanning");
    }
}
