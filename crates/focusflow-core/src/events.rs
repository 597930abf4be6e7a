use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::SessionRecord;

/// Every observable state change in the tracking loop produces an Event.
/// Host UIs subscribe via [`crate::TrackingLoop::subscribe`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TrackingStarted {
        at: DateTime<Utc>,
    },
    TrackingStopped {
        record: Option<SessionRecord>,
        at: DateTime<Utc>,
    },
    /// Usage access is missing; the loop did not start and a system
    /// settings prompt was requested.
    PermissionRequired {
        at: DateTime<Utc>,
    },
    FocusDetected {
        app_id: String,
        at: DateTime<Utc>,
    },
    DistractionDetected {
        app_id: String,
        /// Running count within the current session.
        count: u32,
        at: DateTime<Utc>,
    },
    /// Best-effort once-per-second elapsed-time push while a session is
    /// active. Display only; the committed duration is computed at stop.
    ElapsedTick {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SessionCommitted {
        record: SessionRecord,
        at: DateTime<Utc>,
    },
    /// The store append failed; the record was not persisted and is not
    /// retried.
    SessionCommitFailed {
        message: String,
        at: DateTime<Utc>,
    },
}
