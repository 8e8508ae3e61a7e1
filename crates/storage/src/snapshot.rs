use crate::repository::{CURRENT_SESSION_KEY, KeyValueStore, StorageError};
use chrono::{DateTime, Duration, Utc};
use drill_core::model::{
    QuestionSlot, SessionConfig, SessionData, SessionDataError, SessionId, SessionState,
};
use serde::{Deserialize, Serialize};

/// Persisted shape of a session in flight.
///
/// Mirrors the domain `SessionData` so serialization details stay out of the
/// domain layer. Dates are RFC 3339 strings on the wire; the pause total is
/// flattened to milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub config: SessionConfig,
    pub slots: Vec<QuestionSlot>,
    pub current_index: usize,
    pub state: SessionState,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub total_paused_ms: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    #[must_use]
    pub fn from_session(session: &SessionData) -> Self {
        Self {
            session_id: session.id().clone(),
            config: session.config().clone(),
            slots: session.slots().to_vec(),
            current_index: session.current_index(),
            state: session.state(),
            started_at: session.started_at(),
            paused_at: session.paused_at(),
            total_paused_ms: session.total_paused().num_milliseconds(),
            completed_at: session.completed_at(),
        }
    }

    /// Convert the snapshot back into domain session data.
    ///
    /// # Errors
    ///
    /// Returns `SessionDataError` when the recorded parts contradict each
    /// other; callers treat that as a corrupt snapshot.
    pub fn into_session(self) -> Result<SessionData, SessionDataError> {
        SessionData::from_persisted(
            self.session_id,
            self.config,
            self.slots,
            self.current_index,
            self.state,
            self.started_at,
            self.paused_at,
            Duration::milliseconds(self.total_paused_ms),
            self.completed_at,
        )
    }
}

/// Writes the session snapshot under the well-known key.
///
/// # Errors
///
/// Returns `StorageError` when encoding or the write fails.
pub fn save_session(store: &dyn KeyValueStore, session: &SessionData) -> Result<(), StorageError> {
    let payload = serde_json::to_string(&SessionSnapshot::from_session(session))
        .map_err(|e| StorageError::Serialization(e.to_string()))?;
    store.put(CURRENT_SESSION_KEY, &payload)
}

/// Reads back the saved session, if a trustworthy one exists.
///
/// A missing key is `Ok(None)`. An unreadable or self-contradictory payload
/// is also `Ok(None)`: the stale key is removed so the next load starts
/// clean, and the incident is logged rather than raised.
///
/// # Errors
///
/// Returns `StorageError` only when the backend itself cannot be accessed.
pub fn load_session(store: &dyn KeyValueStore) -> Result<Option<SessionData>, StorageError> {
    let Some(raw) = store.get(CURRENT_SESSION_KEY)? else {
        return Ok(None);
    };
    let snapshot: SessionSnapshot = match serde_json::from_str(&raw) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            tracing::warn!(error = %err, "discarding unreadable session snapshot");
            store.remove(CURRENT_SESSION_KEY)?;
            return Ok(None);
        }
    };
    match snapshot.into_session() {
        Ok(session) => Ok(Some(session)),
        Err(err) => {
            tracing::warn!(error = %err, "discarding inconsistent session snapshot");
            store.remove(CURRENT_SESSION_KEY)?;
            Ok(None)
        }
    }
}

/// Removes the saved session, reporting whether one was present.
///
/// # Errors
///
/// Returns `StorageError` when the backend cannot be written.
pub fn clear_session(store: &dyn KeyValueStore) -> Result<bool, StorageError> {
    store.remove(CURRENT_SESSION_KEY)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
