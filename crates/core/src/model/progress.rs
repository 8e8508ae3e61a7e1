use crate::model::session::{Mode, SessionData};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Integer percentage of `correct` over `total`, rounded half-up.
///
/// An empty denominator scores zero rather than dividing by it.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn score_percent(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct as f64 / total as f64) * 100.0).round() as u32
}

/// Immutable outcome record of one completed session.
///
/// Entries are appended to the progress history and never touched again.
/// Serialized with camelCase keys to match the progress export document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub date: DateTime<Utc>,
    pub track: String,
    pub framework: String,
    pub level: String,
    pub mode: Mode,
    pub score_pct: u32,
    pub total: u32,
    pub correct: u32,
}

impl ProgressEntry {
    /// Summarizes a session over its whole question list, not just the slots
    /// the cursor has passed.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_session(session: &SessionData, now: DateTime<Utc>) -> Self {
        let config = session.config();
        let correct = session.correct_count();
        let total = session.total();
        Self {
            date: now,
            track: config.track.clone(),
            framework: config.framework.clone(),
            level: config.level.clone(),
            mode: config.mode,
            score_pct: score_percent(correct, total),
            total: total as u32,
            correct: correct as u32,
        }
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
