use drill_core::model::{SessionData, score_percent};
use serde::{Deserialize, Serialize};

/// Running-score view of a session in flight, useful for UI.
///
/// Computed on demand from the slots, never stored, so it cannot drift from
/// the answers it summarizes. `correct` and `score` cover only the questions
/// behind the cursor; the final score over everything comes from the
/// completion path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionProgress {
    pub current: usize,
    pub total: usize,
    pub correct: usize,
    pub score: u32,
}

impl SessionProgress {
    #[must_use]
    pub fn from_session(session: &SessionData) -> Self {
        let current = session.current_index();
        let correct = session.correct_count_before(current);
        Self {
            current,
            total: session.total(),
            correct,
            score: score_percent(correct, current),
        }
    }
}
