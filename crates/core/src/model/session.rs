use crate::model::ids::SessionId;
use crate::model::question::{Answer, Question};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Mode & State ──────────────────────────────────────────────────────────────

/// Practice mode a session runs in.
///
/// The mode decides how many questions a session draws and how answers are
/// graded; the data model itself treats all modes alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Quiz,
    Study,
    Exam,
    Read,
    Write,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quiz => "quiz",
            Self::Study => "study",
            Self::Exam => "exam",
            Self::Read => "read",
            Self::Write => "write",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No session material loaded. Only the engine reports this phase;
    /// session data always starts out active.
    Idle,
    Active,
    Paused,
    Completed,
}

// ─── Configuration ─────────────────────────────────────────────────────────────

/// What to practice and how.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub track: String,
    pub framework: String,
    pub level: String,
    pub mode: Mode,
    /// Requested question count; `None` lets the selector pick the mode
    /// default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_count: Option<usize>,
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
}

fn default_shuffle() -> bool {
    true
}

impl SessionConfig {
    #[must_use]
    pub fn new(
        track: impl Into<String>,
        framework: impl Into<String>,
        level: impl Into<String>,
        mode: Mode,
    ) -> Self {
        Self {
            track: track.into(),
            framework: framework.into(),
            level: level.into(),
            mode,
            question_count: None,
            shuffle: default_shuffle(),
        }
    }

    #[must_use]
    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }
}

// ─── Question Slots ────────────────────────────────────────────────────────────

/// One question inside a session together with whatever the user answered.
///
/// The answer and its verdict live next to the question they belong to, so a
/// slot can never point at the wrong question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSlot {
    pub question: Question,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<Answer>,
    #[serde(default)]
    pub is_correct: bool,
}

impl QuestionSlot {
    #[must_use]
    pub fn new(question: Question) -> Self {
        Self {
            question,
            answer: None,
            is_correct: false,
        }
    }

    #[must_use]
    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }

    pub fn record(&mut self, answer: Option<Answer>, is_correct: bool) {
        self.answer = answer;
        self.is_correct = is_correct;
    }

    pub fn clear(&mut self) {
        self.answer = None;
        self.is_correct = false;
    }
}

// ─── Session Data ──────────────────────────────────────────────────────────────

/// Invalid material handed to [`SessionData::new`] or
/// [`SessionData::from_persisted`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SessionDataError {
    #[error("a session needs at least one question")]
    NoQuestions,
    #[error("session id must not be blank")]
    BlankId,
    #[error("current index {index} out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("persisted session cannot be idle")]
    IdleState,
    #[error("paused session is missing its pause timestamp")]
    PausedWithoutTimestamp,
    #[error("completed session is missing its completion timestamp")]
    CompletedWithoutTimestamp,
}

/// Everything one running session knows: its questions, answers, position,
/// phase, and timing.
///
/// Fields stay private so every mutation flows through methods that keep the
/// timing bookkeeping consistent. Persistence rehydrates through
/// [`SessionData::from_persisted`], which re-checks the same invariants as
/// construction.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionData {
    id: SessionId,
    config: SessionConfig,
    slots: Vec<QuestionSlot>,
    current_index: usize,
    state: SessionState,
    started_at: DateTime<Utc>,
    paused_at: Option<DateTime<Utc>>,
    total_paused: Duration,
    completed_at: Option<DateTime<Utc>>,
}

impl SessionData {
    /// Starts a fresh session over the given questions.
    ///
    /// The session begins active at the first question.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionDataError::BlankId`] or
    /// [`SessionDataError::NoQuestions`].
    pub fn new(
        id: SessionId,
        config: SessionConfig,
        questions: Vec<Question>,
        now: DateTime<Utc>,
    ) -> Result<Self, SessionDataError> {
        if id.is_blank() {
            return Err(SessionDataError::BlankId);
        }
        if questions.is_empty() {
            return Err(SessionDataError::NoQuestions);
        }
        Ok(Self {
            id,
            config,
            slots: questions.into_iter().map(QuestionSlot::new).collect(),
            current_index: 0,
            state: SessionState::Active,
            started_at: now,
            paused_at: None,
            total_paused: Duration::zero(),
            completed_at: None,
        })
    }

    /// Rebuilds a session from persisted parts, validating them first.
    ///
    /// # Errors
    ///
    /// Fails when the parts contradict each other; a snapshot that trips any
    /// of these checks is treated as corrupt by the caller.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: SessionId,
        config: SessionConfig,
        slots: Vec<QuestionSlot>,
        current_index: usize,
        state: SessionState,
        started_at: DateTime<Utc>,
        paused_at: Option<DateTime<Utc>>,
        total_paused: Duration,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Self, SessionDataError> {
        if id.is_blank() {
            return Err(SessionDataError::BlankId);
        }
        if slots.is_empty() {
            return Err(SessionDataError::NoQuestions);
        }
        if current_index >= slots.len() {
            return Err(SessionDataError::IndexOutOfRange {
                index: current_index,
                len: slots.len(),
            });
        }
        match state {
            SessionState::Idle => return Err(SessionDataError::IdleState),
            SessionState::Paused if paused_at.is_none() => {
                return Err(SessionDataError::PausedWithoutTimestamp);
            }
            SessionState::Completed if completed_at.is_none() => {
                return Err(SessionDataError::CompletedWithoutTimestamp);
            }
            _ => {}
        }
        Ok(Self {
            id,
            config,
            slots,
            current_index,
            state,
            started_at,
            paused_at,
            total_paused: total_paused.max(Duration::zero()),
            completed_at,
        })
    }

    // ─── Queries ───────────────────────────────────────────────────────────────

    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn slots(&self) -> &[QuestionSlot] {
        &self.slots
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn paused_at(&self) -> Option<DateTime<Utc>> {
        self.paused_at
    }

    #[must_use]
    pub fn total_paused(&self) -> Duration {
        self.total_paused
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state == SessionState::Active
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state == SessionState::Paused
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_answered()).count()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.total() - self.answered_count()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_correct).count()
    }

    /// Correct answers among the slots strictly before `index`.
    ///
    /// This is the running-score view: a user part-way through sees the score
    /// over the questions already passed, not over the whole session.
    #[must_use]
    pub fn correct_count_before(&self, index: usize) -> usize {
        self.slots
            .iter()
            .take(index)
            .filter(|slot| slot.is_correct)
            .count()
    }

    #[must_use]
    pub fn current_slot(&self) -> &QuestionSlot {
        &self.slots[self.current_index]
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.current_slot().question
    }

    /// Index of the first unanswered slot strictly after the current one.
    ///
    /// The scan never wraps around; a session sitting on its last question
    /// with earlier gaps gets `None`.
    #[must_use]
    pub fn next_unanswered(&self) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .skip(self.current_index + 1)
            .find(|(_, slot)| !slot.is_answered())
            .map(|(index, _)| index)
    }

    /// Index of the nearest unanswered slot strictly before the current one.
    ///
    /// Mirror of [`Self::next_unanswered`], scanning backwards without
    /// wrapping.
    #[must_use]
    pub fn previous_unanswered(&self) -> Option<usize> {
        self.slots[..self.current_index]
            .iter()
            .rposition(|slot| !slot.is_answered())
    }

    /// Time spent actively answering, with pauses subtracted.
    ///
    /// While paused the clock stands still at the moment the pause began.
    #[must_use]
    pub fn duration(&self, now: DateTime<Utc>) -> Duration {
        let end = self
            .completed_at
            .or(self.paused_at)
            .unwrap_or(now);
        (end - self.started_at - self.total_paused).max(Duration::zero())
    }

    // ─── Mutation ──────────────────────────────────────────────────────────────

    pub fn record_current(&mut self, answer: Option<Answer>, is_correct: bool) {
        self.slots[self.current_index].record(answer, is_correct);
    }

    pub fn clear_current(&mut self) {
        self.slots[self.current_index].clear();
    }

    /// Moves the cursor to `index`.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionDataError::IndexOutOfRange`] when `index` points
    /// past the last question.
    pub fn set_current_index(&mut self, index: usize) -> Result<(), SessionDataError> {
        if index >= self.slots.len() {
            return Err(SessionDataError::IndexOutOfRange {
                index,
                len: self.slots.len(),
            });
        }
        self.current_index = index;
        Ok(())
    }

    pub fn begin_pause(&mut self, now: DateTime<Utc>) {
        self.state = SessionState::Paused;
        self.paused_at = Some(now);
    }

    pub fn end_pause(&mut self, now: DateTime<Utc>) {
        if let Some(paused) = self.paused_at.take() {
            // Clock skew never counts as negative pause time.
            self.total_paused += (now - paused).max(Duration::zero());
        }
        self.state = SessionState::Active;
    }

    /// Finishes the session, folding an open pause into the total first.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        if let Some(paused) = self.paused_at.take() {
            self.total_paused += (now - paused).max(Duration::zero());
        }
        self.state = SessionState::Completed;
        self.completed_at = Some(now);
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::QuestionId;
    use crate::model::question::QuestionKind;
    use crate::time::fixed_now;

    fn question(id: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("prompt for {id}"),
            QuestionKind::Open { rubric: vec![] },
        )
    }

    fn config() -> SessionConfig {
        SessionConfig::new("frontend", "react", "junior", Mode::Quiz)
    }

    fn session(count: usize) -> SessionData {
        let questions = (0..count).map(|i| question(&format!("q-{i}"))).collect();
        SessionData::new(SessionId::new("s-1"), config(), questions, fixed_now()).unwrap()
    }

    #[test]
    fn new_session_starts_active_at_first_question() {
        let data = session(3);
        assert_eq!(data.state(), SessionState::Active);
        assert_eq!(data.current_index(), 0);
        assert_eq!(data.total(), 3);
        assert_eq!(data.answered_count(), 0);
    }

    #[test]
    fn new_rejects_blank_id_and_empty_questions() {
        let err = SessionData::new(
            SessionId::new("  "),
            config(),
            vec![question("q-0")],
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, SessionDataError::BlankId);

        let err =
            SessionData::new(SessionId::new("s-1"), config(), vec![], fixed_now()).unwrap_err();
        assert_eq!(err, SessionDataError::NoQuestions);
    }

    #[test]
    fn record_and_clear_round_trip() {
        let mut data = session(2);
        data.record_current(Some(Answer::Text("ownership moves values".into())), true);
        assert!(data.current_slot().is_answered());
        assert_eq!(data.answered_count(), 1);
        assert_eq!(data.correct_count(), 1);

        data.clear_current();
        assert!(!data.current_slot().is_answered());
        assert_eq!(data.correct_count(), 0);
    }

    #[test]
    fn skip_records_no_answer_but_counts_nothing() {
        let mut data = session(2);
        data.record_current(None, false);
        assert!(!data.current_slot().is_answered());
        assert_eq!(data.answered_count(), 0);
    }

    #[test]
    fn set_current_index_checks_bounds() {
        let mut data = session(2);
        assert!(data.set_current_index(1).is_ok());
        let err = data.set_current_index(2).unwrap_err();
        assert_eq!(err, SessionDataError::IndexOutOfRange { index: 2, len: 2 });
        assert_eq!(data.current_index(), 1);
    }

    #[test]
    fn next_unanswered_scans_forward_without_wrapping() {
        let mut data = session(4);
        data.set_current_index(1).unwrap();
        data.record_current(Some(Answer::Choice(0)), false);
        assert_eq!(data.next_unanswered(), Some(2));

        data.set_current_index(3).unwrap();
        // Index 0 stays unanswered but sits behind the cursor.
        assert_eq!(data.next_unanswered(), None);
    }

    #[test]
    fn previous_unanswered_scans_backward_without_wrapping() {
        let mut data = session(4);
        data.set_current_index(1).unwrap();
        data.record_current(Some(Answer::Choice(0)), true);
        data.set_current_index(3).unwrap();
        assert_eq!(data.previous_unanswered(), Some(2));

        data.set_current_index(0).unwrap();
        assert_eq!(data.previous_unanswered(), None);
    }

    #[test]
    fn correct_count_before_ignores_cursor_and_later_slots() {
        let mut data = session(3);
        data.record_current(Some(Answer::Choice(0)), true);
        data.set_current_index(1).unwrap();
        data.record_current(Some(Answer::Choice(0)), true);
        assert_eq!(data.correct_count_before(1), 1);
        assert_eq!(data.correct_count_before(2), 2);
        assert_eq!(data.correct_count_before(0), 0);
    }

    #[test]
    fn pause_accounting_excludes_paused_time() {
        let mut data = session(1);
        let t1 = fixed_now() + Duration::seconds(30);
        let t2 = t1 + Duration::seconds(100);
        let t3 = t2 + Duration::seconds(20);

        data.begin_pause(t1);
        assert_eq!(data.state(), SessionState::Paused);
        // While paused the duration froze at the pause instant.
        assert_eq!(data.duration(t2), Duration::seconds(30));

        data.end_pause(t2);
        assert_eq!(data.state(), SessionState::Active);
        assert_eq!(data.total_paused(), Duration::seconds(100));
        assert_eq!(data.duration(t3), Duration::seconds(50));
    }

    #[test]
    fn complete_folds_open_pause() {
        let mut data = session(1);
        let t1 = fixed_now() + Duration::seconds(10);
        let t2 = t1 + Duration::seconds(5);

        data.begin_pause(t1);
        data.complete(t2);
        assert_eq!(data.state(), SessionState::Completed);
        assert_eq!(data.completed_at(), Some(t2));
        assert_eq!(data.total_paused(), Duration::seconds(5));
        assert_eq!(data.duration(t2 + Duration::seconds(999)), Duration::seconds(10));
    }

    #[test]
    fn from_persisted_round_trips_valid_parts() {
        let mut data = session(2);
        data.record_current(Some(Answer::Choice(1)), true);
        data.set_current_index(1).unwrap();

        let restored = SessionData::from_persisted(
            data.id().clone(),
            data.config().clone(),
            data.slots().to_vec(),
            data.current_index(),
            data.state(),
            data.started_at(),
            data.paused_at(),
            data.total_paused(),
            data.completed_at(),
        )
        .unwrap();
        assert_eq!(restored, data);
    }

    #[test]
    fn from_persisted_rejects_inconsistent_parts() {
        let data = session(2);
        let bad_index = SessionData::from_persisted(
            data.id().clone(),
            data.config().clone(),
            data.slots().to_vec(),
            5,
            SessionState::Active,
            data.started_at(),
            None,
            Duration::zero(),
            None,
        )
        .unwrap_err();
        assert_eq!(bad_index, SessionDataError::IndexOutOfRange { index: 5, len: 2 });

        let bad_pause = SessionData::from_persisted(
            data.id().clone(),
            data.config().clone(),
            data.slots().to_vec(),
            0,
            SessionState::Paused,
            data.started_at(),
            None,
            Duration::zero(),
            None,
        )
        .unwrap_err();
        assert_eq!(bad_pause, SessionDataError::PausedWithoutTimestamp);

        let idle = SessionData::from_persisted(
            data.id().clone(),
            data.config().clone(),
            data.slots().to_vec(),
            0,
            SessionState::Idle,
            data.started_at(),
            None,
            Duration::zero(),
            None,
        )
        .unwrap_err();
        assert_eq!(idle, SessionDataError::IdleState);
    }

    #[test]
    fn negative_persisted_pause_clamps_to_zero() {
        let data = session(1);
        let restored = SessionData::from_persisted(
            data.id().clone(),
            data.config().clone(),
            data.slots().to_vec(),
            0,
            SessionState::Active,
            data.started_at(),
            None,
            Duration::seconds(-30),
            None,
        )
        .unwrap();
        assert_eq!(restored.total_paused(), Duration::zero());
    }
}
