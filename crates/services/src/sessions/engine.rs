use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use drill_core::Clock;
use drill_core::evaluate::Evaluator;
use drill_core::model::{
    Answer, AnswerResult, ProgressEntry, Question, SessionConfig, SessionData, SessionId,
    SessionState,
};
use storage::KeyValueStore;

use crate::content::ContentSource;
use crate::custom_store::CustomQuestionStore;
use crate::error::SessionError;
use crate::selector::QuestionSelector;
use crate::sessions::achievements::{self, Achievement};
use crate::sessions::progress::SessionProgress;

//
// ─── SESSION OUTCOME ───────────────────────────────────────────────────────────
//

/// What finishing a session produces: the permanent history record plus the
/// badges earned along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionOutcome {
    pub progress_entry: ProgressEntry,
    pub achievements: Vec<Achievement>,
}

//
// ─── SESSION ENGINE ────────────────────────────────────────────────────────────
//

/// Owns at most one live session and walks it through
/// `Idle -> Active <-> Paused -> Completed`.
///
/// Every method runs synchronously to completion and either performs its
/// whole effect or returns an error with nothing changed. One engine serves
/// one user; concurrent use needs one engine per user, with the `&mut self`
/// receivers keeping a single engine single-mutator by construction.
pub struct SessionEngine {
    clock: Clock,
    content: Arc<dyn ContentSource>,
    store: Arc<dyn KeyValueStore>,
    evaluator: Evaluator,
    session: Option<SessionData>,
    history: Vec<ProgressEntry>,
}

impl SessionEngine {
    #[must_use]
    pub fn new(content: Arc<dyn ContentSource>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            clock: Clock::default(),
            content,
            store,
            evaluator: Evaluator::default(),
            session: None,
            history: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self
    }

    // ─── Accessors ─────────────────────────────────────────────────────────────

    /// Engine phase; `Idle` whenever no session material is loaded.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map_or(SessionState::Idle, SessionData::state)
    }

    #[must_use]
    pub fn session(&self) -> Option<&SessionData> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn history(&self) -> &[ProgressEntry] {
        &self.history
    }

    #[must_use]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    /// Mutable clock access, for embedders driving deterministic time.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    /// The question under the cursor, in any non-idle state.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::NoSession`] when idle.
    pub fn current_question(&self) -> Result<&Question, SessionError> {
        Ok(self.session_ref()?.current_question())
    }

    /// Running-score view over the questions already passed.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::NoSession`] when idle.
    pub fn session_progress(&self) -> Result<SessionProgress, SessionError> {
        Ok(SessionProgress::from_session(self.session_ref()?))
    }

    /// Time spent actively answering; pauses never count, and the value
    /// freezes once the session completes.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::NoSession`] when idle.
    pub fn session_duration(&self) -> Result<Duration, SessionError> {
        Ok(self.session_ref()?.duration(self.clock.now()))
    }

    // ─── Lifecycle ─────────────────────────────────────────────────────────────

    /// Builds a fresh session from `config`, drawing on stock content plus
    /// the matching custom questions. Allowed from any state; an unfinished
    /// session is discarded without reaching history.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::EmptySelection`] when nothing matches the
    /// configuration; the previous session, if any, stays loaded untouched.
    pub fn start_session(
        &mut self,
        config: SessionConfig,
        custom: &CustomQuestionStore,
    ) -> Result<(), SessionError> {
        let pool = custom.for_selection(&config.track, &config.framework, &config.level);
        let questions = QuestionSelector::new(self.content.as_ref()).select(&config, &pool);
        if questions.is_empty() {
            return Err(SessionError::EmptySelection);
        }
        if let Some(old) = &self.session {
            if !old.is_completed() {
                tracing::debug!(session = %old.id(), "discarding unfinished session on new start");
            }
        }
        let data = SessionData::new(SessionId::generate(), config, questions, self.clock.now())?;
        self.session = Some(data);
        Ok(())
    }

    /// Suspends an active session; time stops counting until resume.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::NotActive`] unless the session is active.
    pub fn pause_session(&mut self) -> Result<(), SessionError> {
        let now = self.clock.now();
        let data = self.active_session_mut()?;
        data.begin_pause(now);
        Ok(())
    }

    /// Resumes a paused session, folding the pause into the excluded total.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::NotPaused`] unless the session is paused.
    pub fn resume_session(&mut self) -> Result<(), SessionError> {
        let now = self.clock.now();
        let data = self.session.as_mut().ok_or(SessionError::NoSession)?;
        if !data.is_paused() {
            return Err(SessionError::NotPaused { state: data.state() });
        }
        data.end_pause(now);
        Ok(())
    }

    /// Completes the session, appends its record to history, and reports the
    /// outcome with any badges earned. Valid from any state with a session
    /// that has not completed yet; an open pause is folded in first.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::NoSession`] or
    /// [`SessionError::AlreadyCompleted`].
    pub fn finish_session(&mut self) -> Result<SessionOutcome, SessionError> {
        let now = self.clock.now();
        let data = self.session.as_mut().ok_or(SessionError::NoSession)?;
        if data.is_completed() {
            return Err(SessionError::AlreadyCompleted);
        }
        data.complete(now);
        let progress_entry = ProgressEntry::from_session(data, now);
        let achievements = achievements::evaluate(data, data.duration(now));
        self.history.push(progress_entry.clone());
        tracing::debug!(
            session = %data.id(),
            score = progress_entry.score_pct,
            badges = achievements.len(),
            "session finished"
        );
        Ok(SessionOutcome {
            progress_entry,
            achievements,
        })
    }

    /// Returns to idle. With `save_to_history` set, an unfinished session
    /// leaves a partial record behind; a completed one was already recorded
    /// by [`Self::finish_session`] and is not recorded twice.
    pub fn reset_session(&mut self, save_to_history: bool) {
        if let Some(data) = self.session.take() {
            if save_to_history && !data.is_completed() {
                self.history.push(ProgressEntry::from_session(&data, self.clock.now()));
            }
        }
    }

    /// Rebuilds a fresh session from the current configuration; progress so
    /// far is discarded.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::NoSession`] when idle, or with
    /// [`SessionError::EmptySelection`] when the configuration no longer
    /// matches anything; the running session survives a failed restart.
    pub fn restart_session(&mut self, custom: &CustomQuestionStore) -> Result<(), SessionError> {
        let config = self.session_ref()?.config().clone();
        self.start_session(config, custom)
    }

    /// Drops any session and the saved snapshot, unconditionally.
    ///
    /// # Errors
    ///
    /// Fails only when the snapshot cannot be removed from the store; the
    /// in-memory session is gone regardless.
    pub fn force_reset(&mut self) -> Result<(), SessionError> {
        self.session = None;
        storage::clear_session(self.store.as_ref())?;
        Ok(())
    }

    // ─── Answering ─────────────────────────────────────────────────────────────

    /// Grades `answer` against the current question and records it.
    ///
    /// An invalid submission (blank text, out-of-range choice, wrong answer
    /// shape) comes back as `Ok` with `is_valid == false` and records
    /// nothing; it is the answer that is rejected, not the call.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::NotActive`] unless the session is active.
    pub fn submit_answer(&mut self, answer: Answer) -> Result<AnswerResult, SessionError> {
        let data = self.session.as_mut().ok_or(SessionError::NoSession)?;
        if !data.is_active() {
            return Err(SessionError::NotActive { state: data.state() });
        }
        let result = self.evaluator.evaluate(data.current_question(), &answer);
        if result.is_valid {
            data.record_current(Some(answer), result.is_correct);
        }
        Ok(result)
    }

    /// Marks the current slot as skipped by clearing it. The cursor stays
    /// put; moving on is a separate navigation call.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::NotActive`] unless the session is active.
    pub fn skip_question(&mut self) -> Result<(), SessionError> {
        self.active_session_mut()?.clear_current();
        Ok(())
    }

    // ─── Navigation ────────────────────────────────────────────────────────────

    /// Advances the cursor, returning the new index.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::AtLastQuestion`] at the end, cursor
    /// unchanged.
    pub fn next_question(&mut self) -> Result<usize, SessionError> {
        let data = self.active_session_mut()?;
        let index = data.current_index();
        if index + 1 >= data.total() {
            return Err(SessionError::AtLastQuestion { index });
        }
        data.set_current_index(index + 1)?;
        Ok(index + 1)
    }

    /// Steps the cursor back, returning the new index.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::AtFirstQuestion`] at the start, cursor
    /// unchanged.
    pub fn previous_question(&mut self) -> Result<usize, SessionError> {
        let data = self.active_session_mut()?;
        let index = data.current_index();
        if index == 0 {
            return Err(SessionError::AtFirstQuestion { index });
        }
        data.set_current_index(index - 1)?;
        Ok(index - 1)
    }

    /// Moves the cursor to an arbitrary index.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::IndexOutOfRange`], cursor unchanged.
    pub fn jump_to(&mut self, index: usize) -> Result<usize, SessionError> {
        let data = self.active_session_mut()?;
        let len = data.total();
        data.set_current_index(index)
            .map_err(|_| SessionError::IndexOutOfRange { index, len })?;
        Ok(index)
    }

    /// Moves the cursor to the first question.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::NotActive`] unless the session is active.
    pub fn go_to_first(&mut self) -> Result<usize, SessionError> {
        let data = self.active_session_mut()?;
        data.set_current_index(0)?;
        Ok(0)
    }

    /// Moves the cursor to the last question.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::NotActive`] unless the session is active.
    pub fn go_to_last(&mut self) -> Result<usize, SessionError> {
        let data = self.active_session_mut()?;
        let last = data.total() - 1;
        data.set_current_index(last)?;
        Ok(last)
    }

    /// Jumps forward to the nearest unanswered question.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::AllAnswered`] when no unanswered question
    /// exists ahead of the cursor; the scan never wraps.
    pub fn next_unanswered(&mut self) -> Result<usize, SessionError> {
        let data = self.active_session_mut()?;
        let index = data.next_unanswered().ok_or(SessionError::AllAnswered)?;
        data.set_current_index(index)?;
        Ok(index)
    }

    /// Jumps backward to the nearest unanswered question.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::AllAnswered`] when no unanswered question
    /// exists behind the cursor; the scan never wraps.
    pub fn previous_unanswered(&mut self) -> Result<usize, SessionError> {
        let data = self.active_session_mut()?;
        let index = data
            .previous_unanswered()
            .ok_or(SessionError::AllAnswered)?;
        data.set_current_index(index)?;
        Ok(index)
    }

    // ─── Persistence ───────────────────────────────────────────────────────────

    /// Snapshots the session to the store. Callers schedule this; the engine
    /// never saves on its own.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::NoSession`] when idle, or with a storage
    /// error from the write.
    pub fn save_session(&self) -> Result<(), SessionError> {
        storage::save_session(self.store.as_ref(), self.session_ref()?)?;
        Ok(())
    }

    /// Loads the saved snapshot, replacing any loaded session. Reports
    /// whether a trustworthy snapshot existed; corrupt snapshots were
    /// already discarded by the storage layer.
    ///
    /// # Errors
    ///
    /// Fails only when the store itself cannot be read.
    pub fn restore_session(&mut self) -> Result<bool, SessionError> {
        match storage::load_session(self.store.as_ref())? {
            Some(data) => {
                self.session = Some(data);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Removes the saved snapshot without touching the loaded session.
    ///
    /// # Errors
    ///
    /// Fails only when the store cannot be written.
    pub fn clear_saved_session(&self) -> Result<bool, SessionError> {
        Ok(storage::clear_session(self.store.as_ref())?)
    }

    // ─── Internals ─────────────────────────────────────────────────────────────

    fn session_ref(&self) -> Result<&SessionData, SessionError> {
        self.session.as_ref().ok_or(SessionError::NoSession)
    }

    fn active_session_mut(&mut self) -> Result<&mut SessionData, SessionError> {
        let data = self.session.as_mut().ok_or(SessionError::NoSession)?;
        if !data.is_active() {
            return Err(SessionError::NotActive { state: data.state() });
        }
        Ok(data)
    }
}

impl fmt::Debug for SessionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEngine")
            .field("state", &self.state())
            .field("history_len", &self.history.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
