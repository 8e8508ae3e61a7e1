use std::fmt;
use std::sync::Arc;

use drill_core::Clock;
use drill_core::model::{
    CustomQuestion, CustomQuestionDraft, CustomQuestionPatch, Question, QuestionId,
};
use storage::{KeyValueStore, StorageError, load_custom_questions, save_custom_questions};

use crate::error::CustomQuestionError;

/// User-authored questions, held in memory and written through to the
/// key-value store on every successful mutation.
///
/// The collection is the source of truth while running; the store is only
/// read once at construction. A failed write rolls the in-memory change
/// back, so memory and disk never drift apart.
pub struct CustomQuestionStore {
    questions: Vec<CustomQuestion>,
    store: Arc<dyn KeyValueStore>,
    clock: Clock,
}

impl CustomQuestionStore {
    /// Loads the persisted collection. A corrupt payload starts empty rather
    /// than failing construction.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the backend itself is unreachable.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let questions = load_custom_questions(store.as_ref())?;
        Ok(Self {
            questions,
            store,
            clock: Clock::default(),
        })
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    // ─── Queries ───────────────────────────────────────────────────────────────

    #[must_use]
    pub fn all(&self) -> &[CustomQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &QuestionId) -> Option<&CustomQuestion> {
        self.questions.iter().find(|q| q.question.id == *id)
    }

    /// Plain questions for the given catalog position, ready to join the
    /// stock pool during selection.
    #[must_use]
    pub fn for_selection(&self, track: &str, framework: &str, level: &str) -> Vec<Question> {
        self.questions
            .iter()
            .filter(|q| q.matches(track, framework, level))
            .map(|q| q.question.clone())
            .collect()
    }

    // ─── Mutation ──────────────────────────────────────────────────────────────

    /// Validates the draft, assigns identity and creation time, and persists.
    ///
    /// # Errors
    ///
    /// Returns `CustomQuestionError::Invalid` with every issue found, or a
    /// storage error; the collection is unchanged in both cases.
    pub fn create(
        &mut self,
        draft: CustomQuestionDraft,
    ) -> Result<CustomQuestion, CustomQuestionError> {
        let question = draft
            .validate(QuestionId::generate(), self.clock.now())
            .map_err(CustomQuestionError::Invalid)?;
        self.questions.push(question.clone());
        if let Err(err) = self.persist() {
            self.questions.pop();
            return Err(err.into());
        }
        Ok(question)
    }

    /// Merges `patch` into the stored question, re-validating the merged
    /// result before committing it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `Invalid` (the stored question is untouched), or
    /// a storage error (the in-memory change is rolled back).
    pub fn update(
        &mut self,
        id: &QuestionId,
        patch: CustomQuestionPatch,
    ) -> Result<CustomQuestion, CustomQuestionError> {
        let index = self
            .questions
            .iter()
            .position(|q| q.question.id == *id)
            .ok_or_else(|| CustomQuestionError::NotFound(id.clone()))?;
        let updated = self.questions[index]
            .merged(patch)
            .map_err(CustomQuestionError::Invalid)?;
        let previous = std::mem::replace(&mut self.questions[index], updated.clone());
        if let Err(err) = self.persist() {
            self.questions[index] = previous;
            return Err(err.into());
        }
        Ok(updated)
    }

    /// Removes the question if present. Deleting an unknown id is not an
    /// error; it reports `false` and changes nothing.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the shrunken list cannot be written; the
    /// removed question is put back in that case.
    pub fn delete(&mut self, id: &QuestionId) -> Result<bool, CustomQuestionError> {
        let Some(index) = self.questions.iter().position(|q| q.question.id == *id) else {
            return Ok(false);
        };
        let removed = self.questions.remove(index);
        if let Err(err) = self.persist() {
            self.questions.insert(index, removed);
            return Err(err.into());
        }
        Ok(true)
    }

    /// Merges imported questions by id, skipping ids already present and
    /// entries that fail validation. Returns how many were genuinely added.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the grown list cannot be written; the
    /// import is rolled back whole.
    pub fn import(&mut self, incoming: Vec<CustomQuestion>) -> Result<usize, CustomQuestionError> {
        let before = self.questions.len();
        for question in incoming {
            if self
                .questions
                .iter()
                .any(|q| q.question.id == question.question.id)
            {
                continue;
            }
            if let Err(issues) = question.validate() {
                tracing::warn!(
                    id = %question.question.id,
                    ?issues,
                    "skipping invalid imported custom question"
                );
                continue;
            }
            self.questions.push(question);
        }
        let added = self.questions.len() - before;
        if added > 0 {
            if let Err(err) = self.persist() {
                self.questions.truncate(before);
                return Err(err.into());
            }
        }
        Ok(added)
    }

    fn persist(&self) -> Result<(), StorageError> {
        save_custom_questions(self.store.as_ref(), &self.questions)
    }
}

impl fmt::Debug for CustomQuestionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomQuestionStore")
            .field("questions_len", &self.questions.len())
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
