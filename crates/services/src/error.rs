//! Shared error types for the services crate.

use thiserror::Error;

use drill_core::model::{QuestionId, QuestionIssue, SessionDataError, SessionState};
use storage::StorageError;

/// Errors emitted by the session engine.
///
/// Every variant is a rejected precondition reported back to the caller;
/// the engine never mutates state on the way to one of these.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no session exists")]
    NoSession,
    #[error("session is not active (currently {state:?})")]
    NotActive { state: SessionState },
    #[error("session is not paused (currently {state:?})")]
    NotPaused { state: SessionState },
    #[error("session is already completed")]
    AlreadyCompleted,
    #[error("no questions match the requested configuration")]
    EmptySelection,
    #[error("already at the first question (index {index})")]
    AtFirstQuestion { index: usize },
    #[error("already at the last question (index {index})")]
    AtLastQuestion { index: usize },
    #[error("question index {index} out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("every question has been answered")]
    AllAnswered,
    #[error(transparent)]
    Data(#[from] SessionDataError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by the custom question store.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CustomQuestionError {
    #[error("custom question failed validation: {0:?}")]
    Invalid(Vec<QuestionIssue>),
    #[error("no custom question with id {0}")]
    NotFound(QuestionId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
