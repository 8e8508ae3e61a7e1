#![forbid(unsafe_code)]

pub mod evaluate;
pub mod model;
pub mod text;
pub mod time;

pub use evaluate::{EvaluationSettings, Evaluator, SettingsError};
pub use time::Clock;

pub use model::{
    Answer, AnswerResult, CustomQuestion, CustomQuestionDraft, CustomQuestionPatch, MAX_CHOICES,
    MIN_CHOICES, Mode, ProgressEntry, Question, QuestionId, QuestionIssue, QuestionKind,
    QuestionSlot, SessionConfig, SessionData, SessionDataError, SessionId, SessionState,
    score_percent,
};
