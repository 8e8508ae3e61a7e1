mod answer;
mod custom;
mod ids;
mod progress;
mod question;
mod session;

pub use answer::AnswerResult;
pub use custom::{CustomQuestion, CustomQuestionDraft, CustomQuestionPatch};
pub use ids::{QuestionId, SessionId};
pub use progress::{ProgressEntry, score_percent};
pub use question::{Answer, MAX_CHOICES, MIN_CHOICES, Question, QuestionIssue, QuestionKind};
pub use session::{
    Mode, QuestionSlot, SessionConfig, SessionData, SessionDataError, SessionState,
};
