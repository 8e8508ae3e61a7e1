use crate::model::ids::QuestionId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum number of choices a multiple-choice question may carry.
pub const MIN_CHOICES: usize = 2;
/// Maximum number of choices a multiple-choice question may carry.
pub const MAX_CHOICES: usize = 6;

/// A single structural problem found while validating a question.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum QuestionIssue {
    #[error("prompt must not be blank")]
    EmptyPrompt,
    #[error("choice count {got} outside allowed range {min}..={max}")]
    ChoiceCountOutOfRange { got: usize, min: usize, max: usize },
    #[error("choice {index} must not be blank")]
    EmptyChoice { index: usize },
    #[error("answer index {index} out of range for {choices} choices")]
    AnswerIndexOutOfRange { index: usize, choices: usize },
    #[error("at least one accepted answer is required")]
    NoAcceptedAnswers,
    #[error("accepted answer {index} must not be blank")]
    EmptyAcceptedAnswer { index: usize },
    #[error("track must not be blank")]
    EmptyTrack,
    #[error("framework must not be blank")]
    EmptyFramework,
    #[error("level must not be blank")]
    EmptyLevel,
}

/// Kind-specific payload of a question.
///
/// The tag rides inside the serialized object so content files stay flat:
/// `{"type": "mcq", "choices": [...], "answer_index": 1}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Pick one choice out of a fixed list.
    #[serde(rename = "mcq")]
    MultipleChoice {
        choices: Vec<String>,
        answer_index: usize,
    },
    /// Type a short answer checked against accepted spellings.
    Typing { accept: Vec<String> },
    /// Free-form answer graded on length, optionally guided by a rubric.
    Open {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        rubric: Vec<String>,
    },
}

impl QuestionKind {
    /// Stable lowercase name of the kind, matching the serialized tag.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::MultipleChoice { .. } => "mcq",
            Self::Typing { .. } => "typing",
            Self::Open { .. } => "open",
        }
    }
}

/// One question as presented during a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(flatten)]
    pub kind: QuestionKind,
}

impl Question {
    #[must_use]
    pub fn new(id: QuestionId, prompt: impl Into<String>, kind: QuestionKind) -> Self {
        Self {
            id,
            prompt: prompt.into(),
            explanation: None,
            kind,
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Checks structural soundness, collecting every issue found.
    ///
    /// # Errors
    ///
    /// Returns all [`QuestionIssue`]s at once so callers can report the full
    /// picture instead of fixing problems one at a time.
    pub fn validate(&self) -> Result<(), Vec<QuestionIssue>> {
        let mut issues = Vec::new();
        if self.prompt.trim().is_empty() {
            issues.push(QuestionIssue::EmptyPrompt);
        }
        match &self.kind {
            QuestionKind::MultipleChoice {
                choices,
                answer_index,
            } => {
                if choices.len() < MIN_CHOICES || choices.len() > MAX_CHOICES {
                    issues.push(QuestionIssue::ChoiceCountOutOfRange {
                        got: choices.len(),
                        min: MIN_CHOICES,
                        max: MAX_CHOICES,
                    });
                }
                for (index, choice) in choices.iter().enumerate() {
                    if choice.trim().is_empty() {
                        issues.push(QuestionIssue::EmptyChoice { index });
                    }
                }
                if *answer_index >= choices.len() {
                    issues.push(QuestionIssue::AnswerIndexOutOfRange {
                        index: *answer_index,
                        choices: choices.len(),
                    });
                }
            }
            QuestionKind::Typing { accept } => {
                if accept.is_empty() {
                    issues.push(QuestionIssue::NoAcceptedAnswers);
                }
                for (index, accepted) in accept.iter().enumerate() {
                    if accepted.trim().is_empty() {
                        issues.push(QuestionIssue::EmptyAcceptedAnswer { index });
                    }
                }
            }
            QuestionKind::Open { .. } => {}
        }
        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }
}

/// A submitted answer, shaped to the question kind it targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// Index of the selected choice.
    Choice(usize),
    /// Raw typed text for typing and open questions.
    Text(String),
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
