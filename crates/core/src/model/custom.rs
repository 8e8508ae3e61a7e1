use crate::model::ids::QuestionId;
use crate::model::question::{Question, QuestionIssue, QuestionKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user-authored question, tagged with the catalog position it belongs to.
///
/// Custom questions live alongside stock content and join the selection pool
/// whenever a session targets the same track, framework, and level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomQuestion {
    #[serde(flatten)]
    pub question: Question,
    pub track: String,
    pub framework: String,
    pub level: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl CustomQuestion {
    /// Checks both the embedded question and the catalog tags.
    ///
    /// # Errors
    ///
    /// Returns every [`QuestionIssue`] found, structural and tag issues
    /// combined.
    pub fn validate(&self) -> Result<(), Vec<QuestionIssue>> {
        let mut issues = match self.question.validate() {
            Ok(()) => Vec::new(),
            Err(found) => found,
        };
        if self.track.trim().is_empty() {
            issues.push(QuestionIssue::EmptyTrack);
        }
        if self.framework.trim().is_empty() {
            issues.push(QuestionIssue::EmptyFramework);
        }
        if self.level.trim().is_empty() {
            issues.push(QuestionIssue::EmptyLevel);
        }
        if issues.is_empty() { Ok(()) } else { Err(issues) }
    }

    /// True when this question belongs to the given catalog position.
    #[must_use]
    pub fn matches(&self, track: &str, framework: &str, level: &str) -> bool {
        self.track.eq_ignore_ascii_case(track)
            && self.framework.eq_ignore_ascii_case(framework)
            && self.level.eq_ignore_ascii_case(level)
    }

    /// Applies a patch, returning the updated question after re-validation.
    ///
    /// Identity and creation time never change. Unset patch fields leave the
    /// current value in place.
    ///
    /// # Errors
    ///
    /// Returns the combined [`QuestionIssue`] list when the patched question
    /// would be invalid; `self` stays untouched in that case.
    pub fn merged(&self, patch: CustomQuestionPatch) -> Result<CustomQuestion, Vec<QuestionIssue>> {
        let mut updated = self.clone();
        if let Some(prompt) = patch.prompt {
            updated.question.prompt = prompt.trim().to_string();
        }
        if let Some(kind) = patch.kind {
            updated.question.kind = kind;
        }
        if let Some(explanation) = patch.explanation {
            updated.question.explanation = non_blank(explanation);
        }
        if let Some(track) = patch.track {
            updated.track = track.trim().to_string();
        }
        if let Some(framework) = patch.framework {
            updated.framework = framework.trim().to_string();
        }
        if let Some(level) = patch.level {
            updated.level = level.trim().to_string();
        }
        if let Some(author) = patch.author {
            updated.author = non_blank(author);
        }
        updated.validate()?;
        Ok(updated)
    }
}

/// Unvalidated input for a new custom question.
///
/// A draft carries no identity or timestamp; both are assigned when the draft
/// passes validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomQuestionDraft {
    pub prompt: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub track: String,
    pub framework: String,
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl CustomQuestionDraft {
    /// Promotes the draft into a stored [`CustomQuestion`].
    ///
    /// Leading and trailing whitespace is trimmed from text fields before
    /// validation, so a prompt of spaces fails as blank rather than slipping
    /// through.
    ///
    /// # Errors
    ///
    /// Returns every [`QuestionIssue`] found in the draft.
    pub fn validate(
        self,
        id: QuestionId,
        now: DateTime<Utc>,
    ) -> Result<CustomQuestion, Vec<QuestionIssue>> {
        let candidate = CustomQuestion {
            question: Question {
                id,
                prompt: self.prompt.trim().to_string(),
                explanation: self.explanation.and_then(non_blank),
                kind: self.kind,
            },
            track: self.track.trim().to_string(),
            framework: self.framework.trim().to_string(),
            level: self.level.trim().to_string(),
            created_at: now,
            author: self.author.and_then(non_blank),
        };
        candidate.validate()?;
        Ok(candidate)
    }
}

/// Partial update for an existing custom question.
///
/// Every field is optional; `None` means "keep the current value".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomQuestionPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<QuestionKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framework: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
