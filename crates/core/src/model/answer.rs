/// Outcome of evaluating one submitted answer.
///
/// `is_valid` and `is_correct` are distinct axes: a well-formed but wrong
/// answer is valid and incorrect, while an empty submission is invalid and
/// triggers no state change at all. Results are transient view data and are
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerResult {
    pub is_valid: bool,
    pub is_correct: bool,
    /// Points awarded; `None` when the submission was rejected outright.
    pub score: Option<u32>,
    pub feedback: String,
    /// Reason a submission was rejected as invalid.
    pub error: Option<String>,
    pub explanation: Option<String>,
    /// The right choice text, revealed after a wrong pick.
    pub correct_answer: Option<String>,
    /// Accepted spellings, revealed after a failed typing answer.
    pub accepted_answers: Option<Vec<String>>,
    /// Hints for improving a short open answer.
    pub suggestions: Option<Vec<String>>,
    pub word_count: Option<usize>,
}

impl AnswerResult {
    /// Rejected submission; nothing was recorded.
    #[must_use]
    pub fn invalid(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            is_valid: false,
            is_correct: false,
            score: None,
            feedback: reason.clone(),
            error: Some(reason),
            explanation: None,
            correct_answer: None,
            accepted_answers: None,
            suggestions: None,
            word_count: None,
        }
    }

    /// Valid and right, worth `score` points.
    #[must_use]
    pub fn correct(score: u32, feedback: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            is_correct: true,
            score: Some(score),
            feedback: feedback.into(),
            error: None,
            explanation: None,
            correct_answer: None,
            accepted_answers: None,
            suggestions: None,
            word_count: None,
        }
    }

    /// Valid but wrong; scores zero.
    #[must_use]
    pub fn incorrect(feedback: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            is_correct: false,
            score: Some(0),
            feedback: feedback.into(),
            error: None,
            explanation: None,
            correct_answer: None,
            accepted_answers: None,
            suggestions: None,
            word_count: None,
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: Option<String>) -> Self {
        self.explanation = explanation;
        self
    }

    #[must_use]
    pub fn with_correct_answer(mut self, answer: impl Into<String>) -> Self {
        self.correct_answer = Some(answer.into());
        self
    }

    #[must_use]
    pub fn with_accepted_answers(mut self, answers: Vec<String>) -> Self {
        self.accepted_answers = Some(answers);
        self
    }

    #[must_use]
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = Some(suggestions);
        self
    }

    #[must_use]
    pub fn with_word_count(mut self, words: usize) -> Self {
        self.word_count = Some(words);
        self
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_carries_reason_on_both_channels() {
        let result = AnswerResult::invalid("answer cannot be empty");
        assert!(!result.is_valid);
        assert!(!result.is_correct);
        assert_eq!(result.score, None);
        assert_eq!(result.error.as_deref(), Some("answer cannot be empty"));
        assert_eq!(result.feedback, "answer cannot be empty");
    }

    #[test]
    fn incorrect_scores_zero_but_stays_valid() {
        let result = AnswerResult::incorrect("Incorrect.").with_correct_answer("4");
        assert!(result.is_valid);
        assert!(!result.is_correct);
        assert_eq!(result.score, Some(0));
        assert_eq!(result.correct_answer.as_deref(), Some("4"));
    }

    #[test]
    fn builders_attach_extras() {
        let result = AnswerResult::correct(14, "Good, but brief.")
            .with_suggestions(vec!["mention the borrow checker".into()])
            .with_word_count(3)
            .with_explanation(Some("ownership transfers on move".into()));
        assert_eq!(result.score, Some(14));
        assert_eq!(result.word_count, Some(3));
        assert_eq!(result.suggestions.as_ref().map(Vec::len), Some(1));
        assert!(result.explanation.is_some());
    }
}
