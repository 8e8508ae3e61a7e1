//! Answer grading for every question kind.
//!
//! The evaluator is pure: it inspects a question and a submitted answer and
//! returns an [`AnswerResult`], leaving all session bookkeeping to the caller.

use crate::model::{Answer, AnswerResult, Question, QuestionKind};
use crate::text::{normalize, normalize_for_similarity, similarity};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("fuzzy threshold {got} outside (0.0, 1.0]")]
    FuzzyThresholdOutOfRange { got: f64 },
}

/// Tunable grading knobs with the stock values baked in.
///
/// Fields stay private so a threshold can never silently leave `(0.0, 1.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationSettings {
    fuzzy_threshold: f64,
    choice_score: u32,
    typing_score: u32,
    open_score: u32,
    fuzzy_multiplier: f64,
    short_open_multiplier: f64,
    short_open_length: usize,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.80,
            choice_score: 10,
            typing_score: 15,
            open_score: 20,
            fuzzy_multiplier: 0.8,
            short_open_multiplier: 0.7,
            short_open_length: 10,
        }
    }
}

impl EvaluationSettings {
    /// Overrides the similarity bar a fuzzy typing match must clear.
    ///
    /// # Errors
    ///
    /// Fails with [`SettingsError::FuzzyThresholdOutOfRange`] unless
    /// `0.0 < threshold <= 1.0`.
    pub fn with_fuzzy_threshold(mut self, threshold: f64) -> Result<Self, SettingsError> {
        if threshold <= 0.0 || threshold > 1.0 {
            return Err(SettingsError::FuzzyThresholdOutOfRange { got: threshold });
        }
        self.fuzzy_threshold = threshold;
        Ok(self)
    }

    #[must_use]
    pub fn fuzzy_threshold(&self) -> f64 {
        self.fuzzy_threshold
    }

    #[must_use]
    pub fn choice_score(&self) -> u32 {
        self.choice_score
    }

    #[must_use]
    pub fn typing_score(&self) -> u32 {
        self.typing_score
    }

    #[must_use]
    pub fn open_score(&self) -> u32 {
        self.open_score
    }

    #[must_use]
    pub fn short_open_length(&self) -> usize {
        self.short_open_length
    }
}

/// Grades submitted answers against their questions.
#[derive(Debug, Clone, Default)]
pub struct Evaluator {
    settings: EvaluationSettings,
}

impl Evaluator {
    #[must_use]
    pub fn new(settings: EvaluationSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &EvaluationSettings {
        &self.settings
    }

    /// Evaluates one answer. Invalid submissions come back with
    /// `is_valid == false` and must not be recorded by the caller.
    #[must_use]
    pub fn evaluate(&self, question: &Question, answer: &Answer) -> AnswerResult {
        match (&question.kind, answer) {
            (
                QuestionKind::MultipleChoice {
                    choices,
                    answer_index,
                },
                Answer::Choice(picked),
            ) => self.evaluate_choice(question, choices, *answer_index, *picked),
            (QuestionKind::Typing { accept }, Answer::Text(text)) => {
                self.evaluate_typing(question, accept, text)
            }
            (QuestionKind::Open { rubric }, Answer::Text(text)) => {
                self.evaluate_open(question, rubric, text)
            }
            _ => AnswerResult::invalid("answer shape does not match the question kind"),
        }
    }

    fn evaluate_choice(
        &self,
        question: &Question,
        choices: &[String],
        answer_index: usize,
        picked: usize,
    ) -> AnswerResult {
        if picked >= choices.len() {
            return AnswerResult::invalid(format!(
                "choice {picked} out of range for {} options",
                choices.len()
            ));
        }
        if picked == answer_index {
            return AnswerResult::correct(self.settings.choice_score, "Correct!")
                .with_explanation(question.explanation.clone());
        }
        let mut result =
            AnswerResult::incorrect("Incorrect.").with_explanation(question.explanation.clone());
        if let Some(right) = choices.get(answer_index) {
            result = result.with_correct_answer(right.clone());
        }
        result
    }

    fn evaluate_typing(&self, question: &Question, accept: &[String], text: &str) -> AnswerResult {
        let exact_form = normalize(text);
        if exact_form.is_empty() {
            return AnswerResult::invalid("answer cannot be empty");
        }
        if accept.iter().any(|accepted| normalize(accepted) == exact_form) {
            return AnswerResult::correct(self.settings.typing_score, "Correct!")
                .with_explanation(question.explanation.clone());
        }

        let fuzzy_form = normalize_for_similarity(text);
        let best = accept
            .iter()
            .map(|accepted| similarity(&fuzzy_form, &normalize_for_similarity(accepted)))
            .fold(0.0_f64, f64::max);
        if best >= self.settings.fuzzy_threshold {
            let score = scale(self.settings.typing_score, self.settings.fuzzy_multiplier);
            return AnswerResult::correct(score, "Accepted with a small typo.")
                .with_explanation(question.explanation.clone());
        }

        AnswerResult::incorrect("Incorrect.")
            .with_accepted_answers(accept.to_vec())
            .with_explanation(question.explanation.clone())
    }

    fn evaluate_open(&self, question: &Question, rubric: &[String], text: &str) -> AnswerResult {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return AnswerResult::invalid("answer cannot be empty");
        }
        let words = trimmed.split_whitespace().count();

        // Open questions have no wrong answer; only depth is graded.
        if trimmed.chars().count() < self.settings.short_open_length {
            let score = scale(self.settings.open_score, self.settings.short_open_multiplier);
            return AnswerResult::correct(score, "Answer recorded, though a short one.")
                .with_suggestions(short_answer_suggestions(rubric))
                .with_word_count(words)
                .with_explanation(question.explanation.clone());
        }

        AnswerResult::correct(self.settings.open_score, "Answer recorded.")
            .with_word_count(words)
            .with_explanation(question.explanation.clone())
    }
}

fn short_answer_suggestions(rubric: &[String]) -> Vec<String> {
    let mut suggestions = vec!["Expand your answer with more detail or an example.".to_string()];
    suggestions.extend(
        rubric
            .iter()
            .map(|point| format!("Consider covering: {point}")),
    );
    suggestions
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale(base: u32, multiplier: f64) -> u32 {
    (f64::from(base) * multiplier).round() as u32
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
