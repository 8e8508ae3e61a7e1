use rand::rng;
use rand::seq::SliceRandom;

use drill_core::model::{Mode, Question, QuestionKind, SessionConfig};

use crate::content::ContentSource;

/// Default question count for a quiz when the caller names none.
pub const QUIZ_DEFAULT_COUNT: usize = 10;
/// Smallest quiz a caller can request.
pub const QUIZ_MIN_COUNT: usize = 6;
/// Largest quiz a caller can request.
pub const QUIZ_MAX_COUNT: usize = 14;
/// Nominal exam size; the 60/30/10 kind mix is carved out of this.
pub const EXAM_TOTAL: usize = 20;
/// Default question count for read and write sessions.
pub const READ_WRITE_DEFAULT_COUNT: usize = 15;

/// Builds the question list for one session out of stock and custom content.
///
/// Selection never invents questions: a pool smaller than the nominal count
/// yields a shorter list, and an empty pool yields an empty list the engine
/// must refuse to start on.
pub struct QuestionSelector<'a> {
    content: &'a dyn ContentSource,
}

impl<'a> QuestionSelector<'a> {
    #[must_use]
    pub fn new(content: &'a dyn ContentSource) -> Self {
        Self { content }
    }

    /// Resolves the pool for `config` and sizes it according to the mode.
    ///
    /// Stock questions for the exact catalog position are concatenated with
    /// the already-converted `custom` questions, filtered (quizzes take only
    /// choice and typing kinds), shuffled unless the config disables it, and
    /// cut to the mode's count.
    #[must_use]
    pub fn select(&self, config: &SessionConfig, custom: &[Question]) -> Vec<Question> {
        let mut pool = self
            .content
            .questions(&config.track, &config.framework, &config.level);
        pool.extend_from_slice(custom);

        match config.mode {
            Mode::Quiz => {
                pool.retain(|question| {
                    matches!(
                        question.kind,
                        QuestionKind::MultipleChoice { .. } | QuestionKind::Typing { .. }
                    )
                });
                let count = config
                    .question_count
                    .unwrap_or(QUIZ_DEFAULT_COUNT)
                    .clamp(QUIZ_MIN_COUNT, QUIZ_MAX_COUNT);
                shuffle_if(&mut pool, config.shuffle);
                pool.truncate(count);
                pool
            }
            Mode::Study => {
                shuffle_if(&mut pool, config.shuffle);
                pool
            }
            Mode::Exam => build_exam(pool, config.shuffle),
            Mode::Read | Mode::Write => {
                let count = config.question_count.unwrap_or(READ_WRITE_DEFAULT_COUNT);
                shuffle_if(&mut pool, config.shuffle);
                pool.truncate(count);
                pool
            }
        }
    }
}

/// Assembles an exam as 60% choice, 30% typing, 10% open out of [`EXAM_TOTAL`].
///
/// Each kind pool is shuffled and cut to its quota independently, the slices
/// are concatenated, reshuffled, and capped. A scarce kind pool is not
/// backfilled from the others, so the realized mix and total can come up
/// short of the nominal numbers.
fn build_exam(pool: Vec<Question>, shuffle: bool) -> Vec<Question> {
    let mut choice = Vec::new();
    let mut typing = Vec::new();
    let mut open = Vec::new();
    for question in pool {
        match question.kind {
            QuestionKind::MultipleChoice { .. } => choice.push(question),
            QuestionKind::Typing { .. } => typing.push(question),
            QuestionKind::Open { .. } => open.push(question),
        }
    }

    shuffle_if(&mut choice, shuffle);
    shuffle_if(&mut typing, shuffle);
    shuffle_if(&mut open, shuffle);
    choice.truncate(EXAM_TOTAL * 6 / 10);
    typing.truncate(EXAM_TOTAL * 3 / 10);
    open.truncate(EXAM_TOTAL / 10);

    let mut exam = choice;
    exam.append(&mut typing);
    exam.append(&mut open);
    shuffle_if(&mut exam, shuffle);
    exam.truncate(EXAM_TOTAL);
    exam
}

fn shuffle_if(questions: &mut [Question], shuffle: bool) {
    if shuffle {
        let mut rng = rng();
        questions.shuffle(&mut rng);
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::StaticContent;
    use drill_core::model::QuestionId;

    fn mcq(id: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("choice {id}"),
            QuestionKind::MultipleChoice {
                choices: vec!["a".into(), "b".into()],
                answer_index: 0,
            },
        )
    }

    fn typing(id: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("typing {id}"),
            QuestionKind::Typing {
                accept: vec!["answer".into()],
            },
        )
    }

    fn open(id: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("open {id}"),
            QuestionKind::Open { rubric: vec![] },
        )
    }

    fn bank(mcqs: usize, typings: usize, opens: usize) -> StaticContent {
        let mut questions = Vec::new();
        for i in 0..mcqs {
            questions.push(mcq(&format!("m-{i}")));
        }
        for i in 0..typings {
            questions.push(typing(&format!("t-{i}")));
        }
        for i in 0..opens {
            questions.push(open(&format!("o-{i}")));
        }
        StaticContent::new().with_questions("frontend", "react", "junior", questions)
    }

    fn config(mode: Mode) -> SessionConfig {
        SessionConfig::new("frontend", "react", "junior", mode).with_shuffle(false)
    }

    fn kind_counts(questions: &[Question]) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for question in questions {
            match question.kind {
                QuestionKind::MultipleChoice { .. } => counts.0 += 1,
                QuestionKind::Typing { .. } => counts.1 += 1,
                QuestionKind::Open { .. } => counts.2 += 1,
            }
        }
        counts
    }

    #[test]
    fn quiz_excludes_open_questions() {
        let content = bank(3, 3, 5);
        let selected = QuestionSelector::new(&content).select(&config(Mode::Quiz), &[]);
        assert_eq!(kind_counts(&selected), (3, 3, 0));
    }

    #[test]
    fn quiz_count_clamps_to_its_band() {
        let content = bank(20, 0, 0);
        let selector = QuestionSelector::new(&content);

        let low = selector.select(&config(Mode::Quiz).with_question_count(3), &[]);
        assert_eq!(low.len(), QUIZ_MIN_COUNT);

        let high = selector.select(&config(Mode::Quiz).with_question_count(20), &[]);
        assert_eq!(high.len(), QUIZ_MAX_COUNT);

        let default = selector.select(&config(Mode::Quiz), &[]);
        assert_eq!(default.len(), QUIZ_DEFAULT_COUNT);
    }

    #[test]
    fn quiz_on_a_tiny_pool_returns_the_whole_pool() {
        let content = bank(1, 1, 0);
        let selected = QuestionSelector::new(&content)
            .select(&config(Mode::Quiz).with_question_count(6), &[]);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn study_takes_everything_including_open() {
        let content = bank(2, 2, 2);
        let selected = QuestionSelector::new(&content).select(&config(Mode::Study), &[]);
        assert_eq!(selected.len(), 6);
    }

    #[test]
    fn exam_carves_the_sixty_thirty_ten_mix() {
        let content = bank(30, 20, 10);
        let selected = QuestionSelector::new(&content).select(&config(Mode::Exam), &[]);
        assert_eq!(selected.len(), EXAM_TOTAL);
        assert_eq!(kind_counts(&selected), (12, 6, 2));
    }

    #[test]
    fn exam_with_scarce_kind_runs_short_without_backfill() {
        let content = bank(15, 10, 1);
        let selected = QuestionSelector::new(&content).select(&config(Mode::Exam), &[]);
        assert_eq!(kind_counts(&selected), (12, 6, 1));
        assert_eq!(selected.len(), 19);
    }

    #[test]
    fn read_and_write_default_to_fifteen() {
        let content = bank(0, 0, 20);
        let selector = QuestionSelector::new(&content);
        assert_eq!(
            selector.select(&config(Mode::Read), &[]).len(),
            READ_WRITE_DEFAULT_COUNT
        );
        assert_eq!(
            selector
                .select(&config(Mode::Write).with_question_count(4), &[])
                .len(),
            4
        );
    }

    #[test]
    fn custom_questions_join_the_pool() {
        let content = bank(1, 0, 0);
        let customs = vec![mcq("custom-1")];
        let selected = QuestionSelector::new(&content).select(&config(Mode::Study), &customs);
        assert_eq!(selected.len(), 2);
        assert!(selected.iter().any(|q| q.id.as_str() == "custom-1"));
    }

    #[test]
    fn unknown_catalog_position_selects_nothing() {
        let content = bank(5, 5, 5);
        let empty_config =
            SessionConfig::new("mobile", "swift", "junior", Mode::Study).with_shuffle(false);
        assert!(QuestionSelector::new(&content).select(&empty_config, &[]).is_empty());
    }

    #[test]
    fn shuffling_permutes_without_changing_membership() {
        let content = bank(8, 4, 2);
        let shuffled_config =
            SessionConfig::new("frontend", "react", "junior", Mode::Study).with_shuffle(true);
        let selected = QuestionSelector::new(&content).select(&shuffled_config, &[]);

        let mut ids: Vec<&str> = selected.iter().map(|q| q.id.as_str()).collect();
        ids.sort_unstable();
        let mut expected: Vec<String> = (0..8)
            .map(|i| format!("m-{i}"))
            .chain((0..4).map(|i| format!("t-{i}")))
            .chain((0..2).map(|i| format!("o-{i}")))
            .collect();
        expected.sort();
        assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
