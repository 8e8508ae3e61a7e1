use chrono::Duration;
use drill_core::model::{SessionData, score_percent};
use serde::{Deserialize, Serialize};

/// Badge earned by a finished session. Badges are derived on the spot from
/// the session's outcome and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    /// Every question answered and every answer correct.
    Perfect,
    /// Final score of at least 90 percent.
    HighScore,
    /// Under 30 seconds per question on average with a score of at least 80.
    Speed,
    /// Every question answered.
    Completionist,
    /// Every question answered in a session longer than five questions.
    NoSkips,
}

impl Achievement {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::HighScore => "high_score",
            Self::Speed => "speed",
            Self::Completionist => "completionist",
            Self::NoSkips => "no_skips",
        }
    }
}

impl std::fmt::Display for Achievement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Checks a finished session against every badge threshold.
///
/// The checks are independent; one session can earn several badges. A
/// skipped question counts as unanswered, which is what blocks the
/// completion-flavored badges.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn evaluate(session: &SessionData, duration: Duration) -> Vec<Achievement> {
    let total = session.total();
    let score = score_percent(session.correct_count(), total);
    let fully_answered = session.unanswered_count() == 0;

    let mut earned = Vec::new();
    if score == 100 && fully_answered {
        earned.push(Achievement::Perfect);
    }
    if score >= 90 {
        earned.push(Achievement::HighScore);
    }
    if total > 0 {
        let secs_per_question = duration.num_seconds() as f64 / total as f64;
        if secs_per_question < 30.0 && score >= 80 {
            earned.push(Achievement::Speed);
        }
    }
    if fully_answered {
        earned.push(Achievement::Completionist);
    }
    if fully_answered && total > 5 {
        earned.push(Achievement::NoSkips);
    }
    earned
}

#[cfg(test)]
mod tests {
    use super::*;
    use drill_core::model::{
        Answer, Mode, Question, QuestionId, QuestionKind, SessionConfig, SessionId,
    };
    use drill_core::time::fixed_now;

    fn answered_session(total: usize, correct: usize, answered: usize) -> SessionData {
        let questions = (0..total)
            .map(|i| {
                Question::new(
                    QuestionId::new(format!("q-{i}")),
                    format!("prompt {i}"),
                    QuestionKind::Open { rubric: vec![] },
                )
            })
            .collect();
        let mut session = SessionData::new(
            SessionId::new("s-badges"),
            SessionConfig::new("frontend", "react", "junior", Mode::Quiz),
            questions,
            fixed_now(),
        )
        .unwrap();
        for index in 0..answered {
            session.set_current_index(index).unwrap();
            session.record_current(Some(Answer::Text("done".into())), index < correct);
        }
        session
    }

    #[test]
    fn perfect_run_earns_the_full_stack() {
        let session = answered_session(8, 8, 8);
        let earned = evaluate(&session, Duration::seconds(8 * 20));
        assert_eq!(
            earned,
            vec![
                Achievement::Perfect,
                Achievement::HighScore,
                Achievement::Speed,
                Achievement::Completionist,
                Achievement::NoSkips,
            ]
        );
    }

    #[test]
    fn unanswered_slot_blocks_completion_badges() {
        let session = answered_session(8, 7, 7);
        let earned = evaluate(&session, Duration::seconds(8 * 60));
        assert!(!earned.contains(&Achievement::Perfect));
        assert!(!earned.contains(&Achievement::Completionist));
        assert!(!earned.contains(&Achievement::NoSkips));
        // 7/8 rounds to 88: close, but no high score either.
        assert!(!earned.contains(&Achievement::HighScore));
    }

    #[test]
    fn high_score_does_not_require_completion() {
        let session = answered_session(10, 9, 9);
        let earned = evaluate(&session, Duration::seconds(10 * 60));
        assert_eq!(earned, vec![Achievement::HighScore]);
    }

    #[test]
    fn speed_needs_both_pace_and_accuracy() {
        let quick_but_sloppy = answered_session(10, 7, 10);
        let earned = evaluate(&quick_but_sloppy, Duration::seconds(10));
        assert!(!earned.contains(&Achievement::Speed));

        let quick_and_sharp = answered_session(10, 8, 10);
        let earned = evaluate(&quick_and_sharp, Duration::seconds(10));
        assert!(earned.contains(&Achievement::Speed));
    }

    #[test]
    fn short_sessions_never_earn_no_skips() {
        let session = answered_session(5, 5, 5);
        let earned = evaluate(&session, Duration::seconds(5 * 10));
        assert!(earned.contains(&Achievement::Completionist));
        assert!(!earned.contains(&Achievement::NoSkips));
    }
}
