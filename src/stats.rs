//! Scoring and the confidence-versus-correctness breakdown shown on the
//! results screen.

use crate::models::{ConfidenceLevel, QuizSession};

pub fn score(session: &QuizSession) -> usize {
    session
        .questions()
        .iter()
        .zip(session.user_answers())
        .filter(|(q, a)| q.is_correct(**a))
        .count()
}

/// Rounded percentage of correct answers; an empty session scores 0.
pub fn accuracy(session: &QuizSession) -> u32 {
    if session.is_empty() {
        return 0;
    }
    ((score(session) as f64 / session.len() as f64) * 100.0).round() as u32
}

/// Wall-clock seconds from session start to finish, 0 while still running.
pub fn total_elapsed(session: &QuizSession) -> u64 {
    session
        .ended_at()
        .map(|end| (end - session.started_at()).num_seconds().max(0) as u64)
        .unwrap_or(0)
}

/// Sum of the per-question timers.
pub fn time_on_questions(session: &QuizSession) -> u64 {
    session.question_times().iter().sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mastery {
    /// Correct and confident.
    Mastered,
    /// Wrong but confident.
    Illusion,
    /// Correct with low confidence.
    Lucky,
    Gap,
}

impl Mastery {
    pub fn label(&self) -> &'static str {
        match self {
            Mastery::Mastered => "Mastered",
            Mastery::Illusion => "Illusion of Competence",
            Mastery::Lucky => "Lucky Guess",
            Mastery::Gap => "Knowledge Gap",
        }
    }
}

pub fn classify(correct: bool, confidence: ConfidenceLevel) -> Mastery {
    match (correct, confidence) {
        (true, ConfidenceLevel::High) => Mastery::Mastered,
        (false, ConfidenceLevel::High) => Mastery::Illusion,
        (true, ConfidenceLevel::Low) => Mastery::Lucky,
        _ => Mastery::Gap,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MasteryBreakdown {
    pub mastered: usize,
    pub illusions: usize,
    pub lucky: usize,
    pub gaps: usize,
}

impl MasteryBreakdown {
    pub fn total(&self) -> usize {
        self.mastered + self.illusions + self.lucky + self.gaps
    }
}

/// Per-category counts, or `None` when the session never asked for
/// confidence.
pub fn mastery_breakdown(session: &QuizSession) -> Option<MasteryBreakdown> {
    if !session.confidence_collected() {
        return None;
    }

    let mut breakdown = MasteryBreakdown::default();
    for ((question, answer), confidence) in session
        .questions()
        .iter()
        .zip(session.user_answers())
        .zip(session.user_confidences())
    {
        match classify(question.is_correct(*answer), *confidence) {
            Mastery::Mastered => breakdown.mastered += 1,
            Mastery::Illusion => breakdown.illusions += 1,
            Mastery::Lucky => breakdown.lucky += 1,
            Mastery::Gap => breakdown.gaps += 1,
        }
    }
    Some(breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{sample_question, DifficultyLevel, QuizOutcome};
    use chrono::Local;

    fn finished(
        correct: &[usize],
        answers: Vec<Option<usize>>,
        confidences: Vec<ConfidenceLevel>,
        confidence_collected: bool,
    ) -> QuizSession {
        let questions = correct
            .iter()
            .enumerate()
            .map(|(i, c)| sample_question(i, *c))
            .collect();
        let mut session = QuizSession::new(
            questions,
            DifficultyLevel::Junior,
            confidence_collected,
            Local::now(),
        );
        let times = vec![3; correct.len()];
        session
            .finalize(
                QuizOutcome {
                    answers,
                    confidences,
                    times,
                },
                Local::now(),
            )
            .unwrap();
        session
    }

    #[test]
    fn test_classify_all_combinations() {
        use ConfidenceLevel::*;
        assert_eq!(classify(true, High), Mastery::Mastered);
        assert_eq!(classify(false, High), Mastery::Illusion);
        assert_eq!(classify(true, Low), Mastery::Lucky);
        assert_eq!(classify(true, Neutral), Mastery::Gap);
        assert_eq!(classify(false, Neutral), Mastery::Gap);
        assert_eq!(classify(false, Low), Mastery::Gap);
    }

    #[test]
    fn test_score_and_accuracy() {
        let session = finished(
            &[0, 1, 2],
            vec![Some(0), Some(2), None],
            vec![ConfidenceLevel::Neutral; 3],
            false,
        );
        assert_eq!(score(&session), 1);
        assert_eq!(accuracy(&session), 33);
        assert_eq!(time_on_questions(&session), 9);
    }

    #[test]
    fn test_accuracy_rounds_half_up() {
        let session = finished(
            &[0, 0, 0, 0, 0, 0, 0, 0],
            vec![
                Some(0),
                Some(0),
                Some(0),
                Some(0),
                Some(0),
                Some(1),
                Some(1),
                Some(1),
            ],
            vec![ConfidenceLevel::Neutral; 8],
            false,
        );
        // 5/8 = 62.5
        assert_eq!(accuracy(&session), 63);
    }

    #[test]
    fn test_total_elapsed_uses_session_clock() {
        let start = Local::now();
        let mut session =
            QuizSession::new(vec![sample_question(0, 0)], DifficultyLevel::Medium, false, start);
        assert_eq!(total_elapsed(&session), 0);
        session
            .finalize(
                QuizOutcome {
                    answers: vec![Some(0)],
                    confidences: vec![ConfidenceLevel::Neutral],
                    times: vec![4],
                },
                start + chrono::Duration::seconds(95),
            )
            .unwrap();
        assert_eq!(total_elapsed(&session), 95);
    }

    #[test]
    fn test_empty_session_accuracy_is_zero() {
        let session = QuizSession::new(vec![], DifficultyLevel::Medium, true, Local::now());
        assert_eq!(score(&session), 0);
        assert_eq!(accuracy(&session), 0);
    }

    #[test]
    fn test_breakdown_for_all_correct_mixed_confidence() {
        let session = finished(
            &[0, 1, 2],
            vec![Some(0), Some(1), Some(2)],
            vec![
                ConfidenceLevel::High,
                ConfidenceLevel::Neutral,
                ConfidenceLevel::High,
            ],
            true,
        );
        let breakdown = mastery_breakdown(&session).unwrap();
        assert_eq!(
            breakdown,
            MasteryBreakdown {
                mastered: 2,
                illusions: 0,
                lucky: 0,
                gaps: 1,
            }
        );
        assert_eq!(breakdown.total(), session.len());
    }

    #[test]
    fn test_breakdown_counts_unanswered_as_wrong() {
        let session = finished(
            &[0, 1],
            vec![None, Some(3)],
            vec![ConfidenceLevel::High, ConfidenceLevel::Low],
            true,
        );
        let breakdown = mastery_breakdown(&session).unwrap();
        assert_eq!(breakdown.illusions, 1);
        assert_eq!(breakdown.gaps, 1);
        assert_eq!(breakdown.total(), 2);
    }

    #[test]
    fn test_breakdown_absent_without_confidence_step() {
        let session = finished(
            &[0],
            vec![Some(0)],
            vec![ConfidenceLevel::Neutral],
            false,
        );
        assert!(mastery_breakdown(&session).is_none());
    }
}
