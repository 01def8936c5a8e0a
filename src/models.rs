use crate::error::SessionError;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Every generated question carries exactly this many options.
pub const OPTION_COUNT: usize = 4;

/// Question counts offered by the setup screen.
pub const QUESTION_COUNTS: [usize; 4] = [5, 10, 15, 20];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DifficultyLevel {
    #[serde(rename = "Junior Developer")]
    Junior,
    #[default]
    #[serde(rename = "Medium Developer")]
    Medium,
    #[serde(rename = "Senior Developer")]
    Senior,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Junior,
        DifficultyLevel::Medium,
        DifficultyLevel::Senior,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DifficultyLevel::Junior => "Junior Developer",
            DifficultyLevel::Medium => "Medium Developer",
            DifficultyLevel::Senior => "Senior Developer",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DifficultyLevel::Junior => "Core syntax, fundamentals and basic problem solving",
            DifficultyLevel::Medium => "Design patterns, trade-offs and performance",
            DifficultyLevel::Senior => "Architecture, scalability and hard edge cases",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            DifficultyLevel::Junior => DifficultyLevel::Medium,
            DifficultyLevel::Medium => DifficultyLevel::Senior,
            DifficultyLevel::Senior => DifficultyLevel::Junior,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    #[default]
    Neutral,
    High,
}

impl ConfidenceLevel {
    pub const ALL: [ConfidenceLevel; 3] = [
        ConfidenceLevel::Low,
        ConfidenceLevel::Neutral,
        ConfidenceLevel::High,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Neutral => "neutral",
            ConfidenceLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Logic,
    Conceptual,
}

impl QuestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::Logic => "logic",
            QuestionKind::Conceptual => "conceptual",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub options: [String; OPTION_COUNT],
    pub correct_answer_index: usize,
    pub explanation: String,
    pub code_example: Option<String>,
    pub kind: Option<QuestionKind>,
}

impl Question {
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_answer_index]
    }

    pub fn is_correct(&self, answer: Option<usize>) -> bool {
        answer == Some(self.correct_answer_index)
    }
}

/// Inputs of a single quiz generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizRequest {
    pub source_text: String,
    pub difficulty: DifficultyLevel,
    pub question_count: usize,
}

/// Final per-question arrays handed from the quiz stage to the controller.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizOutcome {
    pub answers: Vec<Option<usize>>,
    pub confidences: Vec<ConfidenceLevel>,
    pub times: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FollowUpResponse {
    pub question_id: String,
    pub user_query: String,
    pub ai_response: String,
}

/// A generated quiz plus everything recorded while taking it.
///
/// The answer, confidence and time vectors always have one entry per
/// question, so fields are private and only length-checked updates exist.
#[derive(Debug, Clone)]
pub struct QuizSession {
    questions: Vec<Question>,
    user_answers: Vec<Option<usize>>,
    user_confidences: Vec<ConfidenceLevel>,
    question_times: Vec<u64>,
    confidence_collected: bool,
    started_at: DateTime<Local>,
    ended_at: Option<DateTime<Local>>,
    difficulty: DifficultyLevel,
}

impl QuizSession {
    pub fn new(
        questions: Vec<Question>,
        difficulty: DifficultyLevel,
        confidence_collected: bool,
        started_at: DateTime<Local>,
    ) -> Self {
        let len = questions.len();
        Self {
            questions,
            user_answers: vec![None; len],
            user_confidences: vec![ConfidenceLevel::Neutral; len],
            question_times: vec![0; len],
            confidence_collected,
            started_at,
            ended_at: None,
            difficulty,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn user_answers(&self) -> &[Option<usize>] {
        &self.user_answers
    }

    pub fn user_confidences(&self) -> &[ConfidenceLevel] {
        &self.user_confidences
    }

    pub fn question_times(&self) -> &[u64] {
        &self.question_times
    }

    pub fn confidence_collected(&self) -> bool {
        self.confidence_collected
    }

    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Local>> {
        self.ended_at
    }

    pub fn difficulty(&self) -> DifficultyLevel {
        self.difficulty
    }

    pub fn is_finished(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Merge the quiz stage's final arrays and stamp the end time.
    pub fn finalize(
        &mut self,
        outcome: QuizOutcome,
        ended_at: DateTime<Local>,
    ) -> Result<(), SessionError> {
        if self.ended_at.is_some() {
            return Err(SessionError::AlreadyFinished);
        }
        let expected = self.questions.len();
        check_len("answers", expected, outcome.answers.len())?;
        check_len("confidences", expected, outcome.confidences.len())?;
        check_len("times", expected, outcome.times.len())?;

        self.user_answers = outcome.answers;
        self.user_confidences = outcome.confidences;
        self.question_times = outcome.times;
        self.ended_at = Some(ended_at);
        Ok(())
    }
}

fn check_len(field: &'static str, expected: usize, actual: usize) -> Result<(), SessionError> {
    if expected == actual {
        Ok(())
    } else {
        Err(SessionError::LengthMismatch {
            field,
            expected,
            actual,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Setup,
    Loading,
    Quiz,
    Results,
}

#[cfg(test)]
pub(crate) fn sample_question(index: usize, correct: usize) -> Question {
    Question {
        id: format!("q-{}", index),
        question: format!("Question {}?", index + 1),
        options: [
            "Option A".to_string(),
            "Option B".to_string(),
            "Option C".to_string(),
            "Option D".to_string(),
        ],
        correct_answer_index: correct,
        explanation: format!("Because of reason {}.", index + 1),
        code_example: None,
        kind: None,
    }
}
