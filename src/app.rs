//! Root controller: owns the top-level state, the active session and the
//! error banner, and guards every stage transition.

use crate::ai::{generate_quiz, GenerationOptions, LlmProvider};
use crate::error::GenerationError;
use crate::models::{AppState, Question, QuizOutcome, QuizRequest, QuizSession};
use chrono::Local;

pub const GENERATION_FAILED_MESSAGE: &str =
    "Failed to generate quiz. Please check your content and try again.";

#[derive(Debug)]
pub struct App {
    state: AppState,
    session: Option<QuizSession>,
    error: Option<String>,
    confidence_step: bool,
}

impl App {
    pub fn new(confidence_step: bool) -> Self {
        Self {
            state: AppState::Setup,
            session: None,
            error: None,
            confidence_step,
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn confidence_step(&self) -> bool {
        self.confidence_step
    }

    /// Enter the loading state ahead of a generation request.
    pub fn begin_generation(&mut self) -> bool {
        if self.state != AppState::Setup {
            tracing::warn!(state = ?self.state, "generation requested outside setup");
            return false;
        }
        self.state = AppState::Loading;
        self.error = None;
        self.session = None;
        true
    }

    /// Apply the result of a generation request started by `begin_generation`.
    pub fn complete_generation(
        &mut self,
        request: &QuizRequest,
        result: Result<Vec<Question>, GenerationError>,
    ) {
        if self.state != AppState::Loading {
            tracing::warn!(state = ?self.state, "ignoring late quiz generation result");
            return;
        }

        match result {
            Ok(questions) => {
                tracing::info!(questions = questions.len(), "quiz session created");
                self.session = Some(QuizSession::new(
                    questions,
                    request.difficulty,
                    self.confidence_step,
                    Local::now(),
                ));
                self.state = AppState::Quiz;
            }
            Err(e) => {
                tracing::error!(error = %e, "quiz generation failed");
                self.session = None;
                self.error = Some(GENERATION_FAILED_MESSAGE.to_string());
                self.state = AppState::Setup;
            }
        }
    }

    /// Generate a quiz in one call: loading, request, then quiz or setup.
    pub async fn start_quiz<P: LlmProvider + ?Sized>(
        &mut self,
        provider: &P,
        request: &QuizRequest,
        options: GenerationOptions,
    ) {
        if !self.begin_generation() {
            return;
        }
        let result = generate_quiz(
            provider,
            &request.source_text,
            request.difficulty,
            request.question_count,
            options,
        )
        .await;
        self.complete_generation(request, result);
    }

    /// Record the quiz stage's final arrays and move to results.
    pub fn finish(&mut self, outcome: QuizOutcome) {
        if self.state != AppState::Quiz {
            tracing::warn!(state = ?self.state, "finish called outside quiz");
            return;
        }
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match session.finalize(outcome, Local::now()) {
            Ok(()) => self.state = AppState::Results,
            Err(e) => tracing::error!(error = %e, "rejected quiz outcome"),
        }
    }

    pub fn restart(&mut self) {
        self.session = None;
        self.error = None;
        self.state = AppState::Setup;
    }

    pub fn report_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::mock::MockProvider;
    use crate::models::{ConfidenceLevel, DifficultyLevel};

    const TWO_QUESTIONS: &str = r#"[
        {"question": "Q1?", "options": ["a","b","c","d"], "correctAnswerIndex": 0, "explanation": "x"},
        {"question": "Q2?", "options": ["a","b","c","d"], "correctAnswerIndex": 1, "explanation": "y"}
    ]"#;

    fn request() -> QuizRequest {
        QuizRequest {
            source_text: "Ownership and borrowing".to_string(),
            difficulty: DifficultyLevel::Senior,
            question_count: 2,
        }
    }

    #[tokio::test]
    async fn test_start_quiz_success_creates_session() {
        let provider = MockProvider::with_responses(vec![Ok(TWO_QUESTIONS.to_string())]);
        let mut app = App::new(true);
        app.start_quiz(&provider, &request(), GenerationOptions::default())
            .await;

        assert_eq!(app.state(), AppState::Quiz);
        assert!(app.error().is_none());
        let session = app.session().unwrap();
        assert_eq!(session.len(), 2);
        assert_eq!(session.difficulty(), DifficultyLevel::Senior);
        assert_eq!(session.user_answers(), &[None, None]);
        assert_eq!(session.question_times(), &[0, 0]);
        assert_eq!(
            session.user_confidences(),
            &[ConfidenceLevel::Neutral, ConfidenceLevel::Neutral]
        );
    }

    #[tokio::test]
    async fn test_start_quiz_empty_body_returns_to_setup() {
        let provider = MockProvider::with_responses(vec![Ok(String::new())]);
        let mut app = App::new(true);
        app.start_quiz(&provider, &request(), GenerationOptions::default())
            .await;

        assert_eq!(app.state(), AppState::Setup);
        assert_eq!(app.error(), Some(GENERATION_FAILED_MESSAGE));
        assert!(app.session().is_none());
    }

    #[test]
    fn test_begin_generation_clears_error() {
        let mut app = App::new(false);
        app.report_error("old");
        assert!(app.begin_generation());
        assert_eq!(app.state(), AppState::Loading);
        assert!(app.error().is_none());
    }

    #[test]
    fn test_late_generation_result_is_ignored() {
        let mut app = App::new(false);
        let questions = vec![crate::models::sample_question(0, 0)];
        app.complete_generation(&request(), Ok(questions));
        assert_eq!(app.state(), AppState::Setup);
        assert!(app.session().is_none());
    }

    #[test]
    fn test_finish_moves_to_results() {
        let mut app = App::new(false);
        app.begin_generation();
        app.complete_generation(&request(), Ok(vec![crate::models::sample_question(0, 0)]));

        app.finish(QuizOutcome {
            answers: vec![Some(0)],
            confidences: vec![ConfidenceLevel::Neutral],
            times: vec![7],
        });

        assert_eq!(app.state(), AppState::Results);
        let session = app.session().unwrap();
        assert!(session.is_finished());
        assert_eq!(session.question_times(), &[7]);
    }

    #[test]
    fn test_finish_with_bad_outcome_stays_in_quiz() {
        let mut app = App::new(false);
        app.begin_generation();
        app.complete_generation(&request(), Ok(vec![crate::models::sample_question(0, 0)]));

        app.finish(QuizOutcome {
            answers: vec![],
            confidences: vec![],
            times: vec![],
        });
        assert_eq!(app.state(), AppState::Quiz);
    }

    #[test]
    fn test_restart_discards_session() {
        let mut app = App::new(false);
        app.begin_generation();
        app.complete_generation(&request(), Ok(vec![crate::models::sample_question(0, 0)]));
        app.restart();

        assert_eq!(app.state(), AppState::Setup);
        assert!(app.session().is_none());
        assert!(app.error().is_none());
    }
}
