use crate::ai::{
    generate_quiz, generate_summary, get_clarification, ClarificationContext, GenerationOptions,
    LlmProvider,
};
use crate::error::GenerationError;
use crate::models::{DifficultyLevel, Question, QuizRequest};
use crossbeam_channel::{Receiver, Sender};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, PartialEq)]
pub enum AiRequest {
    GenerateQuiz(QuizRequest),
    Clarify {
        question: Question,
        query: String,
        context: ClarificationContext,
    },
    Summarize {
        questions: Vec<Question>,
        difficulty: DifficultyLevel,
    },
}

#[derive(Debug)]
pub enum AiResponse {
    Quiz {
        request: QuizRequest,
        result: Result<Vec<Question>, GenerationError>,
    },
    Clarification {
        question_id: String,
        query: String,
        result: Result<String, GenerationError>,
    },
    Summary(Result<String, GenerationError>),
}

/// Channel ends the UI loop keeps for talking to the worker.
pub struct AiWorker {
    pub tx: Sender<AiRequest>,
    pub rx: Receiver<AiResponse>,
    pub handle: thread::JoinHandle<()>,
}

impl AiWorker {
    pub fn spawn(provider: Arc<dyn LlmProvider>, options: GenerationOptions) -> std::io::Result<Self> {
        let (request_tx, request_rx) = crossbeam_channel::unbounded();
        let (response_tx, response_rx) = crossbeam_channel::unbounded();
        let handle = spawn_ai_worker(provider, options, response_tx, request_rx)?;
        Ok(Self {
            tx: request_tx,
            rx: response_rx,
            handle,
        })
    }

    pub fn send(&self, request: AiRequest) -> bool {
        self.tx.send(request).is_ok()
    }
}

pub fn spawn_ai_worker(
    provider: Arc<dyn LlmProvider>,
    options: GenerationOptions,
    ai_tx: Sender<AiResponse>,
    ai_rx: Receiver<AiRequest>,
) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("interview-quiz::ai_worker".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    tracing::error!(error = %e, "AI worker failed to build runtime");
                    return;
                }
            };

            while let Ok(request) = ai_rx.recv() {
                let response = rt.block_on(handle_request(provider.as_ref(), options, request));
                if ai_tx.send(response).is_err() {
                    break;
                }
            }
            tracing::info!("AI worker channel disconnected, exiting");
        })
}

async fn handle_request(
    provider: &dyn LlmProvider,
    options: GenerationOptions,
    request: AiRequest,
) -> AiResponse {
    match request {
        AiRequest::GenerateQuiz(request) => {
            let result = generate_quiz(
                provider,
                &request.source_text,
                request.difficulty,
                request.question_count,
                options,
            )
            .await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "quiz generation failed");
            }
            AiResponse::Quiz { request, result }
        }
        AiRequest::Clarify {
            question,
            query,
            context,
        } => {
            let result = get_clarification(provider, &question, &query, &context).await;
            if let Err(e) = &result {
                tracing::error!(question_id = %question.id, error = %e, "clarification failed");
            }
            AiResponse::Clarification {
                question_id: question.id,
                query,
                result,
            }
        }
        AiRequest::Summarize {
            questions,
            difficulty,
        } => {
            let result = generate_summary(provider, &questions, difficulty).await;
            if let Err(e) = &result {
                tracing::error!(error = %e, "summary generation failed");
            }
            AiResponse::Summary(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::mock::MockProvider;
    use crate::models::sample_question;
    use std::time::Duration;

    const ONE_QUESTION: &str = r#"[{"question": "Q?", "options": ["a","b","c","d"], "correctAnswerIndex": 2, "explanation": "x"}]"#;

    fn worker(responses: Vec<Result<String, GenerationError>>) -> AiWorker {
        let provider = Arc::new(MockProvider::with_responses(responses));
        AiWorker::spawn(provider, GenerationOptions::default()).unwrap()
    }

    #[test]
    fn test_worker_generates_quiz() {
        let worker = worker(vec![Ok(ONE_QUESTION.to_string())]);
        let request = QuizRequest {
            source_text: "notes".to_string(),
            difficulty: DifficultyLevel::Junior,
            question_count: 1,
        };
        assert!(worker.send(AiRequest::GenerateQuiz(request.clone())));

        match worker.rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AiResponse::Quiz {
                request: echoed,
                result,
            } => {
                assert_eq!(echoed, request);
                let questions = result.unwrap();
                assert_eq!(questions[0].correct_answer_index, 2);
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_worker_reports_clarification_for_question() {
        let worker = worker(vec![Ok("Because.".to_string())]);
        let question = sample_question(3, 0);
        worker.send(AiRequest::Clarify {
            question,
            query: "why?".to_string(),
            context: ClarificationContext {
                difficulty: DifficultyLevel::Medium,
                topics: vec![],
                answered_correctly: false,
                chosen_option: None,
                confidence: None,
                score: 0,
                total: 4,
            },
        });

        match worker.rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AiResponse::Clarification {
                question_id,
                query,
                result,
            } => {
                assert_eq!(question_id, "q-3");
                assert_eq!(query, "why?");
                assert_eq!(result.unwrap(), "Because.");
            }
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_worker_reports_summary_error() {
        let worker = worker(vec![Err(GenerationError::Provider("down".to_string()))]);
        worker.send(AiRequest::Summarize {
            questions: vec![sample_question(0, 0)],
            difficulty: DifficultyLevel::Senior,
        });

        match worker.rx.recv_timeout(Duration::from_secs(5)).unwrap() {
            AiResponse::Summary(result) => assert!(result.is_err()),
            other => panic!("unexpected response: {:?}", other),
        }
    }

    #[test]
    fn test_worker_exits_when_requests_disconnect() {
        let AiWorker { tx, rx: _rx, handle } = worker(vec![]);
        drop(tx);
        handle.join().unwrap();
    }
}
