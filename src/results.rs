use crate::ai::ClarificationContext;
use crate::ai_worker::AiRequest;
use crate::error::GenerationError;
use crate::models::{FollowUpResponse, QuizSession};
use crate::stats;
use crate::utils::markdown::parse_code_snippet;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::{HashMap, HashSet};

pub const TUTOR_ERROR_MESSAGE: &str = "The tutor could not answer right now. Try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum SummaryStatus {
    Pending,
    Ready(String),
    Failed,
}

/// Follow-up question being typed for one review item.
#[derive(Debug, Clone, PartialEq)]
pub struct TutorPrompt {
    pub question_id: String,
    pub question_index: usize,
    pub input: String,
    pub is_asking: bool,
    pub error: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum ResultsAction {
    None,
    Restart,
    Quit,
    Ask(AiRequest),
    Export,
    Copy(String),
}

#[derive(Debug)]
pub struct ResultsState {
    pub selected: usize,
    pub expanded: Option<usize>,
    pub summary: SummaryStatus,
    pub tutor: Option<TutorPrompt>,
    pub export_confirm: bool,
    pub status_message: Option<String>,
    pub summary_scroll: u16,
    summary_requested: bool,
    tutor_responses: HashMap<String, FollowUpResponse>,
    /// Question ids with a clarification request still in flight.
    tutor_pending: HashSet<String>,
}

impl Default for ResultsState {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            expanded: None,
            summary: SummaryStatus::Pending,
            tutor: None,
            export_confirm: false,
            status_message: None,
            summary_scroll: 0,
            summary_requested: false,
            tutor_responses: HashMap::new(),
            tutor_pending: HashSet::new(),
        }
    }

    /// True exactly once per results visit.
    pub fn take_summary_request(&mut self) -> bool {
        if self.summary_requested {
            return false;
        }
        self.summary_requested = true;
        true
    }

    pub fn summary_request(&mut self, session: &QuizSession) -> Option<AiRequest> {
        if !self.take_summary_request() {
            return None;
        }
        Some(AiRequest::Summarize {
            questions: session.questions().to_vec(),
            difficulty: session.difficulty(),
        })
    }

    pub fn apply_summary(&mut self, result: Result<String, GenerationError>) {
        if self.summary != SummaryStatus::Pending {
            tracing::warn!("ignoring duplicate summary result");
            return;
        }
        self.summary = match result {
            Ok(text) => SummaryStatus::Ready(text),
            Err(_) => SummaryStatus::Failed,
        };
    }

    pub fn ready_summary(&self) -> Option<&str> {
        match &self.summary {
            SummaryStatus::Ready(text) => Some(text),
            _ => None,
        }
    }

    pub fn tutor_response(&self, question_id: &str) -> Option<&FollowUpResponse> {
        self.tutor_responses.get(question_id)
    }

    pub fn can_ask(&self, question_id: &str) -> bool {
        !self.tutor_responses.contains_key(question_id) && !self.tutor_pending.contains(question_id)
    }

    pub fn is_tutor_pending(&self, question_id: &str) -> bool {
        self.tutor_pending.contains(question_id)
    }

    pub fn open_tutor(&mut self, session: &QuizSession) -> bool {
        let Some(question) = session.questions().get(self.selected) else {
            return false;
        };
        if self.tutor_pending.contains(&question.id) {
            self.status_message = Some("The tutor is still answering this question".to_string());
            return false;
        }
        if !self.can_ask(&question.id) {
            self.status_message = Some("The tutor already answered this question".to_string());
            return false;
        }
        self.tutor = Some(TutorPrompt {
            question_id: question.id.clone(),
            question_index: self.selected,
            input: String::new(),
            is_asking: false,
            error: None,
        });
        true
    }

    /// Build the clarification request for the open tutor prompt, marking it busy.
    pub fn submit_tutor(&mut self, session: &QuizSession) -> Option<AiRequest> {
        let prompt = self.tutor.as_ref()?;
        if prompt.is_asking || prompt.input.trim().is_empty() || !self.can_ask(&prompt.question_id)
        {
            return None;
        }
        let index = prompt.question_index;
        let question = session.questions().get(index)?.clone();
        let answer = session.user_answers().get(index).copied().flatten();

        let context = ClarificationContext {
            difficulty: session.difficulty(),
            topics: session
                .questions()
                .iter()
                .map(|q| q.question.clone())
                .collect(),
            answered_correctly: question.is_correct(answer),
            chosen_option: answer.map(|a| question.options[a].clone()),
            confidence: session
                .confidence_collected()
                .then(|| session.user_confidences()[index]),
            score: stats::score(session),
            total: session.len(),
        };

        let prompt = self.tutor.as_mut()?;
        prompt.is_asking = true;
        prompt.error = None;
        self.tutor_pending.insert(prompt.question_id.clone());
        Some(AiRequest::Clarify {
            question,
            query: prompt.input.trim().to_string(),
            context,
        })
    }

    pub fn apply_clarification(
        &mut self,
        question_id: String,
        query: String,
        result: Result<String, GenerationError>,
    ) {
        self.tutor_pending.remove(&question_id);
        match result {
            Ok(_) if self.tutor_responses.contains_key(&question_id) => {
                tracing::warn!(%question_id, "ignoring second tutor reply");
            }
            Ok(ai_response) => {
                let open_for_question = self
                    .tutor
                    .as_ref()
                    .is_some_and(|t| t.question_id == question_id);
                if open_for_question {
                    self.tutor = None;
                }
                self.tutor_responses.insert(
                    question_id.clone(),
                    FollowUpResponse {
                        question_id,
                        user_query: query,
                        ai_response,
                    },
                );
            }
            Err(_) => match self.tutor.as_mut() {
                Some(prompt) if prompt.question_id == question_id => {
                    prompt.is_asking = false;
                    prompt.error = Some(TUTOR_ERROR_MESSAGE.to_string());
                }
                _ => self.status_message = Some(TUTOR_ERROR_MESSAGE.to_string()),
            },
        }
    }

    /// Text to copy for the expanded question: the tutor reply, else the code example.
    pub fn copy_text(&self, session: &QuizSession) -> Option<String> {
        let question = session.questions().get(self.expanded?)?;
        if let Some(reply) = self.tutor_response(&question.id) {
            return Some(reply.ai_response.clone());
        }
        question
            .code_example
            .as_deref()
            .map(|code| parse_code_snippet(code).code)
    }
}

pub fn handle_results_input(
    results: &mut ResultsState,
    session: &QuizSession,
    key: KeyEvent,
) -> ResultsAction {
    if results.tutor.is_some() {
        return handle_tutor_input(results, session, key);
    }

    if results.export_confirm {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                results.export_confirm = false;
                return ResultsAction::Export;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                results.export_confirm = false;
            }
            _ => {}
        }
        return ResultsAction::None;
    }

    results.status_message = None;
    match key.code {
        KeyCode::Up => {
            results.selected = results.selected.saturating_sub(1);
            ResultsAction::None
        }
        KeyCode::Down => {
            if results.selected + 1 < session.len() {
                results.selected += 1;
            }
            ResultsAction::None
        }
        KeyCode::Enter => {
            results.expanded = match results.expanded {
                Some(i) if i == results.selected => None,
                _ => Some(results.selected),
            };
            ResultsAction::None
        }
        KeyCode::PageUp => {
            results.summary_scroll = results.summary_scroll.saturating_sub(5);
            ResultsAction::None
        }
        KeyCode::PageDown => {
            results.summary_scroll = results.summary_scroll.saturating_add(5);
            ResultsAction::None
        }
        KeyCode::Char('t') => {
            results.open_tutor(session);
            ResultsAction::None
        }
        KeyCode::Char('c') => match results.copy_text(session) {
            Some(text) => ResultsAction::Copy(text),
            None => {
                results.status_message =
                    Some("Expand a question with a tutor reply or code to copy".to_string());
                ResultsAction::None
            }
        },
        KeyCode::Char('e') => {
            if results.ready_summary().is_some() {
                results.export_confirm = true;
            } else {
                results.status_message = Some("The summary is not ready yet".to_string());
            }
            ResultsAction::None
        }
        KeyCode::Char('r') => ResultsAction::Restart,
        KeyCode::Char('q') | KeyCode::Esc => ResultsAction::Quit,
        _ => ResultsAction::None,
    }
}

fn handle_tutor_input(
    results: &mut ResultsState,
    session: &QuizSession,
    key: KeyEvent,
) -> ResultsAction {
    if key.code == KeyCode::Esc {
        results.tutor = None;
        return ResultsAction::None;
    }
    if key.code == KeyCode::Enter {
        return match results.submit_tutor(session) {
            Some(request) => ResultsAction::Ask(request),
            None => ResultsAction::None,
        };
    }

    let Some(prompt) = results.tutor.as_mut() else {
        return ResultsAction::None;
    };
    if prompt.is_asking || key.modifiers.contains(KeyModifiers::CONTROL) {
        return ResultsAction::None;
    }
    match key.code {
        KeyCode::Char(c) => prompt.input.push(c),
        KeyCode::Backspace => {
            prompt.input.pop();
        }
        _ => {}
    }
    ResultsAction::None
}
