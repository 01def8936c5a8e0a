use crate::models::{ConfidenceLevel, QuizOutcome, QuizSession, OPTION_COUNT};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

/// Accrues whole seconds for the question on screen.
#[derive(Debug, Clone, Copy)]
pub struct QuestionTimer {
    anchor: Instant,
}

impl QuestionTimer {
    pub fn new(now: Instant) -> Self {
        Self { anchor: now }
    }

    /// Whole seconds elapsed since the last collection. The sub-second
    /// remainder stays on the clock.
    pub fn collect(&mut self, now: Instant) -> u64 {
        let secs = now.saturating_duration_since(self.anchor).as_secs();
        self.anchor += Duration::from_secs(secs);
        secs
    }

    pub fn restart(&mut self, now: Instant) {
        self.anchor = now;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionPhase {
    Answer,
    Confidence,
}

#[derive(Debug, PartialEq)]
pub enum QuizAction {
    None,
    Finished(QuizOutcome),
    Abandon,
}

#[derive(Debug)]
pub struct QuizStage {
    pub current_index: usize,
    pub highlighted: usize,
    pub phase: QuestionPhase,
    pub quit_prompt: bool,
    answers: Vec<Option<usize>>,
    confidences: Vec<ConfidenceLevel>,
    times: Vec<u64>,
    confidence_step: bool,
    timer: QuestionTimer,
}

impl QuizStage {
    pub fn new(session: &QuizSession, confidence_step: bool, now: Instant) -> Self {
        Self {
            current_index: 0,
            highlighted: 0,
            phase: QuestionPhase::Answer,
            quit_prompt: false,
            answers: session.user_answers().to_vec(),
            confidences: session.user_confidences().to_vec(),
            times: session.question_times().to_vec(),
            confidence_step,
            timer: QuestionTimer::new(now),
        }
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    pub fn confidences(&self) -> &[ConfidenceLevel] {
        &self.confidences
    }

    pub fn times(&self) -> &[u64] {
        &self.times
    }

    pub fn confidence_step(&self) -> bool {
        self.confidence_step
    }

    pub fn current_answer(&self) -> Option<usize> {
        self.answers[self.current_index]
    }

    pub fn is_last(&self) -> bool {
        self.current_index + 1 == self.len()
    }

    /// Credit the current question with the seconds elapsed so far.
    pub fn tick(&mut self, now: Instant) {
        if self.is_empty() {
            return;
        }
        self.times[self.current_index] += self.timer.collect(now);
    }

    pub fn select_option(&mut self, option: usize) {
        if option >= OPTION_COUNT || self.phase != QuestionPhase::Answer {
            return;
        }
        self.answers[self.current_index] = Some(option);
        self.highlighted = option;
        if self.confidence_step {
            self.phase = QuestionPhase::Confidence;
        }
    }

    pub fn select_confidence(&mut self, level: ConfidenceLevel, now: Instant) -> Option<QuizOutcome> {
        if self.phase != QuestionPhase::Confidence || self.current_answer().is_none() {
            return None;
        }
        self.confidences[self.current_index] = level;
        self.phase = QuestionPhase::Answer;
        self.advance(now)
    }

    /// Move forward from an answered question.
    pub fn next(&mut self, now: Instant) -> Option<QuizOutcome> {
        if self.current_answer().is_none() || self.phase != QuestionPhase::Answer {
            return None;
        }
        if self.confidence_step {
            self.phase = QuestionPhase::Confidence;
            return None;
        }
        self.advance(now)
    }

    pub fn previous(&mut self, now: Instant) {
        if self.current_index == 0 {
            return;
        }
        self.move_to(self.current_index - 1, now);
    }

    pub fn outcome(&self) -> QuizOutcome {
        QuizOutcome {
            answers: self.answers.clone(),
            confidences: self.confidences.clone(),
            times: self.times.clone(),
        }
    }

    fn advance(&mut self, now: Instant) -> Option<QuizOutcome> {
        if self.is_last() {
            self.tick(now);
            return Some(self.outcome());
        }
        self.move_to(self.current_index + 1, now);
        None
    }

    fn move_to(&mut self, index: usize, now: Instant) {
        self.tick(now);
        self.timer.restart(now);
        self.current_index = index;
        self.phase = QuestionPhase::Answer;
        self.highlighted = self.answers[index].unwrap_or(0);
    }
}

fn option_for_key(c: char) -> Option<usize> {
    match c.to_ascii_lowercase() {
        '1' | 'a' => Some(0),
        '2' | 'b' => Some(1),
        '3' | 'c' => Some(2),
        '4' | 'd' => Some(3),
        _ => None,
    }
}

fn confidence_for_key(c: char) -> Option<ConfidenceLevel> {
    match c.to_ascii_lowercase() {
        '1' | 'l' => Some(ConfidenceLevel::Low),
        '2' | 'n' => Some(ConfidenceLevel::Neutral),
        '3' | 'h' => Some(ConfidenceLevel::High),
        _ => None,
    }
}

pub fn handle_quiz_input(stage: &mut QuizStage, key: KeyEvent, now: Instant) -> QuizAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return QuizAction::None;
    }

    if stage.quit_prompt {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => return QuizAction::Abandon,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => stage.quit_prompt = false,
            _ => {}
        }
        return QuizAction::None;
    }

    match stage.phase {
        QuestionPhase::Answer => match key.code {
            KeyCode::Esc => {
                stage.quit_prompt = true;
                QuizAction::None
            }
            KeyCode::Char(' ') => {
                stage.select_option(stage.highlighted);
                QuizAction::None
            }
            KeyCode::Char(c) => {
                if let Some(option) = option_for_key(c) {
                    stage.select_option(option);
                }
                QuizAction::None
            }
            KeyCode::Up => {
                stage.highlighted = stage.highlighted.saturating_sub(1);
                QuizAction::None
            }
            KeyCode::Down => {
                if stage.highlighted + 1 < OPTION_COUNT {
                    stage.highlighted += 1;
                }
                QuizAction::None
            }
            KeyCode::Enter => match stage.next(now) {
                Some(outcome) => QuizAction::Finished(outcome),
                None => QuizAction::None,
            },
            KeyCode::Left | KeyCode::Backspace => {
                stage.previous(now);
                QuizAction::None
            }
            _ => QuizAction::None,
        },
        QuestionPhase::Confidence => match key.code {
            KeyCode::Esc => {
                stage.phase = QuestionPhase::Answer;
                QuizAction::None
            }
            KeyCode::Char(c) => match confidence_for_key(c)
                .and_then(|level| stage.select_confidence(level, now))
            {
                Some(outcome) => QuizAction::Finished(outcome),
                None => QuizAction::None,
            },
            KeyCode::Left | KeyCode::Backspace => {
                stage.previous(now);
                QuizAction::None
            }
            _ => QuizAction::None,
        },
    }
}
