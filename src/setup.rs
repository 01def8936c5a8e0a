use crate::models::{DifficultyLevel, QuizRequest, QUESTION_COUNTS};
use crate::notes::load_note_file;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupFocus {
    Editor,
    Files,
}

/// What the event loop should do after a setup key press.
#[derive(Debug, PartialEq)]
pub enum SetupAction {
    None,
    DraftChanged,
    Submit(QuizRequest),
    Quit,
}

#[derive(Debug)]
pub struct SetupState {
    pub draft: String,
    /// Byte offset into `draft`, always on a char boundary.
    pub cursor_position: usize,
    pub input_scroll_y: u16,
    pub focus: SetupFocus,
    pub note_files: Vec<PathBuf>,
    pub selected_file_index: usize,
    pub difficulty: DifficultyLevel,
    count_index: usize,
    pub notice: Option<String>,
}

impl SetupState {
    pub fn new(draft: String, note_files: Vec<PathBuf>, default_count: usize) -> Self {
        let count_index = QUESTION_COUNTS
            .iter()
            .position(|c| *c == default_count)
            .unwrap_or(1);
        Self {
            cursor_position: draft.len(),
            draft,
            input_scroll_y: 0,
            focus: SetupFocus::Editor,
            note_files,
            selected_file_index: 0,
            difficulty: DifficultyLevel::default(),
            count_index,
            notice: None,
        }
    }

    pub fn question_count(&self) -> usize {
        QUESTION_COUNTS[self.count_index]
    }

    pub fn cycle_question_count(&mut self) {
        self.count_index = (self.count_index + 1) % QUESTION_COUNTS.len();
    }

    pub fn cycle_difficulty(&mut self) {
        self.difficulty = self.difficulty.next();
    }

    pub fn can_submit(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    pub fn submission(&self) -> Option<QuizRequest> {
        if !self.can_submit() {
            return None;
        }
        Some(QuizRequest {
            source_text: self.draft.clone(),
            difficulty: self.difficulty,
            question_count: self.question_count(),
        })
    }

    pub fn replace_draft(&mut self, text: String) {
        self.draft = text;
        self.cursor_position = self.draft.len();
        self.input_scroll_y = 0;
    }

    fn insert_char(&mut self, c: char) {
        self.draft.insert(self.cursor_position, c);
        self.cursor_position += c.len_utf8();
    }

    fn delete_before_cursor(&mut self) -> bool {
        let Some(prev) = self.draft[..self.cursor_position].chars().next_back() else {
            return false;
        };
        self.cursor_position -= prev.len_utf8();
        self.draft.remove(self.cursor_position);
        true
    }

    fn move_left(&mut self) {
        if let Some(prev) = self.draft[..self.cursor_position].chars().next_back() {
            self.cursor_position -= prev.len_utf8();
        }
    }

    fn move_right(&mut self) {
        if let Some(next) = self.draft[self.cursor_position..].chars().next() {
            self.cursor_position += next.len_utf8();
        }
    }

    fn load_selected_file(&mut self) -> SetupAction {
        let Some(path) = self.note_files.get(self.selected_file_index) else {
            return SetupAction::None;
        };
        match load_note_file(path) {
            Ok(text) => {
                self.notice = Some(format!("Loaded {}", path.display()));
                self.replace_draft(text);
                self.focus = SetupFocus::Editor;
                SetupAction::DraftChanged
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "failed to read note file");
                self.notice = Some(format!("Could not read {}", path.display()));
                SetupAction::None
            }
        }
    }
}

pub fn handle_setup_input(setup: &mut SetupState, key: KeyEvent) -> SetupAction {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('d') => {
                setup.cycle_difficulty();
                SetupAction::None
            }
            KeyCode::Char('n') => {
                setup.cycle_question_count();
                SetupAction::None
            }
            KeyCode::Char('s') => match setup.submission() {
                Some(request) => SetupAction::Submit(request),
                None => {
                    setup.notice = Some("Add some study notes first".to_string());
                    SetupAction::None
                }
            },
            _ => SetupAction::None,
        };
    }

    match key.code {
        KeyCode::Esc => SetupAction::Quit,
        KeyCode::Tab => {
            setup.focus = match setup.focus {
                SetupFocus::Editor => SetupFocus::Files,
                SetupFocus::Files => SetupFocus::Editor,
            };
            SetupAction::None
        }
        _ => match setup.focus {
            SetupFocus::Files => handle_files_input(setup, key.code),
            SetupFocus::Editor => handle_editor_input(setup, key.code),
        },
    }
}

fn handle_files_input(setup: &mut SetupState, code: KeyCode) -> SetupAction {
    match code {
        KeyCode::Up => {
            setup.selected_file_index = setup.selected_file_index.saturating_sub(1);
            SetupAction::None
        }
        KeyCode::Down => {
            if setup.selected_file_index + 1 < setup.note_files.len() {
                setup.selected_file_index += 1;
            }
            SetupAction::None
        }
        KeyCode::Enter => setup.load_selected_file(),
        _ => SetupAction::None,
    }
}

fn handle_editor_input(setup: &mut SetupState, code: KeyCode) -> SetupAction {
    match code {
        KeyCode::Char(c) => {
            setup.insert_char(c);
            SetupAction::DraftChanged
        }
        KeyCode::Enter => {
            setup.insert_char('\n');
            SetupAction::DraftChanged
        }
        KeyCode::Backspace => {
            if setup.delete_before_cursor() {
                SetupAction::DraftChanged
            } else {
                SetupAction::None
            }
        }
        KeyCode::Left => {
            setup.move_left();
            SetupAction::None
        }
        KeyCode::Right => {
            setup.move_right();
            SetupAction::None
        }
        KeyCode::Home => {
            setup.cursor_position = 0;
            SetupAction::None
        }
        KeyCode::End => {
            setup.cursor_position = setup.draft.len();
            SetupAction::None
        }
        _ => SetupAction::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn test_defaults() {
        let setup = SetupState::new(String::new(), vec![], 10);
        assert_eq!(setup.difficulty, DifficultyLevel::Medium);
        assert_eq!(setup.question_count(), 10);
        assert_eq!(setup.focus, SetupFocus::Editor);
    }

    #[test]
    fn test_unknown_default_count_falls_back_to_ten() {
        let setup = SetupState::new(String::new(), vec![], 7);
        assert_eq!(setup.question_count(), 10);
    }

    #[test]
    fn test_restored_draft_places_cursor_at_end() {
        let setup = SetupState::new("saved notes".to_string(), vec![], 10);
        assert_eq!(setup.cursor_position, "saved notes".len());
    }

    #[test]
    fn test_typing_reports_draft_change() {
        let mut setup = SetupState::new(String::new(), vec![], 10);
        assert_eq!(
            handle_setup_input(&mut setup, key(KeyCode::Char('h'))),
            SetupAction::DraftChanged
        );
        handle_setup_input(&mut setup, key(KeyCode::Char('i')));
        handle_setup_input(&mut setup, key(KeyCode::Enter));
        assert_eq!(setup.draft, "hi\n");
    }

    #[test]
    fn test_backspace_handles_multibyte_chars() {
        let mut setup = SetupState::new("añ".to_string(), vec![], 10);
        assert_eq!(
            handle_setup_input(&mut setup, key(KeyCode::Backspace)),
            SetupAction::DraftChanged
        );
        assert_eq!(setup.draft, "a");
        assert_eq!(setup.cursor_position, 1);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut setup = SetupState::new("abc".to_string(), vec![], 10);
        setup.cursor_position = 0;
        assert_eq!(
            handle_setup_input(&mut setup, key(KeyCode::Backspace)),
            SetupAction::None
        );
        assert_eq!(setup.draft, "abc");
    }

    #[test]
    fn test_insert_in_middle() {
        let mut setup = SetupState::new("Helo".to_string(), vec![], 10);
        handle_setup_input(&mut setup, key(KeyCode::Left));
        handle_setup_input(&mut setup, key(KeyCode::Char('l')));
        assert_eq!(setup.draft, "Hello");
        assert_eq!(setup.cursor_position, 4);
    }

    #[test]
    fn test_submit_blocked_for_whitespace_draft() {
        let mut setup = SetupState::new("  \n\t ".to_string(), vec![], 10);
        assert!(!setup.can_submit());
        assert_eq!(handle_setup_input(&mut setup, ctrl('s')), SetupAction::None);
        assert!(setup.notice.is_some());
    }

    #[test]
    fn test_submit_carries_selection() {
        let mut setup = SetupState::new("Tokio runtimes".to_string(), vec![], 10);
        handle_setup_input(&mut setup, ctrl('d'));
        handle_setup_input(&mut setup, ctrl('n'));

        match handle_setup_input(&mut setup, ctrl('s')) {
            SetupAction::Submit(request) => {
                assert_eq!(request.source_text, "Tokio runtimes");
                assert_eq!(request.difficulty, DifficultyLevel::Senior);
                assert_eq!(request.question_count, 15);
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_question_count_wraps() {
        let mut setup = SetupState::new(String::new(), vec![], 20);
        setup.cycle_question_count();
        assert_eq!(setup.question_count(), 5);
    }

    #[test]
    fn test_ctrl_chars_do_not_edit_draft() {
        let mut setup = SetupState::new("x".to_string(), vec![], 10);
        handle_setup_input(&mut setup, ctrl('d'));
        assert_eq!(setup.draft, "x");
    }

    #[test]
    fn test_load_note_file_replaces_draft() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rust.md");
        std::fs::write(&path, "# Traits\nDynamic dispatch").unwrap();

        let mut setup = SetupState::new("old".to_string(), vec![path], 10);
        handle_setup_input(&mut setup, key(KeyCode::Tab));
        assert_eq!(setup.focus, SetupFocus::Files);

        let action = handle_setup_input(&mut setup, key(KeyCode::Enter));
        assert_eq!(action, SetupAction::DraftChanged);
        assert_eq!(setup.draft, "# Traits\nDynamic dispatch");
        assert_eq!(setup.focus, SetupFocus::Editor);
    }

    #[test]
    fn test_file_selection_bounds() {
        let mut setup = SetupState::new(
            String::new(),
            vec![PathBuf::from("a.md"), PathBuf::from("b.md")],
            10,
        );
        setup.focus = SetupFocus::Files;
        handle_setup_input(&mut setup, key(KeyCode::Up));
        assert_eq!(setup.selected_file_index, 0);
        handle_setup_input(&mut setup, key(KeyCode::Down));
        handle_setup_input(&mut setup, key(KeyCode::Down));
        assert_eq!(setup.selected_file_index, 1);
    }
}
