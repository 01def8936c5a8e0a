use crate::models::DifficultyLevel;
use crate::ui::layout::centered_rect;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn draw_loading(f: &mut Frame, difficulty: DifficultyLevel, count: usize, tick: usize) {
    let area = centered_rect(60, 30, f.area());

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("{} Generating your quiz", SPINNER[tick % SPINNER.len()]),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("{} questions · {}", count, difficulty.label())),
        Line::from(Span::styled(
            difficulty.description(),
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )),
    ];

    let body = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Please wait "));
    f.render_widget(body, area);
}
