use crate::models::Question;
use crate::results::TutorPrompt;
use crate::ui::help_line;
use crate::ui::layout::centered_rect;
use crate::utils::calculate_wrapped_cursor_position;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn draw_tutor_popup(f: &mut Frame, prompt: &TutorPrompt, question: &Question) {
    let area = centered_rect(70, 50, f.area());
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(5),
            Constraint::Length(1),
        ])
        .split(area);

    let mut context = Text::default();
    context.push_line(Line::from(Span::styled(
        question.question.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    context.push_line(Line::from(""));
    context.push_line(Line::from(Span::styled(
        format!("Correct answer: {}", question.correct_option()),
        Style::default().fg(Color::Green),
    )));
    if prompt.is_asking {
        context.push_line(Line::from(""));
        context.push_line(Line::from(Span::styled(
            "The tutor is thinking...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    if let Some(error) = &prompt.error {
        context.push_line(Line::from(""));
        context.push_line(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }
    let context_widget = Paragraph::new(context).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Ask the tutor · Q{} ", prompt.question_index + 1))
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(context_widget, chunks[0]);

    let input_text = if prompt.input.is_empty() {
        Text::from(Span::styled(
            "What part of this is unclear?",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(prompt.input.as_str())
    };
    let input = Paragraph::new(input_text).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Your question ")
            .border_style(if prompt.is_asking {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::Yellow)
            }),
    );
    f.render_widget(input, chunks[1]);

    if !prompt.is_asking {
        let width = chunks[1].width.saturating_sub(2) as usize;
        let (line, col) = calculate_wrapped_cursor_position(&prompt.input, prompt.input.len(), width);
        f.set_cursor_position((chunks[1].x + 1 + col as u16, chunks[1].y + 1 + line as u16));
    }

    let help = Paragraph::new(help_line(&[("Enter", " Ask  "), ("Esc", " Close")]))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, chunks[2]);
}
