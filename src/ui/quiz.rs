use crate::models::{ConfidenceLevel, QuizSession};
use crate::quiz::{QuestionPhase, QuizStage};
use crate::ui::layout::calculate_quiz_chunks;
use crate::ui::{draw_confirmation, help_line};
use crate::utils::format_clock;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn draw_quiz(f: &mut Frame, session: &QuizSession, stage: &QuizStage) {
    let layout = calculate_quiz_chunks(f.area());
    let index = stage.current_index;
    let question = &session.questions()[index];

    let answered = stage.answers().iter().filter(|a| a.is_some()).count();
    let ratio = if stage.is_empty() {
        0.0
    } else {
        answered as f64 / stage.len() as f64
    };
    let header = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Question {} / {} · {} ",
            index + 1,
            stage.len(),
            session.difficulty().label()
        )))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio)
        .label(format!("⏱ {}", format_clock(stage.times()[index])));
    f.render_widget(header, layout.header_area);

    let mut question_text = Text::default();
    if let Some(kind) = question.kind {
        question_text.push_line(Line::from(Span::styled(
            format!("[{}]", kind.label()),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )));
        question_text.push_line(Line::from(""));
    }
    question_text.push_line(Line::from(question.question.as_str()));
    let question_widget = Paragraph::new(question_text)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(" Question "));
    f.render_widget(question_widget, layout.question_area);

    let chosen = stage.current_answer();
    let mut options = Text::default();
    for (i, option) in question.options.iter().enumerate() {
        let is_chosen = chosen == Some(i);
        let is_highlighted = stage.highlighted == i && stage.phase == QuestionPhase::Answer;
        let marker = if is_chosen { "●" } else { "○" };
        let mut style = Style::default();
        if is_chosen {
            style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        }
        if is_highlighted {
            style = style.add_modifier(Modifier::REVERSED);
        }
        options.push_line(Line::from(vec![
            Span::styled(format!(" {} {}) ", marker, OPTION_LABELS[i]), style),
            Span::styled(option.clone(), style),
        ]));
    }

    if stage.phase == QuestionPhase::Confidence {
        options.push_line(Line::from(""));
        options.push_line(Line::from(Span::styled(
            "How sure are you?",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        let current = stage.confidences()[index];
        let spans: Vec<Span> = ConfidenceLevel::ALL
            .iter()
            .enumerate()
            .map(|(n, level)| {
                let style = if *level == current {
                    Style::default().add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                Span::styled(format!(" [{}] {}  ", n + 1, level.label()), style)
            })
            .collect();
        options.push_line(Line::from(spans));
    }

    let options_widget = Paragraph::new(options)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(" Options "));
    f.render_widget(options_widget, layout.options_area);

    let help = match stage.phase {
        QuestionPhase::Answer => {
            let mut hints = vec![("1-4/a-d", " Select  "), ("↑/↓ Space", " Pick  ")];
            if chosen.is_some() {
                hints.push((
                    "Enter",
                    if stage.confidence_step() || !stage.is_last() {
                        " Next  "
                    } else {
                        " Finish  "
                    },
                ));
            }
            if index > 0 {
                hints.push(("←", " Back  "));
            }
            hints.push(("Esc", " Quit"));
            help_line(&hints)
        }
        QuestionPhase::Confidence => help_line(&[
            ("1/l", " Low  "),
            ("2/n", " Neutral  "),
            ("3/h", " High  "),
            ("Esc", " Change answer"),
        ]),
    };
    f.render_widget(
        Paragraph::new(help)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        layout.help_area,
    );

    if stage.quit_prompt {
        draw_confirmation(
            f,
            "Abandon Quiz",
            "Your progress on this quiz will be lost.",
            "Abandon",
            "Keep going",
        );
    }
}
