use crate::ai::SUMMARY_FALLBACK;
use crate::models::QuizSession;
use crate::results::{ResultsState, SummaryStatus};
use crate::stats::{self, Mastery};
use crate::ui::layout::calculate_results_chunks;
use crate::ui::{draw_confirmation, help_line, tutor_popup};
use crate::utils::markdown::{parse_code_snippet, render_markdown};
use crate::utils::{
    calculate_max_scroll, estimate_text_height, format_duration, truncate_string,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

fn mastery_color(mastery: Mastery) -> Color {
    match mastery {
        Mastery::Mastered => Color::Green,
        Mastery::Illusion => Color::Red,
        Mastery::Lucky => Color::Yellow,
        Mastery::Gap => Color::Magenta,
    }
}

pub fn draw_results(f: &mut Frame, session: &QuizSession, results: &mut ResultsState) {
    let layout = calculate_results_chunks(f.area());

    let score = stats::score(session);
    let header = Paragraph::new(format!(
        "Score {}/{} · {}% accuracy · {} · {}",
        score,
        session.len(),
        stats::accuracy(session),
        format_duration(stats::total_elapsed(session)),
        session.difficulty().label()
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).title(" Results "));
    f.render_widget(header, layout.header_area);

    draw_mastery(f, session, layout.stats_area);
    draw_review(f, session, results, layout.review_area);
    draw_summary(f, results, layout.summary_area);

    let footer = match &results.status_message {
        Some(message) => Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Yellow),
        )),
        None => help_line(&[
            ("↑/↓", " Select  "),
            ("Enter", " Expand  "),
            ("t", " Ask tutor  "),
            ("PgUp/PgDn", " Scroll guide  "),
            ("c", " Copy  "),
            ("e", " Export  "),
            ("r", " New quiz  "),
            ("q", " Quit"),
        ]),
    };
    f.render_widget(
        Paragraph::new(footer)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        layout.footer_area,
    );

    if let Some(prompt) = &results.tutor
        && let Some(question) = session.questions().get(prompt.question_index)
    {
        tutor_popup::draw_tutor_popup(f, prompt, question);
    }

    if results.export_confirm {
        draw_confirmation(
            f,
            "Export Cheatsheet",
            "Save the study guide as a markdown file?",
            "Save",
            "Cancel",
        );
    }
}

fn draw_mastery(f: &mut Frame, session: &QuizSession, area: ratatui::layout::Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Confidence vs. correctness ");

    let Some(breakdown) = stats::mastery_breakdown(session) else {
        let note = Paragraph::new("Confidence was not collected for this quiz.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(note, area);
        return;
    };

    let inner = block.inner(area);
    f.render_widget(block, area);

    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(inner);

    let entries = [
        (Mastery::Mastered, breakdown.mastered),
        (Mastery::Illusion, breakdown.illusions),
        (Mastery::Lucky, breakdown.lucky),
        (Mastery::Gap, breakdown.gaps),
    ];
    for ((mastery, count), cell) in entries.into_iter().zip(cells.iter()) {
        let style = Style::default()
            .fg(mastery_color(mastery))
            .add_modifier(Modifier::BOLD);
        let widget = Paragraph::new(vec![
            Line::from(Span::styled(count.to_string(), style)),
            Line::from(Span::styled(mastery.label(), Style::default().fg(Color::Gray))),
        ])
        .alignment(Alignment::Center);
        f.render_widget(widget, *cell);
    }
}

fn draw_review(
    f: &mut Frame,
    session: &QuizSession,
    results: &ResultsState,
    area: ratatui::layout::Rect,
) {
    let width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();
    let mut selected_line = 0;

    for (i, question) in session.questions().iter().enumerate() {
        let answer = session.user_answers()[i];
        let correct = question.is_correct(answer);
        let selected = i == results.selected;
        if selected {
            selected_line = lines.len();
        }

        let (mark, color) = if correct {
            ("✓", Color::Green)
        } else {
            ("✗", Color::Red)
        };
        let mut title_style = Style::default();
        if selected {
            title_style = title_style.add_modifier(Modifier::REVERSED);
        }
        let mut title = vec![
            Span::styled(format!("{} ", mark), Style::default().fg(color)),
            Span::styled(
                truncate_string(
                    &format!("{}. {}", i + 1, question.question),
                    width.saturating_sub(10),
                ),
                title_style,
            ),
            Span::styled(
                format!("  {}", format_duration(session.question_times()[i])),
                Style::default().fg(Color::DarkGray),
            ),
        ];
        if session.confidence_collected() {
            let mastery = stats::classify(correct, session.user_confidences()[i]);
            title.push(Span::styled(" ■", Style::default().fg(mastery_color(mastery))));
        }
        lines.push(Line::from(title));

        if results.expanded != Some(i) {
            continue;
        }

        for (o, option) in question.options.iter().enumerate() {
            let (prefix, style) = if o == question.correct_answer_index {
                ("✓", Style::default().fg(Color::Green))
            } else if answer == Some(o) {
                ("✗", Style::default().fg(Color::Red))
            } else {
                (" ", Style::default().fg(Color::Gray))
            };
            lines.push(Line::from(Span::styled(
                format!("   {} {}) {}", prefix, OPTION_LABELS[o], option),
                style,
            )));
        }
        if answer.is_none() {
            lines.push(Line::from(Span::styled(
                "   (not answered)",
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "   Why:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.extend(indent(render_markdown(&question.explanation)));

        if let Some(code) = &question.code_example {
            let snippet = parse_code_snippet(code);
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("   {} snippet", snippet.language.to_uppercase()),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for code_line in snippet.code.lines() {
                lines.push(Line::from(Span::styled(
                    format!("     {}", code_line),
                    Style::default().fg(Color::Cyan),
                )));
            }
        }

        if let Some(reply) = results.tutor_response(&question.id) {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("   You asked: {}", reply.user_query),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::ITALIC),
            )));
            lines.extend(indent(render_markdown(&reply.ai_response)));
        } else if results.is_tutor_pending(&question.id) {
            lines.push(Line::from(Span::styled(
                "   The tutor is thinking...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "   Press t to ask the tutor about this question",
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
    }

    let visible = area.height.saturating_sub(2) as usize;
    let scroll = selected_line.saturating_sub(visible / 3) as u16;

    let review = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().borders(Borders::ALL).title(" Review "));
    f.render_widget(review, area);
}

fn indent(lines: Vec<Line<'static>>) -> Vec<Line<'static>> {
    lines
        .into_iter()
        .map(|line| {
            let mut spans = vec![Span::raw("   ")];
            spans.extend(line.spans);
            Line::from(spans)
        })
        .collect()
}

fn draw_summary(f: &mut Frame, results: &mut ResultsState, area: ratatui::layout::Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Study guide ");
    let text = match &results.summary {
        SummaryStatus::Pending => Text::from(Span::styled(
            "Writing your study guide...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )),
        SummaryStatus::Failed => Text::from(Span::styled(
            SUMMARY_FALLBACK,
            Style::default().fg(Color::Red),
        )),
        SummaryStatus::Ready(markdown) => Text::from(render_markdown(markdown)),
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    let content_height = text
        .lines
        .iter()
        .map(|line| estimate_text_height(&line.to_string(), inner_width))
        .fold(0u16, u16::saturating_add);
    let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
    let max_scroll = calculate_max_scroll(content_height, area.height.saturating_sub(2));
    results.summary_scroll = results.summary_scroll.min(max_scroll);

    f.render_widget(
        paragraph.scroll((results.summary_scroll, 0)).block(block),
        area,
    );
}
