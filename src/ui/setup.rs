use crate::setup::{SetupFocus, SetupState};
use crate::ui::help_line;
use crate::ui::layout::calculate_setup_chunks;
use crate::utils::calculate_wrapped_cursor_position;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn draw_setup(
    f: &mut Frame,
    setup: &mut SetupState,
    error: Option<&str>,
    ai_ready: bool,
    model: &str,
) {
    let layout = calculate_setup_chunks(f.area());

    let title = Paragraph::new("Interview Quiz · paste your study notes")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, layout.header_area);

    // Editor
    let editor_focused = setup.focus == SetupFocus::Editor;
    let text_width = layout.editor_area.width.saturating_sub(2) as usize;
    let visible_height = layout.editor_area.height.saturating_sub(2) as usize;
    let (cursor_line, cursor_col) =
        calculate_wrapped_cursor_position(&setup.draft, setup.cursor_position, text_width);

    let mut scroll = setup.input_scroll_y as usize;
    if cursor_line < scroll {
        scroll = cursor_line;
    } else if visible_height > 0 && cursor_line >= scroll + visible_height {
        scroll = cursor_line + 1 - visible_height;
    }
    setup.input_scroll_y = scroll as u16;

    let editor_text = if setup.draft.is_empty() {
        Text::from(Span::styled(
            "[Paste or type notes here, or pick a file on the right...]",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ))
    } else {
        Text::from(setup.draft.as_str())
    };
    let editor = Paragraph::new(editor_text)
        .wrap(Wrap { trim: false })
        .scroll((setup.input_scroll_y, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Notes ({} chars) ", setup.draft.chars().count()))
                .border_style(focus_style(editor_focused)),
        );
    f.render_widget(editor, layout.editor_area);

    if editor_focused {
        let x = layout.editor_area.x + 1 + cursor_col as u16;
        let y = layout.editor_area.y + 1 + (cursor_line as u16).saturating_sub(setup.input_scroll_y);
        f.set_cursor_position((x, y));
    }

    // Settings
    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let ai_line = if ai_ready {
        Span::styled(model.to_string(), Style::default().fg(Color::Green))
    } else {
        Span::styled(
            "disabled (set OPENROUTER_API_KEY)",
            Style::default().fg(Color::Red),
        )
    };
    let settings = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Level:     ", label),
            Span::styled(setup.difficulty.label(), value),
        ]),
        Line::from(Span::styled(
            format!("           {}", setup.difficulty.description()),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(vec![
            Span::styled("Questions: ", label),
            Span::styled(setup.question_count().to_string(), value),
        ]),
        Line::from(vec![Span::styled("Model:     ", label), ai_line]),
    ])
    .wrap(Wrap { trim: false })
    .block(Block::default().borders(Borders::ALL).title(" Settings "));
    f.render_widget(settings, layout.settings_area);

    // Note files
    let files_focused = setup.focus == SetupFocus::Files;
    let items: Vec<ListItem> = if setup.note_files.is_empty() {
        vec![ListItem::new("No .md or .txt files found").style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]
    } else {
        setup
            .note_files
            .iter()
            .enumerate()
            .map(|(i, path)| {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string());
                let style = if i == setup.selected_file_index && files_focused {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(name).style(style)
            })
            .collect()
    };
    let files = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Note files ")
            .border_style(focus_style(files_focused)),
    );
    f.render_widget(files, layout.files_area);

    // Status line: error banner wins over notices.
    let status = if let Some(error) = error {
        Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if let Some(notice) = &setup.notice {
        Line::from(Span::styled(notice.clone(), Style::default().fg(Color::Yellow)))
    } else {
        Line::from("")
    };
    f.render_widget(Paragraph::new(status), layout.status_area);

    let mut hints = vec![
        ("Tab", " Switch panel  "),
        ("Ctrl+D", " Level  "),
        ("Ctrl+N", " Count  "),
    ];
    if setup.can_submit() {
        hints.push(("Ctrl+S", " Generate quiz  "));
    }
    hints.push(("Esc", " Quit"));
    let help = Paragraph::new(help_line(&hints))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}
