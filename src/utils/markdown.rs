use lazy_static::lazy_static;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;

lazy_static! {
    static ref NUMBERED_ITEM: Regex = Regex::new(r"^(\d+)\.\s+(.*)$").unwrap();
    static ref INLINE: Regex = Regex::new(r"\*\*(.+?)\*\*|\*(.+?)\*|`([^`]+)`").unwrap();
    static ref FENCE_LANGUAGE: Regex = Regex::new(r"```(\w+)").unwrap();
    static ref FENCED_BLOCK: Regex = Regex::new(r"```(?:\w+)?\n([\s\S]*?)\n```").unwrap();
}

pub const DEFAULT_SNIPPET_LANGUAGE: &str = "javascript";

/// A question's code example with its fences removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSnippet {
    pub language: String,
    pub code: String,
}

pub fn parse_code_snippet(snippet: &str) -> CodeSnippet {
    let language = FENCE_LANGUAGE
        .captures(snippet)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| DEFAULT_SNIPPET_LANGUAGE.to_string());
    let code = FENCED_BLOCK.replace_all(snippet, "$1").trim().to_string();
    CodeSnippet { language, code }
}

fn code_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Render the study guide and tutor replies: headings, bullet and numbered
/// lists, block quotes, fenced code, pipe tables, and inline
/// **bold** / *italic* / `code`.
pub fn render_markdown(content: &str) -> Vec<Line<'static>> {
    let lines: Vec<&str> = content.lines().collect();
    let mut out: Vec<Line<'static>> = Vec::new();
    let mut in_code = false;
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        let trimmed = line.trim();

        if let Some(lang) = trimmed.strip_prefix("```") {
            if in_code {
                in_code = false;
            } else {
                in_code = true;
                if !lang.is_empty() {
                    out.push(Line::from(Span::styled(
                        format!("  [{}]", lang),
                        Style::default().add_modifier(Modifier::DIM),
                    )));
                }
            }
            i += 1;
            continue;
        }
        if in_code {
            out.push(Line::from(Span::styled(format!("  {}", line), code_style())));
            i += 1;
            continue;
        }

        if is_table_row(line) && lines.get(i + 1).is_some_and(|next| is_table_separator(next)) {
            let header = split_cells(line);
            i += 2;
            let mut rows = Vec::new();
            while i < lines.len() && is_table_row(lines[i]) {
                rows.push(split_cells(lines[i]));
                i += 1;
            }
            push_table(&header, &rows, &mut out);
            continue;
        }

        out.push(render_line(trimmed, line));
        i += 1;
    }

    out
}

fn render_line(trimmed: &str, raw: &str) -> Line<'static> {
    let heading_level = trimmed.chars().take_while(|c| *c == '#').count();
    if (1..=6).contains(&heading_level)
        && let Some(text) = trimmed[heading_level..].strip_prefix(' ')
    {
        let color = if heading_level == 1 {
            Color::Yellow
        } else {
            Color::LightBlue
        };
        return Line::from(Span::styled(
            text.to_string(),
            Style::default()
                .fg(color)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ));
    }

    if let Some(item) = trimmed.strip_prefix("- ").or_else(|| trimmed.strip_prefix("* ")) {
        let mut spans = vec![Span::raw("  • ")];
        spans.extend(parse_inline(item));
        return Line::from(spans);
    }

    if let Some(caps) = NUMBERED_ITEM.captures(trimmed)
        && let (Some(num), Some(item)) = (caps.get(1), caps.get(2))
    {
        let mut spans = vec![Span::raw(format!("  {}. ", num.as_str()))];
        spans.extend(parse_inline(item.as_str()));
        return Line::from(spans);
    }

    if let Some(quote) = trimmed.strip_prefix('>') {
        let mut spans = vec![Span::styled("│ ", Style::default().fg(Color::DarkGray))];
        spans.extend(
            parse_inline(quote.trim_start())
                .into_iter()
                .map(|s| s.patch_style(Style::default().add_modifier(Modifier::ITALIC))),
        );
        return Line::from(spans);
    }

    if trimmed.is_empty() {
        return Line::from("");
    }
    Line::from(parse_inline(raw))
}

fn parse_inline(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in INLINE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Span::raw(text[last..whole.start()].to_string()));
        }
        if let Some(bold) = caps.get(1) {
            spans.push(Span::styled(
                bold.as_str().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        } else if let Some(italic) = caps.get(2) {
            spans.push(Span::styled(
                italic.as_str().to_string(),
                Style::default().add_modifier(Modifier::ITALIC),
            ));
        } else if let Some(code) = caps.get(3) {
            spans.push(Span::styled(code.as_str().to_string(), code_style()));
        }
        last = whole.end();
    }

    if last < text.len() || spans.is_empty() {
        spans.push(Span::raw(text[last..].to_string()));
    }
    spans
}

fn is_table_row(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with('|') || (trimmed.contains('|') && trimmed.ends_with('|'))
}

fn is_table_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' '))
}

fn split_cells(line: &str) -> Vec<String> {
    line.trim()
        .trim_matches('|')
        .split('|')
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Tables become one "Header: value" line per cell so they wrap in narrow
/// panes.
fn push_table(header: &[String], rows: &[Vec<String>], out: &mut Vec<Line<'static>>) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    if rows.is_empty() {
        out.push(Line::from(Span::styled(header.join(" │ "), bold)));
        return;
    }
    for (n, row) in rows.iter().enumerate() {
        if n > 0 {
            out.push(Line::from(""));
        }
        for (col, cell) in row.iter().enumerate() {
            let name = header.get(col).map(String::as_str).unwrap_or("-");
            let mut spans = vec![Span::styled(format!("{}: ", name), bold)];
            spans.extend(parse_inline(cell));
            out.push(Line::from(spans));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_plain_and_empty_lines() {
        let result = render_markdown("Line 1\n\nLine 2");
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].to_string(), "Line 1");
        assert_eq!(result[1].to_string(), "");
    }

    #[test]
    fn test_guide_title_heading() {
        let result = render_markdown("# Interview Mastery Guide: Closures");
        assert_eq!(result.len(), 1);
        let span = &result[0].spans[0];
        assert_eq!(span.content, "Interview Mastery Guide: Closures");
        assert!(span.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_hash_without_space_is_text() {
        let result = render_markdown("#hashtag");
        assert_eq!(result[0].to_string(), "#hashtag");
    }

    #[test]
    fn test_inline_styles() {
        let result = render_markdown("Hello **bold** and *italic* with `code`");
        let spans = &result[0].spans;
        assert_eq!(spans[0].content, "Hello ");
        assert_eq!(spans[1].content, "bold");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[3].content, "italic");
        assert!(spans[3].style.add_modifier.contains(Modifier::ITALIC));
        assert_eq!(spans[5].content, "code");
        assert_eq!(spans[5].style.fg, Some(Color::Cyan));
    }

    #[test]
    fn test_lists() {
        let result = render_markdown("- **Hook**: think of a backpack\n1. First\n2. Second");
        assert_eq!(result.len(), 3);
        assert!(result[0].to_string().starts_with("  • "));
        assert!(result[0].to_string().contains("Hook"));
        assert!(result[2].to_string().contains("2. Second"));
    }

    #[test]
    fn test_fenced_code_is_not_formatted() {
        let result = render_markdown("Example:\n```rust\nlet x = *y * 2;\n```\nAfter");
        let combined = text_of(&result);
        assert!(combined.contains("[rust]"));
        assert!(combined.contains("let x = *y * 2;"));
        assert!(!combined.contains("```"));
        assert_eq!(result.last().unwrap().to_string(), "After");
    }

    #[test]
    fn test_block_quote() {
        let result = render_markdown("> Recall cue: move means ownership transfer");
        assert!(result[0].to_string().starts_with("│ "));
        assert!(result[0].to_string().contains("Recall cue"));
    }

    #[test]
    fn test_table() {
        let result = render_markdown("| Concept | Cue |\n|---|---|\n| Rc | shared |\n\nAfter");
        let combined = text_of(&result);
        assert!(combined.contains("Concept: Rc"));
        assert!(combined.contains("Cue: shared"));
        assert!(combined.contains("After"));
    }

    #[test]
    fn test_parse_code_snippet_with_language() {
        let snippet = parse_code_snippet("```python\nprint('hi')\n```");
        assert_eq!(snippet.language, "python");
        assert_eq!(snippet.code, "print('hi')");
    }

    #[test]
    fn test_parse_code_snippet_defaults_to_javascript() {
        let snippet = parse_code_snippet("  const a = 1;\n");
        assert_eq!(snippet.language, DEFAULT_SNIPPET_LANGUAGE);
        assert_eq!(snippet.code, "const a = 1;");
    }
}
