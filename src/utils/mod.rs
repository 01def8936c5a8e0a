use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub mod markdown;

/// Shorten `s` to at most `max_width` display columns, ending in "...".
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push_str("...");
    out
}

/// One visual row of wrapped text, as byte offsets into the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct VisualRow {
    start: usize,
    end: usize,
}

/// Break `text` into rows the way a character-wrapping paragraph would:
/// hard breaks on '\n', soft breaks once a row reaches `max_width` columns.
fn visual_rows(text: &str, max_width: usize) -> Vec<VisualRow> {
    let max_width = max_width.max(1);
    let mut rows = Vec::new();
    let mut start = 0;
    let mut width = 0;

    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            rows.push(VisualRow { start, end: idx });
            start = idx + 1;
            width = 0;
            continue;
        }
        let w = ch.width().unwrap_or(0);
        if width + w > max_width && width > 0 {
            rows.push(VisualRow { start, end: idx });
            start = idx;
            width = 0;
        }
        width += w;
    }
    rows.push(VisualRow {
        start,
        end: text.len(),
    });
    rows
}

/// Row and display column of a byte-offset cursor inside wrapped text.
pub fn calculate_wrapped_cursor_position(
    text: &str,
    cursor: usize,
    max_width: usize,
) -> (usize, usize) {
    let cursor = cursor.min(text.len());
    let rows = visual_rows(text, max_width);

    // A cursor sitting exactly on a soft break belongs to the later row.
    let row_idx = rows
        .iter()
        .rposition(|row| row.start <= cursor)
        .unwrap_or(0);
    let row = rows[row_idx];
    let end = cursor.min(row.end).max(row.start);
    (row_idx, text[row.start..end].width())
}

/// Number of rows `text` occupies when wrapped to `max_width`.
pub fn estimate_text_height(text: &str, max_width: usize) -> u16 {
    visual_rows(text, max_width).len().min(u16::MAX as usize) as u16
}

pub fn calculate_max_scroll(content_height: u16, viewport_height: u16) -> u16 {
    content_height.saturating_sub(viewport_height)
}

/// Timer display, e.g. "2:05".
pub fn format_clock(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

/// Compact duration, e.g. "45s" or "3m 12s".
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
