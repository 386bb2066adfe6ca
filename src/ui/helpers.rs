//! Shared rendering utilities.
//!
//! Components append to one frame buffer instead of printing, so a frame can be
//! written to the terminal in a single call and inspected in tests.

use crate::ui::theme::Theme;

/// Appends a cursor move to `row`, `col` (both 1-indexed).
pub fn position_cursor(out: &mut String, row: usize, col: usize) {
    out.push_str(&format!("\u{1b}[{row};{col}H"));
}

/// Appends `text` followed by spaces up to `width` display characters.
pub fn push_padded(out: &mut String, text: &str, width: usize) {
    out.push_str(text);
    out.push_str(&" ".repeat(width.saturating_sub(text.chars().count())));
}

/// Appends a full-width horizontal rule and returns the next row.
pub fn render_border(out: &mut String, row: usize, color: &str, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(color));
    out.push_str(&"─".repeat(cols));
    out.push_str(Theme::reset());
    row + 1
}

/// Appends `text` with the character ranges in `ranges` highlighted.
///
/// Ranges are `(start, end)` character indices, end exclusive, sorted and
/// non-overlapping. Highlighting is skipped on selected rows so the selection
/// colors stay readable. After each highlight the base color `restore_fg` is
/// re-applied.
pub fn render_highlighted_text(
    out: &mut String,
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    is_selected: bool,
    restore_fg: &str,
) {
    if ranges.is_empty() || is_selected {
        out.push_str(text);
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < pos || start >= end {
            continue;
        }
        out.extend(&chars[pos..start]);
        out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
        out.push_str(&Theme::bg(&theme.colors.match_highlight_bg));
        out.extend(&chars[start..end]);
        out.push_str(Theme::reset());
        out.push_str(&Theme::fg(restore_fg));
        pos = end;
    }

    out.extend(&chars[pos..]);
}

/// Removes ANSI escape sequences, leaving the visible text.
#[must_use]
pub fn strip_ansi(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\u{1b}' {
            // CSI sequences end with an alphabetic byte.
            for next in chars.by_ref() {
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            plain.push(c);
        }
    }
    plain
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_keeps_visible_text() {
        let theme = Theme::default();
        let mut out = String::new();
        render_highlighted_text(&mut out, "My Bank", &[(3, 7)], &theme, false, &theme.colors.text_normal);
        assert_eq!(strip_ansi(&out), "My Bank");
        assert!(out.contains(&Theme::bg(&theme.colors.match_highlight_bg)));
    }

    #[test]
    fn selected_rows_are_not_highlighted() {
        let theme = Theme::default();
        let mut out = String::new();
        render_highlighted_text(&mut out, "Bank", &[(0, 4)], &theme, true, &theme.colors.text_normal);
        assert_eq!(out, "Bank");
    }

    #[test]
    fn out_of_range_highlights_are_clamped() {
        let theme = Theme::default();
        let mut out = String::new();
        render_highlighted_text(&mut out, "ab", &[(1, 9)], &theme, false, &theme.colors.text_normal);
        assert_eq!(strip_ansi(&out), "ab");
    }

    #[test]
    fn padding_counts_characters() {
        let mut out = String::new();
        push_padded(&mut out, "æøå", 5);
        assert_eq!(out, "æøå  ");
    }
}
