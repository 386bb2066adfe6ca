//! Search bar component renderer.
//!
//! Renders the current search term in a bordered box and, when the history
//! panel is open, the recent searches underneath it.

use crate::ui::helpers::{position_cursor, push_padded};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Horizontal margin for the search box (spaces on left and right).
const SEARCH_BOX_MARGIN: usize = 2;

/// Renders the search box and optional history list at `row`.
///
/// Returns the next available row: `row + 3`, plus one line for the history
/// heading and one per remembered term when history is shown.
///
/// ```text
///   ┌──────────────────────────────┐
///   │ Search: bank                 │
///   └──────────────────────────────┘
///   Recent: bank, mail
/// ```
pub fn render_search_bar(out: &mut String, row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let margin = " ".repeat(SEARCH_BOX_MARGIN);

    position_cursor(out, row, 1);
    out.push_str(&margin);
    out.push_str(&Theme::fg(&theme.colors.search_bar_border));
    out.push_str(&format!("┌{}┐", "─".repeat(inner_width)));

    let query = if search.query.is_empty() {
        " Search: (all items)".to_string()
    } else {
        format!(" Search: {}", search.query)
    };
    let query: String = query.chars().take(inner_width).collect();

    position_cursor(out, row + 1, 1);
    out.push_str(&margin);
    out.push('│');
    out.push_str(&Theme::fg(&theme.colors.text_normal));
    push_padded(out, &query, inner_width);
    out.push_str(&Theme::fg(&theme.colors.search_bar_border));
    out.push('│');

    position_cursor(out, row + 2, 1);
    out.push_str(&margin);
    out.push_str(&format!("└{}┘", "─".repeat(inner_width)));
    out.push_str(Theme::reset());

    let mut next = row + 3;
    if let Some(history) = &search.history {
        position_cursor(out, next, 1);
        out.push_str(&margin);
        out.push_str(&Theme::fg(&theme.colors.text_dim));
        if history.is_empty() {
            out.push_str("No recent searches.");
        } else {
            out.push_str("Recent searches (newest first):");
        }
        next += 1;

        for (i, term) in history.iter().enumerate() {
            position_cursor(out, next, 1);
            out.push_str(&margin);
            out.push_str(&format!("  {}. {term}", i + 1));
            next += 1;
        }
        out.push_str(Theme::reset());
    }
    next
}
