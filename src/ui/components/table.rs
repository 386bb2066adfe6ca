//! Item table renderer.
//!
//! Four columns: row number, Title, Login and Type. The active sort column
//! carries an arrow, search matches in titles are highlighted, and the row
//! whose details are open uses the selection colors.

use crate::ui::helpers::{self, position_cursor, push_padded};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{ColumnHeader, DisplayItem, TableInfo};

/// Width of the row number column including its trailing space.
const NUMBER_WIDTH: usize = 5;

/// Width of the Type column.
const TYPE_WIDTH: usize = 14;

/// Title and login column widths for a terminal `cols` wide. Titles and
/// logins are truncated to these before rendering.
#[must_use]
pub fn column_widths(cols: usize) -> (usize, usize) {
    let flexible = cols.saturating_sub(NUMBER_WIDTH + TYPE_WIDTH + 3).max(20);
    let title = flexible * 5 / 9;
    (title, flexible - title - 1)
}

fn header_label(column: &ColumnHeader) -> String {
    column
        .indicator
        .map_or_else(|| column.label.to_string(), |arrow| format!("{} {arrow}", column.label))
}

/// Renders column headers, visible rows and a position line. Returns the next
/// available row.
pub fn render_table(out: &mut String, row: usize, table: &TableInfo, theme: &Theme, cols: usize) -> usize {
    let (title_width, login_width) = column_widths(cols);
    let labels: Vec<String> = table.columns.iter().map(header_label).collect();

    position_cursor(out, row, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));
    push_padded(out, "#", NUMBER_WIDTH);
    for (label, width) in labels.iter().zip([title_width, login_width, TYPE_WIDTH]) {
        push_padded(out, label, width + 1);
    }
    out.push_str(Theme::reset());
    let mut next = row + 1;

    if let Some(message) = &table.empty_message {
        position_cursor(out, next, 1);
        out.push_str(&Theme::fg(&theme.colors.text_dim));
        out.push_str("  ");
        out.push_str(message);
        out.push_str(Theme::reset());
        return next + 1;
    }

    for item in &table.rows {
        next = render_table_row(out, next, item, theme, cols);
    }

    if table.total_rows > table.rows.len() {
        let last = table.first_row + table.rows.len().saturating_sub(1);
        position_cursor(out, next, 1);
        out.push_str(&Theme::fg(&theme.colors.text_dim));
        out.push_str(&format!(
            "  rows {}-{last} of {}  (n: next page, p: previous page)",
            table.first_row, table.total_rows
        ));
        out.push_str(Theme::reset());
        next += 1;
    }
    next
}

fn render_table_row(out: &mut String, row: usize, item: &DisplayItem, theme: &Theme, cols: usize) -> usize {
    let (title_width, login_width) = column_widths(cols);
    let base_fg = if item.is_selected {
        &theme.colors.selection_fg
    } else {
        &theme.colors.text_normal
    };

    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(base_fg));
    if item.is_selected {
        out.push_str(&Theme::bg(&theme.colors.selection_bg));
    }

    push_padded(out, &item.number.to_string(), NUMBER_WIDTH);

    helpers::render_highlighted_text(out, &item.title, &item.highlight_ranges, theme, item.is_selected, base_fg);
    if item.is_selected {
        out.push_str(&Theme::bg(&theme.colors.selection_bg));
    }
    out.push_str(&" ".repeat((title_width + 1).saturating_sub(item.title.chars().count())));

    push_padded(out, &item.login, login_width + 1);
    push_padded(out, item.category, TYPE_WIDTH);

    let used = NUMBER_WIDTH + title_width + login_width + TYPE_WIDTH + 2;
    out.push_str(&" ".repeat(cols.saturating_sub(used)));
    out.push_str(Theme::reset());
    row + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::helpers::strip_ansi;

    fn table(rows: Vec<DisplayItem>, total: usize) -> TableInfo {
        TableInfo {
            columns: vec![
                ColumnHeader { label: "Title", indicator: Some('▲') },
                ColumnHeader { label: "Login", indicator: None },
                ColumnHeader { label: "Type", indicator: None },
            ],
            rows,
            first_row: 1,
            total_rows: total,
            empty_message: None,
        }
    }

    fn item(number: usize, title: &str) -> DisplayItem {
        DisplayItem {
            number,
            title: title.to_string(),
            login: "a@x.com".to_string(),
            category: "Login",
            is_selected: false,
            highlight_ranges: vec![],
        }
    }

    #[test]
    fn renders_headers_with_sort_arrow_and_rows() {
        let mut out = String::new();
        let next = render_table(&mut out, 4, &table(vec![item(1, "Site A")], 1), &Theme::default(), 80);
        let plain = strip_ansi(&out);
        assert_eq!(next, 6);
        assert!(plain.contains("Title ▲"));
        assert!(plain.contains("Site A"));
        assert!(plain.contains("a@x.com"));
        assert!(!plain.contains("rows"));
    }

    #[test]
    fn partial_window_shows_position() {
        let mut out = String::new();
        render_table(&mut out, 1, &table(vec![item(1, "A"), item(2, "B")], 30), &Theme::default(), 80);
        assert!(strip_ansi(&out).contains("rows 1-2 of 30"));
    }

    #[test]
    fn empty_message_replaces_rows() {
        let mut info = table(vec![], 0);
        info.empty_message = Some("No items found.".to_string());
        let mut out = String::new();
        let next = render_table(&mut out, 1, &info, &Theme::default(), 80);
        assert_eq!(next, 3);
        assert!(strip_ansi(&out).contains("No items found."));
    }
}
