//! Footer component renderer.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the centered key hints, truncated to the terminal width.
///
/// Returns the next available row.
pub fn render_footer(out: &mut String, row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    let hints: String = footer.keybindings.chars().take(cols).collect();
    let hints_len = hints.chars().count();
    let padding = cols.saturating_sub(hints_len) / 2;

    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    out.push_str(&" ".repeat(padding));
    out.push_str(&hints);
    out.push_str(&" ".repeat(cols.saturating_sub(padding + hints_len)));
    out.push_str(Theme::reset());
    row + 1
}
