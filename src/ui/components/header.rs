//! Header component renderer.

use crate::ui::helpers::{position_cursor, push_padded};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the title bar: title centered, session subtitle on the right.
///
/// Returns the next available row.
///
/// ```text
/// [padding] Dashlane Vault [padding]             Signed in as me@x.com
/// ```
pub fn render_header(out: &mut String, row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    let title_len = header.title.chars().count();
    let subtitle_len = header.subtitle.chars().count();
    let padding = cols.saturating_sub(title_len) / 2;

    position_cursor(out, row, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        out.push_str(&Theme::bg(bg));
    }

    out.push_str(&" ".repeat(padding));
    out.push_str(&header.title);

    let used = padding + title_len;
    if used + subtitle_len + 1 < cols {
        out.push_str(Theme::reset());
        if let Some(bg) = &theme.colors.header_bg {
            out.push_str(&Theme::bg(bg));
        }
        out.push_str(&Theme::fg(&theme.colors.text_dim));
        out.push_str(&" ".repeat(cols - used - subtitle_len - 1));
        out.push_str(&header.subtitle);
        out.push(' ');
    } else {
        push_padded(out, "", cols.saturating_sub(used));
    }

    out.push_str(Theme::reset());
    row + 1
}
