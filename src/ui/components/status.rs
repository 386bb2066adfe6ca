//! Status line renderer.

use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{StatusInfo, StatusLevel};

/// Renders `[HH:MM:SS] message` colored by level, with the clipboard
/// countdown right-aligned when a secret is on the clipboard.
pub fn render_status(out: &mut String, row: usize, status: &StatusInfo, theme: &Theme, cols: usize) -> usize {
    let color = match status.level {
        StatusLevel::Info => &theme.colors.status_info,
        StatusLevel::Warn => &theme.colors.status_warn,
        StatusLevel::Error => &theme.colors.status_error,
    };

    let clipboard = status.clipboard.as_deref().unwrap_or("");
    let clipboard_len = clipboard.chars().count();
    let room = cols.saturating_sub(clipboard_len + 2);

    let message = format!(" [{}] {}", status.time, status.text);
    let message: String = message.chars().take(room).collect();
    let message_len = message.chars().count();

    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(color));
    out.push_str(&message);
    out.push_str(&" ".repeat(cols.saturating_sub(message_len + clipboard_len + 1)));
    if !clipboard.is_empty() {
        out.push_str(&Theme::fg(&theme.colors.secret_fg));
        out.push_str(clipboard);
        out.push(' ');
    }
    out.push_str(Theme::reset());
    row + 1
}
