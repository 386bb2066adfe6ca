//! Details panel for one record.

use crate::ui::helpers::{position_cursor, push_padded};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::DetailsInfo;

const LABEL_WIDTH: usize = 11;

/// Renders the boxed details panel. Returns the next available row.
///
/// ```text
/// ── Details ────────────────
///   Title:     Site A
///   Login:     a@x.com
///   Type:      Login
///   Website:   https://a.example
///   Password:  ********
/// ```
pub fn render_details(out: &mut String, row: usize, details: &DetailsInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(&theme.colors.border));
    let heading = "── Details ";
    out.push_str(heading);
    out.push_str(&"─".repeat(cols.saturating_sub(heading.chars().count())));
    out.push_str(Theme::reset());

    let website = details.website.as_deref().unwrap_or("-");
    let fields = [
        ("Title:", details.title.as_str()),
        ("Login:", details.login.as_str()),
        ("Type:", details.category),
        ("Website:", website),
    ];

    let mut next = row + 1;
    for (label, value) in fields {
        position_cursor(out, next, 3);
        out.push_str(&Theme::fg(&theme.colors.text_dim));
        push_padded(out, label, LABEL_WIDTH);
        out.push_str(&Theme::fg(&theme.colors.text_normal));
        out.push_str(value);
        out.push_str(Theme::reset());
        next += 1;
    }

    position_cursor(out, next, 3);
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    push_padded(out, "Password:", LABEL_WIDTH);
    match &details.password {
        Some(password) => {
            out.push_str(&Theme::fg(&theme.colors.secret_fg));
            out.push_str(password);
            out.push_str(&Theme::fg(&theme.colors.text_dim));
            out.push_str(if details.revealed { "  (pw: hide)" } else { "  (pw: show)" });
        }
        None => out.push_str("(none)"),
    }
    out.push_str(Theme::reset());
    next + 1
}
