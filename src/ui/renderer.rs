//! Top-level frame composition.
//!
//! ```text
//! [blank line]
//! [Header]
//! [Border]
//! [Search bar + history]    browsing only
//! [Table]                   browsing only
//! [Prompt]                  before browsing
//! [Details]                 when open
//! [padding]
//! [Status]
//! [Border]
//! [Footer]
//! ```

use crate::app::AppState;
use crate::ui::components;
use crate::ui::helpers::render_border;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

/// Clears the screen and homes the cursor.
const CLEAR_SCREEN: &str = "\u{1b}[2J\u{1b}[H";

/// Renders one full frame for a terminal of `rows` by `cols`.
///
/// The returned string contains ANSI sequences and is meant to be written to
/// the terminal in one call.
///
/// ```
/// use dashview::app::AppState;
/// use dashview::clipboard::SystemClipboard;
/// use dashview::process::ToolConfig;
/// use dashview::storage::Settings;
/// use dashview::ui::{render, Theme};
///
/// let state = AppState::new(
///     Theme::default(),
///     ToolConfig::default(),
///     Settings::default(),
///     Box::new(SystemClipboard::new()),
/// );
/// let frame = render(&state, 24, 80);
/// assert!(frame.contains("Initializing..."));
/// ```
#[must_use]
pub fn render(state: &AppState, rows: usize, cols: usize) -> String {
    let viewmodel = state.compute_viewmodel(rows, cols);
    render_viewmodel(&viewmodel, &state.theme, rows, cols)
}

fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) -> String {
    let mut out = String::from(CLEAR_SCREEN);

    let mut row = 2;
    row = components::render_header(&mut out, row, &vm.header, theme, cols);
    row = render_border(&mut out, row, &theme.colors.border, cols);

    if let Some(search) = &vm.search_bar {
        row = components::render_search_bar(&mut out, row, search, theme, cols);
    }
    if let Some(table) = &vm.table {
        row = components::render_table(&mut out, row, table, theme, cols);
    }
    if let Some(prompt) = &vm.prompt {
        row = components::render_prompt(&mut out, row, prompt, theme, cols);
    }
    if let Some(details) = &vm.details {
        row = components::render_details(&mut out, row + 1, details, theme, cols);
    }

    // Bottom chrome is pinned; on very short terminals it overlaps the body.
    let footer_row = rows.max(row + 2);
    let border_row = footer_row - 1;
    let status_row = footer_row - 2;

    components::render_status(&mut out, status_row, &vm.status, theme, cols);
    render_border(&mut out, border_row, &theme.colors.border, cols);
    components::render_footer(&mut out, footer_row, &vm.footer, theme, cols);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::SessionPhase;
    use crate::clipboard::ClipboardSink;
    use crate::process::ToolConfig;
    use crate::storage::Settings;
    use crate::ui::helpers::strip_ansi;

    struct NullSink;

    impl ClipboardSink for NullSink {
        fn set_text(&mut self, _text: &str) -> crate::Result<()> {
            Ok(())
        }

        fn clear(&mut self) -> crate::Result<()> {
            Ok(())
        }
    }

    fn state() -> AppState {
        AppState::new(Theme::default(), ToolConfig::default(), Settings::default(), Box::new(NullSink))
    }

    #[test]
    fn login_prompt_frame_offers_sync() {
        let mut state = state();
        state.phase = SessionPhase::login_prompt();
        let frame = strip_ansi(&render(&state, 24, 80));
        assert!(frame.contains("Dashlane CLI is not authenticated"));
        assert!(frame.contains("Type `sync`"));
        assert!(!frame.contains("Search:"));
    }

    #[test]
    fn browsing_frame_lists_items_without_secrets() {
        let mut state = state();
        state.phase = SessionPhase::Browsing;
        state.set_records(
            serde_json::from_str(r#"[{"title":"Site A","login":"a@x.com","password":"hunter2"}]"#).unwrap(),
        );
        let frame = strip_ansi(&render(&state, 24, 80));
        assert!(frame.contains("Site A"));
        assert!(frame.contains("Login"));
        assert!(!frame.contains("hunter2"));
    }
}
