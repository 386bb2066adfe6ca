//! Session state and view model computation.
//!
//! [`AppState`] is the single owner of everything the foreground knows: the
//! session phase, the displayed records, search and sort state, history,
//! settings, the query tracker and the clipboard guard. It is mutated only by
//! the event handler on the foreground thread.
//!
//! # Example
//!
//! ```
//! use dashview::app::AppState;
//! use dashview::clipboard::SystemClipboard;
//! use dashview::process::ToolConfig;
//! use dashview::storage::Settings;
//! use dashview::ui::Theme;
//!
//! let state = AppState::new(
//!     Theme::default(),
//!     ToolConfig::default(),
//!     Settings::default(),
//!     Box::new(SystemClipboard::new()),
//! );
//! let viewmodel = state.compute_viewmodel(24, 80);
//! assert!(viewmodel.table.is_none());
//! ```

use super::history::SearchHistory;
use super::modes::SessionPhase;
use super::sort::{Column, SortState};
use crate::clipboard::{ClipboardGuard, ClipboardSink, CopyKind};
use crate::domain::{classify, Record};
use crate::process::{QueryTracker, ToolConfig, INSTALL_URL};
use crate::storage::Settings;
use crate::ui::components::table::column_widths;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    ColumnHeader, DetailsInfo, DisplayItem, FooterInfo, HeaderInfo, PromptInfo, SearchBarInfo,
    StatusInfo, StatusLevel, TableInfo, UIViewModel,
};
use chrono::{DateTime, Local};
use fuzzy_matcher::skim::SkimMatcherV2;
use std::time::Duration;

/// Rows moved by one page command.
pub const PAGE_ROWS: usize = 10;

/// Rows taken by everything except the table body: blank line, header,
/// border, search bar (3), column headers, status, border, footer.
const CHROME_ROWS: usize = 10;

/// Rows taken by the details panel.
const DETAILS_ROWS: usize = 7;

/// The status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub text: String,
    pub level: StatusLevel,
    /// When the message was set.
    pub at: DateTime<Local>,
}

impl Status {
    fn new(text: impl Into<String>, level: StatusLevel) -> Self {
        Self {
            text: text.into(),
            level,
            at: Local::now(),
        }
    }

    #[must_use]
    pub fn info(text: impl Into<String>) -> Self {
        Self::new(text, StatusLevel::Info)
    }

    #[must_use]
    pub fn warn(text: impl Into<String>) -> Self {
        Self::new(text, StatusLevel::Warn)
    }

    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self::new(text, StatusLevel::Error)
    }
}

/// An open details panel.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailsView {
    /// Position of the record in the displayed set when it was opened.
    pub index: usize,
    pub record: Record,
    pub revealed: bool,
}

/// Central session state container.
#[derive(Debug)]
pub struct AppState {
    pub phase: SessionPhase,

    /// Identity confirmed by the last probe or sync.
    pub identity: Option<String>,

    /// The currently displayed set, in display order.
    pub records: Vec<Record>,

    /// Term of the last search the operator issued.
    pub search_term: String,

    pub sort: SortState,

    pub history: SearchHistory,

    /// Whether the history panel is open.
    pub show_history: bool,

    /// Settings as last persisted or about to be persisted.
    pub settings: Settings,

    pub queries: QueryTracker,

    pub clipboard: ClipboardGuard,

    /// What is on the clipboard and whole seconds left, refreshed on every
    /// countdown tick.
    pub clipboard_countdown: Option<(CopyKind, u64)>,

    pub details: Option<DetailsView>,

    pub status: Status,

    /// Index of the first visible table row.
    pub scroll: usize,

    pub theme: Theme,

    pub tool: ToolConfig,
}

impl AppState {
    /// Creates the session in [`SessionPhase::Init`].
    ///
    /// History and the clipboard delay come from `settings`.
    #[must_use]
    pub fn new(
        theme: Theme,
        tool: ToolConfig,
        settings: Settings,
        clipboard: Box<dyn ClipboardSink>,
    ) -> Self {
        let delay = Duration::from_secs(settings.clipboard_clear_delay_seconds);
        let history = SearchHistory::from_persisted(&settings.search_history);
        Self {
            phase: SessionPhase::Init,
            identity: None,
            records: Vec::new(),
            search_term: String::new(),
            sort: SortState::new(),
            history,
            show_history: false,
            settings,
            queries: QueryTracker::new(),
            clipboard: ClipboardGuard::new(clipboard, delay),
            clipboard_countdown: None,
            details: None,
            status: Status::info("Initializing..."),
            scroll: 0,
            theme,
            tool,
        }
    }

    /// Replaces the displayed set, keeping the active sort.
    pub fn set_records(&mut self, mut records: Vec<Record>) {
        self.sort.reapply(&mut records);
        self.records = records;
        self.scroll = 0;
    }

    /// Sorts the displayed set by `column`, toggling its direction.
    pub fn sort_by(&mut self, column: Column) {
        let direction = self.sort.apply(&mut self.records, column);
        self.details = None;
        self.status = Status::info(format!(
            "Sorted by {} ({}).",
            column.label(),
            direction.label()
        ));
    }

    /// Copies the persisted parts of session state into `settings`.
    pub fn sync_settings(&mut self) -> Settings {
        self.settings.search_history = self.history.terms().to_vec();
        self.settings.clipboard_clear_delay_seconds = self.clipboard.delay().as_secs();
        self.settings.clone()
    }

    /// Moves the table window by one page.
    pub fn scroll_page(&mut self, forward: bool) {
        let last = self.records.len().saturating_sub(1);
        self.scroll = if forward {
            (self.scroll + PAGE_ROWS).min(last)
        } else {
            self.scroll.saturating_sub(PAGE_ROWS)
        };
    }

    /// Computes a renderable view model for a terminal of `rows` by `cols`.
    #[must_use]
    pub fn compute_viewmodel(&self, rows: usize, cols: usize) -> UIViewModel {
        let searchable = self.phase.can_query();

        UIViewModel {
            header: self.compute_header(),
            search_bar: searchable.then(|| SearchBarInfo {
                query: self.search_term.clone(),
                history: self.show_history.then(|| self.history.terms().to_vec()),
            }),
            table: searchable.then(|| self.compute_table(rows, cols)),
            prompt: self.compute_prompt(),
            details: self.details.as_ref().map(Self::compute_details),
            status: StatusInfo {
                text: self.status.text.clone(),
                level: self.status.level,
                time: self.status.at.format("%H:%M:%S").to_string(),
                clipboard: self.clipboard_countdown.map(|(kind, secs)| {
                    format!("{} on clipboard, clears in {secs}s", kind.label())
                }),
            },
            footer: self.compute_footer(),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        let subtitle = self.identity.as_ref().map_or_else(
            || format!("dcli: {}", self.phase.name()),
            |identity| format!("Signed in as {identity}"),
        );
        HeaderInfo {
            title: " Dashlane Vault ".to_string(),
            subtitle,
        }
    }

    fn compute_table(&self, rows: usize, cols: usize) -> TableInfo {
        let history_rows = if self.show_history { self.history.len() + 1 } else { 0 };
        let details_rows = if self.details.is_some() { DETAILS_ROWS } else { 0 };
        let available = rows
            .saturating_sub(CHROME_ROWS + history_rows + details_rows)
            .max(1);

        let start = self.scroll.min(self.records.len().saturating_sub(1));
        let end = (start + available).min(self.records.len());

        let matcher = (!self.search_term.is_empty()).then(SkimMatcherV2::default);
        let selected = self.details.as_ref().map(|d| d.index);

        let display_rows = self.records[start..end]
            .iter()
            .enumerate()
            .map(|(offset, record)| {
                let index = start + offset;
                self.compute_display_item(record, index, selected == Some(index), cols, matcher.as_ref())
            })
            .collect();

        let empty_message = self.records.is_empty().then(|| {
            if self.phase == SessionPhase::Querying {
                "Loading items from Dashlane CLI...".to_string()
            } else if self.search_term.is_empty() {
                "No items found.".to_string()
            } else {
                format!("No items match '{}'.", self.search_term)
            }
        });

        let active = self.sort.current();
        let columns = [Column::Title, Column::Login, Column::Type]
            .into_iter()
            .map(|column| ColumnHeader {
                label: column.label(),
                indicator: active
                    .filter(|(c, _)| *c == column)
                    .map(|(_, direction)| direction.arrow()),
            })
            .collect();

        TableInfo {
            columns,
            rows: display_rows,
            first_row: start + 1,
            total_rows: self.records.len(),
            empty_message,
        }
    }

    fn compute_display_item(
        &self,
        record: &Record,
        index: usize,
        is_selected: bool,
        cols: usize,
        matcher: Option<&SkimMatcherV2>,
    ) -> DisplayItem {
        let (title_width, login_width) = column_widths(cols);
        let title = truncate(record.title(), title_width);
        let highlight_ranges =
            matcher.map_or_else(Vec::new, |m| self.compute_highlight_ranges(&title, m));

        DisplayItem {
            number: index + 1,
            title,
            login: truncate(record.login(), login_width),
            category: classify(record).label(),
            is_selected,
            highlight_ranges,
        }
    }

    /// Coalesces fuzzy match indices into `(start, end)` character ranges.
    fn compute_highlight_ranges(&self, text: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let Some((_score, indices)) = matcher.fuzzy_indices(text, &self.search_term) else {
            return vec![];
        };

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }

    fn compute_details(view: &DetailsView) -> DetailsInfo {
        let record = &view.record;
        let password = record.password().map(|secret| {
            if view.revealed {
                secret.to_string()
            } else {
                "*".repeat(secret.chars().count())
            }
        });

        DetailsInfo {
            title: record.title().to_string(),
            login: record.login().to_string(),
            category: classify(record).label(),
            website: record.text("website").map(ToString::to_string),
            password,
            revealed: view.revealed,
        }
    }

    fn compute_prompt(&self) -> Option<PromptInfo> {
        let binary = &self.tool.binary;
        let prompt = match &self.phase {
            SessionPhase::Init | SessionPhase::ProbingStatus => PromptInfo {
                title: "Checking Dashlane CLI".to_string(),
                lines: vec![format!("Running `{binary} --version` and `{binary} accounts whoami`...")],
            },
            SessionPhase::ToolMissingPrompt => PromptInfo {
                title: "Dashlane CLI not found".to_string(),
                lines: vec![
                    format!("`{binary}` could not be found on your PATH."),
                    format!("Install it from {INSTALL_URL}"),
                    "Then type `check` to look again.".to_string(),
                ],
            },
            SessionPhase::LoginPrompt { failure, offer_terminal_check } => {
                let mut lines = Vec::new();
                if let Some(failure) = failure {
                    lines.push(failure.clone());
                }
                lines.push(format!("Type `sync` to log in with `{binary} sync` in this terminal."));
                lines.push("Type `check` to probe the session again.".to_string());
                if *offer_terminal_check {
                    lines.push(format!(
                        "Type `term` to run `{binary} accounts whoami` in a new terminal window."
                    ));
                }
                PromptInfo {
                    title: "Dashlane CLI is not authenticated".to_string(),
                    lines,
                }
            }
            SessionPhase::Syncing => PromptInfo {
                title: format!("{binary} sync is running"),
                lines: vec![format!("Follow the prompts from {binary}. Input resumes when it exits.")],
            },
            SessionPhase::Browsing | SessionPhase::Querying => return None,
        };
        Some(prompt)
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = match (&self.phase, self.details.is_some()) {
            (SessionPhase::Browsing | SessionPhase::Querying, true) => {
                "c p|l|b: copy  x: clear clipboard  pw: show/hide password  v: close  q: quit"
            }
            (SessionPhase::Browsing | SessionPhase::Querying, false) => {
                "/term: search  s title|login|type: sort  v N: details  c p|l|b N: copy  n/p: page  h: history  q: quit"
            }
            (SessionPhase::LoginPrompt { .. }, _) => "sync: log in  check: re-check  term: terminal check  q: quit",
            (SessionPhase::ToolMissingPrompt, _) => "check: re-check  q: quit",
            (SessionPhase::Init | SessionPhase::ProbingStatus | SessionPhase::Syncing, _) => "q: quit",
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }
}

/// Cuts `text` to `max` characters, marking the cut with `...`.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Result;

    struct NullSink;

    impl ClipboardSink for NullSink {
        fn set_text(&mut self, _text: &str) -> Result<()> {
            Ok(())
        }

        fn clear(&mut self) -> Result<()> {
            Ok(())
        }
    }

    fn state() -> AppState {
        AppState::new(
            Theme::default(),
            ToolConfig::default(),
            Settings::default(),
            Box::new(NullSink),
        )
    }

    fn records(json: &str) -> Vec<Record> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn table_rows_show_title_login_and_type() {
        let mut state = state();
        state.phase = SessionPhase::Browsing;
        state.set_records(records(
            r#"[{"title":"Site A","login":"a@x.com","password":"p1"},{"title":"N1","note":"hi"}]"#,
        ));

        let table = state.compute_viewmodel(24, 80).table.unwrap();
        let rows: Vec<(&str, &str, &str)> = table
            .rows
            .iter()
            .map(|r| (r.title.as_str(), r.login.as_str(), r.category))
            .collect();
        assert_eq!(rows, [("Site A", "a@x.com", "Login"), ("N1", "No Login", "Secure Note")]);
        assert_eq!(table.rows[1].number, 2);
    }

    #[test]
    fn search_term_highlights_title() {
        let mut state = state();
        state.phase = SessionPhase::Browsing;
        state.search_term = "bank".to_string();
        state.set_records(records(r#"[{"title":"My Bank"}]"#));

        let table = state.compute_viewmodel(24, 80).table.unwrap();
        assert_eq!(table.rows[0].highlight_ranges, [(3, 7)]);
    }

    #[test]
    fn details_mask_password_until_revealed() {
        let mut state = state();
        let record = records(r#"[{"title":"A","password":"hunter2"}]"#).remove(0);
        state.details = Some(DetailsView { index: 0, record, revealed: false });

        let details = state.compute_viewmodel(24, 80).details.unwrap();
        assert_eq!(details.password.as_deref(), Some("*******"));

        if let Some(view) = state.details.as_mut() {
            view.revealed = true;
        }
        let details = state.compute_viewmodel(24, 80).details.unwrap();
        assert_eq!(details.password.as_deref(), Some("hunter2"));
    }

    #[test]
    fn login_prompt_offers_terminal_check_only_after_auth_errors() {
        let mut state = state();
        state.phase = SessionPhase::login_prompt();
        let prompt = state.compute_viewmodel(24, 80).prompt.unwrap();
        assert!(!prompt.lines.iter().any(|l| l.contains("new terminal")));

        state.phase = SessionPhase::LoginPrompt {
            failure: Some("dcli is not authenticated.".to_string()),
            offer_terminal_check: true,
        };
        let prompt = state.compute_viewmodel(24, 80).prompt.unwrap();
        assert_eq!(prompt.lines[0], "dcli is not authenticated.");
        assert!(prompt.lines.iter().any(|l| l.contains("new terminal")));
    }

    #[test]
    fn paging_is_clamped_to_the_displayed_set() {
        let mut state = state();
        let many: Vec<Record> = (0..15)
            .map(|i| records(&format!(r#"[{{"title":"t{i}"}}]"#)).remove(0))
            .collect();
        state.set_records(many);

        state.scroll_page(true);
        state.scroll_page(true);
        assert_eq!(state.scroll, 14);
        state.scroll_page(false);
        assert_eq!(state.scroll, 4);
    }

    #[test]
    fn long_titles_are_truncated() {
        assert_eq!(truncate("abcdefghij", 6), "abc...");
        assert_eq!(truncate("abc", 6), "abc");
    }
}
