//! View model types representing renderable UI state.
//!
//! View models are computed by `AppState::compute_viewmodel` and consumed by
//! the renderer. They contain display-ready strings only; secret values appear
//! solely in [`DetailsInfo::password`], and only once the operator reveals them.

/// Complete UI view model for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// Present once items can be searched.
    pub search_bar: Option<SearchBarInfo>,

    /// Present while browsing or querying.
    pub table: Option<TableInfo>,

    /// Present in the login and tool-missing phases, and while probing or
    /// syncing.
    pub prompt: Option<PromptInfo>,

    pub details: Option<DetailsInfo>,

    pub status: StatusInfo,

    pub footer: FooterInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    /// Signed-in identity, or the session phase before authentication.
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    /// Recent searches, shown when the history panel is open.
    pub history: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnHeader {
    pub label: &'static str,
    /// Sort arrow when this column is the active sort.
    pub indicator: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub columns: Vec<ColumnHeader>,
    pub rows: Vec<DisplayItem>,
    /// 1-based number of the first visible row.
    pub first_row: usize,
    pub total_rows: usize,
    /// Shown instead of rows when the displayed set is empty.
    pub empty_message: Option<String>,
}

/// One row of the item table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    /// 1-based row number used by commands.
    pub number: usize,
    pub title: String,
    pub login: String,
    pub category: &'static str,
    /// Whether this row's details are open.
    pub is_selected: bool,
    /// Character ranges of the title matching the search term.
    ///
    /// Each tuple is `(start_index, end_index)` in UTF-8 character indices.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInfo {
    pub title: String,
    pub lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsInfo {
    pub title: String,
    pub login: String,
    pub category: &'static str,
    pub website: Option<String>,
    /// Masked with one `*` per character unless revealed. `None` when the
    /// record has no password.
    pub password: Option<String>,
    pub revealed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub text: String,
    pub level: StatusLevel,
    /// Local time the message was set, `HH:MM:SS`.
    pub time: String,
    /// Clipboard countdown, e.g. "Clipboard clears in 12s".
    pub clipboard: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}
