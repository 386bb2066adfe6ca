//! Session phases of the viewer.
//!
//! ```text
//! Init ─► ProbingStatus ─┬─► ToolMissingPrompt
//!                        ├─► LoginPrompt ─► Syncing ─┬─► Browsing
//!                        │        ▲                  └─► LoginPrompt (failure)
//!                        └─► Browsing ◄──► Querying
//!                                             └─► LoginPrompt (auth error)
//! ```
//!
//! `Init` is the only entry phase. There is no terminal phase; the session
//! ends when the process exits.

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Nothing has happened yet.
    #[default]
    Init,

    /// Waiting for the status probe.
    ProbingStatus,

    /// `dcli` is not installed. Only a re-check can leave this phase.
    ToolMissingPrompt,

    /// `dcli` is installed but has no confirmed session.
    LoginPrompt {
        /// Why the last attempt failed, if it did.
        failure: Option<String>,
        /// Whether a terminal check of `dcli accounts whoami` is offered.
        offer_terminal_check: bool,
    },

    /// `dcli sync` owns the terminal.
    Syncing,

    /// Items are displayed and no query is running.
    Browsing,

    /// A list query is in flight.
    Querying,
}

impl SessionPhase {
    /// A prompt phase with no failure to show.
    #[must_use]
    pub const fn login_prompt() -> Self {
        Self::LoginPrompt {
            failure: None,
            offer_terminal_check: false,
        }
    }

    /// Returns `true` once the session is authenticated and items can be
    /// queried.
    #[must_use]
    pub const fn can_query(&self) -> bool {
        matches!(self, Self::Browsing | Self::Querying)
    }

    /// Returns `true` in phases from which the status can be probed again.
    #[must_use]
    pub const fn can_recheck(&self) -> bool {
        matches!(
            self,
            Self::ToolMissingPrompt | Self::LoginPrompt { .. } | Self::Browsing
        )
    }

    /// Short name for logs and the header.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::ProbingStatus => "probing",
            Self::ToolMissingPrompt => "tool-missing",
            Self::LoginPrompt { .. } => "login",
            Self::Syncing => "syncing",
            Self::Browsing => "browsing",
            Self::Querying => "querying",
        }
    }
}
