//! Dashview: a terminal front-end for the Dashlane CLI (`dcli`).
//!
//! Dashview never talks to Dashlane itself. It drives the `dcli` binary as an
//! external process and adds:
//! - Installation and authentication probing, with an interactive `dcli sync`
//!   to log in
//! - Search and a broad "load everything" sweep, deduplicated by item id
//! - Item classification (Login, Secure Note, Credit Card, ...) and sorting
//! - Guarded clipboard copies that clear themselves after a countdown
//! - Persistent settings: clear delay, recent searches, window geometry
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Terminal host (main.rs)                            │  ← stdin commands, frames
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime/)                                 │  ← single foreground loop
//! │  Application layer (app/)                           │  ← session state machine
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Clipboard     │   │ Worker Layer  │
//! │ (ui/)         │   │ (clipboard/)  │   │ (worker/)     │
//! │ - Rendering   │   │ - Countdown   │   │ - dcli calls  │
//! │ - Theming     │   │ - arboard     │   │ - Trace links │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!                                                   │
//! ┌─────────────────────────────────────────────────────┐
//! │  Process (process/)  Storage (storage/)             │
//! │  Domain (domain/)    Infrastructure (infrastructure/)│
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← log file + OTLP spans
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! Session state is owned by the foreground thread. `dcli` runs on short-lived
//! worker threads whose results come back as events, so a slow `dcli` never
//! freezes the interface and results never race on shared state.
//!
//! # Modules
//!
//! - [`app`]: Session state machine with the event/action model
//! - [`cli`]: Command-line options
//! - [`clipboard`]: Clipboard sink and countdown guard
//! - [`domain`]: Records, categories and error types
//! - [`infrastructure`]: Platform paths and terminal launching
//! - [`observability`]: Tracing setup
//! - [`process`]: Running `dcli`: probe, sync and queries
//! - [`runtime`]: Foreground event loop and scheduler
//! - [`storage`]: TOML settings persistence
//! - [`ui`]: Terminal rendering with theme support
//! - [`worker`]: Background execution of `dcli` requests
//!
//! # Configuration
//!
//! Runtime options are command-line flags:
//!
//! ```text
//! dashview --dcli /opt/dcli/dcli --theme dashlane-light --trace-level debug
//! ```
//!
//! See [`cli::Cli`] for the flags. Persistent preferences live in
//! `settings.toml` (see [`storage::Settings`]).

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod cli;
pub mod clipboard;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod process;
pub mod runtime;
pub mod storage;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event, SessionPhase};
pub use domain::{CliError, Record, Result, ViewerError};
pub use ui::Theme;

use clipboard::ClipboardSink;
use process::ToolConfig;
use std::path::PathBuf;
use storage::Settings;

/// Runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// The `dcli` binary and its time budgets.
    pub tool: ToolConfig,

    /// Built-in theme name: `dashlane` or `dashlane-light`. Ignored if
    /// `theme_file` is set.
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file. Takes precedence over `theme_name`.
    pub theme_file: Option<PathBuf>,

    /// Tracing filter, e.g. `info` or `dashview=debug`. `RUST_LOG` wins when
    /// set. Default: `"info"`
    pub trace_level: Option<String>,

    /// Settings file override. Default: `<config dir>/dashview/settings.toml`
    pub settings_path: Option<PathBuf>,

    /// Log and trace directory override. Default: `<data dir>/dashview`
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// The settings file in effect.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Config`] when no override is set and the platform
    /// has no configuration directory.
    pub fn resolve_settings_path(&self) -> Result<PathBuf> {
        self.settings_path
            .clone()
            .map_or_else(infrastructure::settings_path, Ok)
    }

    /// The log and trace directory in effect.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Config`] when no override is set and the platform
    /// has no data directory.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        self.data_dir.clone().map_or_else(infrastructure::data_dir, Ok)
    }

    /// Loads the configured theme, falling back to the default palette when
    /// the file or name cannot be used.
    #[must_use]
    pub fn load_theme(&self) -> Theme {
        if let Some(path) = &self.theme_file {
            return Theme::from_file(path).unwrap_or_else(|e| {
                tracing::warn!(theme_file = %path.display(), error = %e, "failed to load theme from file, using default");
                Theme::default()
            });
        }
        self.theme_name.as_ref().map_or_else(Theme::default, |name| {
            Theme::from_name(name).unwrap_or_else(|| {
                tracing::warn!(theme_name = %name, "unknown theme, using default");
                Theme::default()
            })
        })
    }
}

/// Creates the session state for `config` with previously saved `settings`.
///
/// # Example
///
/// ```rust
/// use dashview::clipboard::SystemClipboard;
/// use dashview::storage::Settings;
/// use dashview::{initialize, Config, SessionPhase};
///
/// let state = initialize(&Config::default(), Settings::default(), Box::new(SystemClipboard::new()));
/// assert_eq!(state.phase, SessionPhase::Init);
/// ```
#[must_use]
pub fn initialize(config: &Config, settings: Settings, clipboard: Box<dyn ClipboardSink>) -> AppState {
    tracing::debug!(binary = %config.tool.binary, "initializing session");
    AppState::new(config.load_theme(), config.tool.clone(), settings, clipboard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_over_platform_paths() {
        let config = Config {
            settings_path: Some(PathBuf::from("/tmp/dv/settings.toml")),
            data_dir: Some(PathBuf::from("/tmp/dv/data")),
            ..Config::default()
        };
        assert_eq!(config.resolve_settings_path().unwrap(), PathBuf::from("/tmp/dv/settings.toml"));
        assert_eq!(config.resolve_data_dir().unwrap(), PathBuf::from("/tmp/dv/data"));
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let config = Config {
            theme_name: Some("neon".to_string()),
            ..Config::default()
        };
        assert_eq!(config.load_theme(), Theme::default());
    }
}
