//! Error types for dashview.
//!
//! Two families live here. [`ViewerError`] covers internal failures of the
//! application itself (storage, configuration, clipboard, worker plumbing) and
//! comes with the crate-wide [`Result`] alias. [`CliError`] is the taxonomy of
//! failures reported by the external `dcli` tool; it is a value carried in
//! worker responses, never raised as a fault.
//!
//! Classification of `dcli` failures from free-form stderr text is a best-effort
//! heuristic. The tool offers no structured error codes, so a wording change on
//! its side silently degrades [`CliError::AuthRequired`] and
//! [`CliError::TwoFactorRequired`] into [`CliError::GenericExternalFailure`].

use thiserror::Error;

/// Maximum number of characters of raw tool output kept for diagnostics.
pub const SNIPPET_MAX_CHARS: usize = 200;

/// Internal application errors.
///
/// # Examples
///
/// ```
/// use dashview::domain::ViewerError;
///
/// fn validate_delay(raw: &str) -> Result<u64, ViewerError> {
///     raw.parse()
///         .map_err(|_| ViewerError::Config(format!("invalid clipboard delay: {raw}")))
/// }
///
/// assert!(validate_delay("abc").is_err());
/// ```
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Reading or writing the settings file failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Theme parsing failed.
    #[error("Theme error: {0}")]
    Theme(String),

    /// A background worker could not be started or could not report back.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The system clipboard refused a write or clear.
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// An external terminal emulator could not be launched.
    #[error("Terminal launch error: {0}")]
    Terminal(String),
}

/// A specialized `Result` type for dashview operations.
pub type Result<T> = std::result::Result<T, ViewerError>;

/// Failures reported while talking to the external `dcli` tool.
///
/// Every variant is recoverable at the UI level: the session shows a message
/// and returns to an actionable state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CliError {
    /// The executable could not be located.
    #[error("dcli not found. Make sure it's in your PATH.")]
    ToolNotFound,

    /// A captured invocation exceeded its time budget and was terminated.
    #[error("dcli did not answer within {seconds} seconds")]
    Timeout {
        /// The budget that was exceeded.
        seconds: u64,
    },

    /// The tool reported that no authenticated session exists.
    #[error("dcli is not authenticated")]
    AuthRequired,

    /// The tool is waiting for a two-factor code.
    #[error("dcli is asking for a two-factor code")]
    TwoFactorRequired,

    /// The tool exited successfully but its output was not a JSON array.
    #[error("dcli did not return valid JSON: {error}")]
    MalformedOutput {
        /// Parser error message.
        error: String,
        /// Bounded prefix of the offending output.
        snippet: String,
    },

    /// Any other non-zero exit or OS-level spawn failure.
    #[error("dcli failed{}: {stderr}", exit_code.map(|c| format!(" with exit code {c}")).unwrap_or_default())]
    GenericExternalFailure {
        /// Exit code, if the process exited normally.
        exit_code: Option<i32>,
        /// Trimmed error stream (or OS error text).
        stderr: String,
    },
}

impl CliError {
    /// Returns `true` for failures that should route the session back to the
    /// login prompt.
    #[must_use]
    pub const fn is_auth_related(&self) -> bool {
        matches!(self, Self::AuthRequired | Self::TwoFactorRequired)
    }

    /// Short dialog-style title for the failure.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::ToolNotFound => "dcli Not Found",
            Self::Timeout { .. } => "dcli Timeout",
            Self::AuthRequired => "Authentication Required",
            Self::TwoFactorRequired => "2FA Required",
            Self::MalformedOutput { .. } => "JSON Decode Error",
            Self::GenericExternalFailure { .. } => "dcli Error",
        }
    }

    /// Operator-facing explanation, including what to do next where known.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::AuthRequired => "dcli is not authenticated. Run a sync to log in, or check \
                                   `dcli accounts whoami` in a terminal."
                .to_string(),
            Self::TwoFactorRequired => {
                "dcli is asking for your 2FA code. Please authenticate in the terminal.".to_string()
            }
            Self::MalformedOutput { error, snippet } => {
                format!("dcli did not return valid JSON ({error}). Output began with: {snippet}")
            }
            other => other.to_string(),
        }
    }
}

/// Returns at most [`SNIPPET_MAX_CHARS`] characters of `text`, trimmed, with an
/// ellipsis when truncated.
///
/// # Examples
///
/// ```
/// use dashview::domain::error::bounded_snippet;
///
/// assert_eq!(bounded_snippet("  short  "), "short");
/// assert!(bounded_snippet(&"x".repeat(500)).ends_with("..."));
/// ```
#[must_use]
pub fn bounded_snippet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= SNIPPET_MAX_CHARS {
        return trimmed.to_string();
    }
    let mut snippet: String = trimmed.chars().take(SNIPPET_MAX_CHARS).collect();
    snippet.push_str("...");
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_bounded_on_char_boundaries() {
        let text = "æøå".repeat(100);
        let snippet = bounded_snippet(&text);
        assert_eq!(snippet.chars().count(), SNIPPET_MAX_CHARS + 3);
    }

    #[test]
    fn generic_failure_mentions_exit_code() {
        let error = CliError::GenericExternalFailure {
            exit_code: Some(3),
            stderr: "boom".to_string(),
        };
        assert_eq!(error.to_string(), "dcli failed with exit code 3: boom");

        let spawn = CliError::GenericExternalFailure {
            exit_code: None,
            stderr: "permission denied".to_string(),
        };
        assert_eq!(spawn.to_string(), "dcli failed: permission denied");
    }

    #[test]
    fn only_auth_failures_are_auth_related() {
        assert!(CliError::AuthRequired.is_auth_related());
        assert!(CliError::TwoFactorRequired.is_auth_related());
        assert!(!CliError::ToolNotFound.is_auth_related());
        assert!(!CliError::Timeout { seconds: 30 }.is_auth_related());
    }
}
