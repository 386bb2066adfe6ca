//! Determining whether `dcli` is installed and logged in.

use super::executor::CommandRunner;
use super::tool::ToolConfig;
use crate::domain::error::bounded_snippet;
use std::sync::Arc;

/// What the probe learned about the tool.
///
/// `Authenticated` is only ever produced after `dcli accounts whoami` exited
/// zero and printed an identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// `dcli` is not on the PATH.
    ToolMissing,
    /// No confirmed session. Carries the tool's diagnostic when it gave one.
    NotAuthenticated {
        diagnostic: Option<String>,
    },
    /// Confirmed session for `identity`.
    Authenticated {
        identity: String,
    },
    /// The OS refused to run the tool for a reason other than "not found".
    Unknown {
        last_error: String,
    },
}

/// Two-step status check built on a [`CommandRunner`].
#[derive(Clone)]
pub struct StatusProbe {
    runner: Arc<dyn CommandRunner>,
    tool: ToolConfig,
}

impl StatusProbe {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, tool: ToolConfig) -> Self {
        Self { runner, tool }
    }

    /// Runs the existence probe, then the identity probe.
    ///
    /// A missing executable on the first step short-circuits to
    /// [`AuthState::ToolMissing`]. Any other outcome of the first step moves on
    /// to [`confirm_identity`](Self::confirm_identity).
    pub fn check(&self) -> AuthState {
        let _span = tracing::info_span!("status_probe").entered();

        let version = self.runner.run(&self.tool.version_command());
        if version.not_found {
            tracing::info!(binary = %self.tool.binary, "dcli is not installed");
            return AuthState::ToolMissing;
        }
        if let Some(error) = version.spawn_error {
            let last_error = bounded_snippet(&error);
            tracing::warn!(error = %last_error, "dcli could not be started");
            return AuthState::Unknown { last_error };
        }
        if !version.succeeded() {
            tracing::debug!(
                exit_code = ?version.exit_code,
                timed_out = version.timed_out,
                "version probe was inconclusive, continuing with whoami"
            );
        }

        self.confirm_identity()
    }

    /// Runs `dcli accounts whoami` alone.
    ///
    /// Exit zero with a non-empty identity is the only path to
    /// [`AuthState::Authenticated`]. An empty success is inconclusive, and a
    /// timeout is treated as "not authenticated" since the tool may be blocked
    /// waiting for input.
    pub fn confirm_identity(&self) -> AuthState {
        let outcome = self.runner.run(&self.tool.whoami_command());

        if outcome.not_found {
            return AuthState::ToolMissing;
        }
        if let Some(error) = outcome.spawn_error {
            return AuthState::Unknown { last_error: bounded_snippet(&error) };
        }
        if outcome.timed_out {
            tracing::info!("whoami timed out, assuming not authenticated");
            return AuthState::NotAuthenticated {
                diagnostic: Some(format!(
                    "`{} accounts whoami` did not answer within {} seconds",
                    self.tool.binary,
                    self.tool.whoami_timeout.as_secs()
                )),
            };
        }

        let identity = outcome.stdout.trim();
        if outcome.exit_code == Some(0) && !identity.is_empty() {
            tracing::info!("dcli session confirmed");
            return AuthState::Authenticated {
                identity: identity.to_string(),
            };
        }

        let diagnostic = if outcome.exit_code == Some(0) {
            Some("dcli reported success but printed no identity".to_string())
        } else {
            let stderr = outcome.stderr.trim();
            let stdout = outcome.stdout.trim();
            let text = if stderr.is_empty() { stdout } else { stderr };
            (!text.is_empty()).then(|| bounded_snippet(text))
        };
        tracing::info!(exit_code = ?outcome.exit_code, "dcli is not authenticated");
        AuthState::NotAuthenticated { diagnostic }
    }
}

impl std::fmt::Debug for StatusProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusProbe")
            .field("tool", &self.tool)
            .finish_non_exhaustive()
    }
}
