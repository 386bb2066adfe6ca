//! Interactive re-authentication through `dcli sync`.

use super::executor::CommandRunner;
use super::probe::{AuthState, StatusProbe};
use super::tool::ToolConfig;
use crate::domain::error::bounded_snippet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// How a sync attempt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncResult {
    /// The sync exited zero and the follow-up identity probe confirmed it.
    Success { identity: String },
    /// Anything else, with an operator-facing explanation.
    Failure { message: String },
}

/// Caller errors for [`SyncCoordinator::start_sync`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error("a dcli sync is already running")]
    AlreadyRunning,
}

/// Runs `dcli sync` with the operator's terminal, one at a time.
pub struct SyncCoordinator {
    runner: Arc<dyn CommandRunner>,
    tool: ToolConfig,
    probe: StatusProbe,
    in_flight: AtomicBool,
}

impl SyncCoordinator {
    #[must_use]
    pub fn new(runner: Arc<dyn CommandRunner>, tool: ToolConfig, probe: StatusProbe) -> Self {
        Self {
            runner,
            tool,
            probe,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Returns `true` while a sync is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Runs the sync interactively and, on exit zero, confirms the session.
    ///
    /// A non-zero exit is reported as a failure without re-probing.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::AlreadyRunning`] if another sync is in flight. The
    /// running sync is not affected.
    pub fn start_sync(&self) -> Result<SyncResult, SyncError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::warn!("rejected concurrent sync request");
            return Err(SyncError::AlreadyRunning);
        }
        let _flight = InFlight(&self.in_flight);

        let _span = tracing::info_span!("dcli_sync").entered();
        tracing::info!("handing the terminal to dcli sync");

        let outcome = self.runner.run(&self.tool.sync_command());

        if outcome.not_found {
            return Ok(SyncResult::Failure {
                message: format!("{} not found. Make sure it's in your PATH.", self.tool.binary),
            });
        }
        if let Some(error) = outcome.spawn_error {
            return Ok(SyncResult::Failure {
                message: format!("Could not start {} sync: {}", self.tool.binary, bounded_snippet(&error)),
            });
        }

        match outcome.exit_code {
            Some(0) => {}
            Some(code) => {
                tracing::info!(exit_code = code, "sync failed");
                return Ok(SyncResult::Failure {
                    message: format!("{} sync exited with code {code}.", self.tool.binary),
                });
            }
            None => {
                return Ok(SyncResult::Failure {
                    message: format!("{} sync was interrupted.", self.tool.binary),
                });
            }
        }

        let result = match self.probe.confirm_identity() {
            AuthState::Authenticated { identity } => SyncResult::Success { identity },
            AuthState::NotAuthenticated { diagnostic } => SyncResult::Failure {
                message: diagnostic.map_or_else(
                    || "Sync finished but dcli is still not authenticated.".to_string(),
                    |d| format!("Sync finished but dcli is still not authenticated: {d}"),
                ),
            },
            AuthState::ToolMissing => SyncResult::Failure {
                message: format!("{} disappeared after sync.", self.tool.binary),
            },
            AuthState::Unknown { last_error } => SyncResult::Failure { message: last_error },
        };
        tracing::info!(success = matches!(result, SyncResult::Success { .. }), "sync finished");
        Ok(result)
    }
}

impl std::fmt::Debug for SyncCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncCoordinator")
            .field("tool", &self.tool)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

/// Clears the single-flight flag when the sync ends, however it ends.
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{CommandOutcome, CommandSpec, ExecMode};
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::sync::Mutex;
    use std::thread;

    /// Holds `dcli sync` open until the test releases it. Every other command
    /// reports a signed-in identity.
    struct HeldSync {
        entered: Mutex<Sender<()>>,
        release: Mutex<Receiver<()>>,
    }

    impl CommandRunner for HeldSync {
        fn run(&self, spec: &CommandSpec) -> CommandOutcome {
            if spec.mode == ExecMode::Interactive {
                self.entered.lock().unwrap().send(()).unwrap();
                self.release.lock().unwrap().recv().unwrap();
                return CommandOutcome::exited(0, "", "");
            }
            CommandOutcome::exited(0, "me@example.com", "")
        }
    }

    #[test]
    fn second_sync_is_rejected_while_first_runs() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let runner = Arc::new(HeldSync {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        });
        let tool = ToolConfig::default();
        let probe = StatusProbe::new(runner.clone(), tool.clone());
        let sync = Arc::new(SyncCoordinator::new(runner, tool, probe));

        let first = {
            let sync = Arc::clone(&sync);
            thread::spawn(move || sync.start_sync())
        };
        entered_rx.recv().unwrap();
        assert!(sync.is_running());
        assert_eq!(sync.start_sync(), Err(SyncError::AlreadyRunning));

        release_tx.send(()).unwrap();
        let identity = "me@example.com".to_string();
        assert_eq!(first.join().unwrap(), Ok(SyncResult::Success { identity: identity.clone() }));
        assert!(!sync.is_running());

        // The flag is free again, so a new sync runs normally.
        release_tx.send(()).unwrap();
        assert_eq!(sync.start_sync(), Ok(SyncResult::Success { identity }));
        assert!(!sync.is_running());
    }
}
