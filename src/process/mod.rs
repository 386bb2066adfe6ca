//! Orchestration of the external `dcli` process.
//!
//! Everything here runs on worker threads except [`QueryTracker`], which the
//! foreground owns.
//!
//! # Modules
//!
//! - [`executor`]: Running one command with captured or inherited I/O
//! - [`tool`]: The concrete `dcli` command lines and time budgets
//! - [`probe`]: Tool presence and authentication checks
//! - [`sync`]: Interactive re-authentication with single-flight protection
//! - [`query`]: List queries, deduplication and query sequencing

pub mod executor;
pub mod probe;
pub mod query;
pub mod sync;
pub mod tool;

pub use executor::{CommandOutcome, CommandRunner, CommandSpec, ExecMode, SystemRunner};
pub use probe::{AuthState, StatusProbe};
pub use query::{Acceptance, QueryEngine, QueryTicket, QueryTracker};
pub use sync::{SyncCoordinator, SyncError, SyncResult};
pub use tool::{ToolConfig, INSTALL_URL};

#[cfg(test)]
pub(crate) mod fake {
    use super::{CommandOutcome, CommandRunner, CommandSpec};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays canned outcomes in order and records every spec it was given.
    #[derive(Default)]
    pub struct ScriptedRunner {
        outcomes: Mutex<VecDeque<CommandOutcome>>,
        pub calls: Mutex<Vec<CommandSpec>>,
    }

    impl ScriptedRunner {
        pub fn new(outcomes: impl IntoIterator<Item = CommandOutcome>) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl CommandRunner for ScriptedRunner {
        fn run(&self, spec: &CommandSpec) -> CommandOutcome {
            self.calls.lock().unwrap().push(spec.clone());
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .expect("scripted runner ran out of outcomes")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::ScriptedRunner;
    use super::*;
    use std::sync::Arc;

    fn probe_with(outcomes: Vec<CommandOutcome>) -> (StatusProbe, Arc<ScriptedRunner>) {
        let runner = Arc::new(ScriptedRunner::new(outcomes));
        (StatusProbe::new(runner.clone(), ToolConfig::default()), runner)
    }

    #[test]
    fn missing_tool_short_circuits() {
        let (probe, runner) = probe_with(vec![CommandOutcome::not_found()]);
        assert_eq!(probe.check(), AuthState::ToolMissing);
        assert_eq!(runner.call_count(), 1);
    }

    #[test]
    fn empty_successful_whoami_is_not_authenticated() {
        let (probe, _) = probe_with(vec![
            CommandOutcome::exited(0, "6.2.0", ""),
            CommandOutcome::exited(0, "   \n", ""),
        ]);
        assert!(matches!(probe.check(), AuthState::NotAuthenticated { .. }));
    }

    #[test]
    fn whoami_with_identity_is_authenticated() {
        let (probe, runner) = probe_with(vec![
            CommandOutcome::exited(0, "6.2.0", ""),
            CommandOutcome::exited(0, "me@example.com\n", ""),
        ]);
        assert_eq!(
            probe.check(),
            AuthState::Authenticated { identity: "me@example.com".to_string() }
        );
        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[0].args, ["--version"]);
        assert_eq!(calls[1].args, ["accounts", "whoami"]);
    }

    #[test]
    fn whoami_timeout_is_not_authenticated() {
        let (probe, _) = probe_with(vec![
            CommandOutcome::exited(0, "6.2.0", ""),
            CommandOutcome::timed_out("", ""),
        ]);
        assert!(matches!(probe.check(), AuthState::NotAuthenticated { diagnostic: Some(_) }));
    }

    #[test]
    fn failing_whoami_carries_its_diagnostic() {
        let (probe, _) = probe_with(vec![
            CommandOutcome::exited(0, "6.2.0", ""),
            CommandOutcome::exited(1, "", "not logged in\n"),
        ]);
        assert_eq!(
            probe.check(),
            AuthState::NotAuthenticated { diagnostic: Some("not logged in".to_string()) }
        );
    }

    #[test]
    fn spawn_failure_is_unknown() {
        let (probe, _) = probe_with(vec![CommandOutcome::spawn_failed("permission denied")]);
        assert_eq!(
            probe.check(),
            AuthState::Unknown { last_error: "permission denied".to_string() }
        );
    }

    #[test]
    fn failed_sync_is_not_reprobed() {
        let runner = Arc::new(ScriptedRunner::new(vec![CommandOutcome::exited(2, "", "")]));
        let tool = ToolConfig::default();
        let probe = StatusProbe::new(runner.clone(), tool.clone());
        let sync = SyncCoordinator::new(runner.clone(), tool, probe);

        let result = sync.start_sync().unwrap();
        assert!(matches!(result, SyncResult::Failure { .. }));
        assert_eq!(runner.call_count(), 1);
        assert!(!sync.is_running());
    }

    #[test]
    fn successful_sync_confirms_identity() {
        let runner = Arc::new(ScriptedRunner::new(vec![
            CommandOutcome::exited(0, "", ""),
            CommandOutcome::exited(0, "me@example.com", ""),
        ]));
        let tool = ToolConfig::default();
        let probe = StatusProbe::new(runner.clone(), tool.clone());
        let sync = SyncCoordinator::new(runner.clone(), tool, probe);

        assert_eq!(
            sync.start_sync().unwrap(),
            SyncResult::Success { identity: "me@example.com".to_string() }
        );
        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls[0].mode, ExecMode::Interactive);
        assert_eq!(calls[1].args, ["accounts", "whoami"]);
    }

    #[test]
    fn fetch_reports_malformed_output() {
        let runner = Arc::new(ScriptedRunner::new(vec![CommandOutcome::exited(0, "oops", "")]));
        let engine = QueryEngine::new(runner, ToolConfig::default());
        assert!(matches!(
            engine.fetch("x"),
            Err(crate::domain::CliError::MalformedOutput { .. })
        ));
    }
}
