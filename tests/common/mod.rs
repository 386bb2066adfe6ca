//! Fakes shared by the integration tests.

#![allow(dead_code)]

use dashview::app::{handle_event, Action, AppState, Event};
use dashview::clipboard::ClipboardSink;
use dashview::process::{
    CommandOutcome, CommandRunner, CommandSpec, QueryEngine, StatusProbe, SyncCoordinator, ToolConfig,
};
use dashview::storage::Settings;
use dashview::worker::CliWorker;
use dashview::Theme;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays canned outcomes in order and records the commands it was given.
#[derive(Default)]
pub struct ScriptedRunner {
    outcomes: Mutex<VecDeque<CommandOutcome>>,
    pub calls: Mutex<Vec<CommandSpec>>,
}

impl ScriptedRunner {
    pub fn new(outcomes: impl IntoIterator<Item = CommandOutcome>) -> Arc<Self> {
        Arc::new(Self {
            outcomes: Mutex::new(outcomes.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn push(&self, outcome: CommandOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn args(&self, call: usize) -> Vec<String> {
        self.calls.lock().unwrap()[call].args.clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, spec: &CommandSpec) -> CommandOutcome {
        self.calls.lock().unwrap().push(spec.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted outcome left")
    }
}

/// Clipboard whose contents the test can inspect.
#[derive(Clone, Default)]
pub struct SharedClipboard(pub Arc<Mutex<Option<String>>>);

impl SharedClipboard {
    pub fn contents(&self) -> Option<String> {
        self.0.lock().unwrap().clone()
    }
}

impl ClipboardSink for SharedClipboard {
    fn set_text(&mut self, text: &str) -> dashview::Result<()> {
        *self.0.lock().unwrap() = Some(text.to_string());
        Ok(())
    }

    fn clear(&mut self) -> dashview::Result<()> {
        *self.0.lock().unwrap() = None;
        Ok(())
    }
}

/// A session driven synchronously: worker messages run inline.
pub struct Harness {
    pub state: AppState,
    pub worker: CliWorker,
    pub runner: Arc<ScriptedRunner>,
    pub clipboard: SharedClipboard,
    /// Non-worker actions seen so far.
    pub actions: Vec<Action>,
}

impl Harness {
    pub fn new(outcomes: Vec<CommandOutcome>) -> Self {
        let runner = ScriptedRunner::new(outcomes);
        let tool = ToolConfig::default();
        let probe = StatusProbe::new(runner.clone(), tool.clone());
        let sync = SyncCoordinator::new(runner.clone(), tool.clone(), probe.clone());
        let query = QueryEngine::new(runner.clone(), tool.clone());
        let clipboard = SharedClipboard::default();
        let state = AppState::new(Theme::default(), tool, Settings::default(), Box::new(clipboard.clone()));

        Self {
            state,
            worker: CliWorker::new(probe, sync, query),
            runner,
            clipboard,
            actions: Vec::new(),
        }
    }

    /// Handles `event` and every worker round trip it causes.
    pub fn send(&mut self, event: Event) {
        let mut queue = VecDeque::from([event]);
        while let Some(event) = queue.pop_front() {
            let (_, actions) = handle_event(&mut self.state, &event).unwrap();
            for action in actions {
                match action {
                    Action::PostToWorker(message) => {
                        queue.push_back(Event::from(self.worker.handle_message(message)));
                    }
                    other => self.actions.push(other),
                }
            }
        }
    }

    /// Handles `event` without running the worker messages it posts.
    pub fn send_deferred(&mut self, event: Event) -> Vec<Action> {
        handle_event(&mut self.state, &event).unwrap().1
    }

    pub fn titles(&self) -> Vec<&str> {
        self.state.records.iter().map(|r| r.title()).collect()
    }
}

/// `dcli --version` and `dcli accounts whoami` succeeding.
pub fn signed_in() -> Vec<CommandOutcome> {
    vec![
        CommandOutcome::exited(0, "6.2415.0", ""),
        CommandOutcome::exited(0, "me@example.com\n", ""),
    ]
}
