//! The foreground event loop.
//!
//! [`Runtime`] owns the session state and is the only code that touches it.
//! Operator input, worker responses and scheduled clipboard ticks all arrive
//! as [`Event`]s on one channel or from the [`Scheduler`], so session updates
//! are serialized without locks.
//!
//! Nothing is drawn while input is suspended: an interactive `dcli sync` owns
//! the terminal until the runtime resumes input, which triggers one redraw.

use super::scheduler::Scheduler;
use crate::app::{handle_event, Action, AppState, Event};
use crate::domain::error::Result;
use crate::storage::SettingsStore;
use crate::worker::{CliWorker, WorkerPool};
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

/// Upper bound on one wait when nothing is scheduled.
const IDLE_WAIT: Duration = Duration::from_millis(500);

/// The surface the runtime draws on and hands the terminal to.
pub trait Host {
    /// Draws the current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the output could not be written.
    fn render(&mut self, state: &AppState) -> Result<()>;

    /// Opens `command` in a new terminal window.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ViewerError::Terminal`] when no terminal emulator could
    /// be started.
    fn launch_terminal(&mut self, command: &[String]) -> Result<()>;

    /// Stops forwarding operator input.
    fn suspend_input(&mut self);

    /// Resumes forwarding operator input.
    fn resume_input(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Single-threaded driver for one session.
pub struct Runtime<H> {
    state: AppState,
    host: H,
    store: Box<dyn SettingsStore>,
    workers: WorkerPool<Event>,
    sender: Sender<Event>,
    events: Receiver<Event>,
    scheduler: Scheduler<Event>,
    input_suspended: bool,
    redraw: bool,
}

impl<H: Host> Runtime<H> {
    pub fn new(state: AppState, host: H, store: Box<dyn SettingsStore>, worker: CliWorker) -> Self {
        let (sender, events) = mpsc::channel();
        Self {
            state,
            host,
            store,
            workers: WorkerPool::new(worker, sender.clone()),
            sender,
            events,
            scheduler: Scheduler::new(),
            input_suspended: false,
            redraw: false,
        }
    }

    /// Sender for operator input. Events sent here are handled in order with
    /// worker responses.
    #[must_use]
    pub fn sender(&self) -> Sender<Event> {
        self.sender.clone()
    }

    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Runs until an [`Action::Quit`] is executed.
    ///
    /// # Errors
    ///
    /// Returns an error if the first render fails. Later failures are
    /// reported on the status line instead.
    pub fn run(&mut self) -> Result<()> {
        let _span = tracing::info_span!("runtime").entered();
        self.host.render(&self.state)?;

        if self.dispatch(Event::Start) == Flow::Quit {
            return Ok(());
        }

        loop {
            for event in self.scheduler.pop_due(Instant::now()) {
                if self.dispatch(event) == Flow::Quit {
                    return Ok(());
                }
            }

            let wait = self
                .scheduler
                .time_until_next(Instant::now())
                .map_or(IDLE_WAIT, |d| d.min(IDLE_WAIT));

            match self.events.recv_timeout(wait) {
                Ok(event) => {
                    if self.dispatch(event) == Flow::Quit {
                        return Ok(());
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!("event channel closed");
                    self.dispatch(Event::Quit);
                    return Ok(());
                }
            }
        }
    }

    /// Handles one event plus any failures its actions produce.
    fn dispatch(&mut self, event: Event) -> Flow {
        let mut pending = VecDeque::from([event]);

        while let Some(event) = pending.pop_front() {
            let (should_render, actions) = match handle_event(&mut self.state, &event) {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!(error = %e, "error handling event");
                    continue;
                }
            };
            tracing::debug!(action_count = actions.len(), should_render, "event handled");

            for action in actions {
                match self.execute_action(action) {
                    Ok(Flow::Quit) => return Flow::Quit,
                    Ok(Flow::Continue) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "action failed");
                        pending.push_back(Event::ActionFailed { message: e.to_string() });
                    }
                }
            }

            if should_render || self.redraw || !pending.is_empty() {
                self.render();
            }
        }
        Flow::Continue
    }

    fn render(&mut self) {
        if self.input_suspended {
            tracing::trace!("terminal handed to child process, frame skipped");
            return;
        }
        self.redraw = false;
        if let Err(e) = self.host.render(&self.state) {
            tracing::error!(error = %e, "render failed");
        }
    }

    fn execute_action(&mut self, action: Action) -> Result<Flow> {
        match action {
            Action::PostToWorker(message) => {
                tracing::debug!(kind = message.kind(), "posting message to worker");
                self.workers.post(message)?;
            }
            Action::ScheduleTick { generation, after } => {
                self.scheduler
                    .schedule(Event::ClipboardTick { generation }, Instant::now(), after);
            }
            Action::PersistSettings(settings) => {
                self.store.save(&settings)?;
            }
            Action::LaunchTerminal { command } => {
                tracing::info!(program = command.first().map(String::as_str), "launching terminal");
                self.host.launch_terminal(&command)?;
            }
            Action::SuspendInput => {
                self.input_suspended = true;
                self.host.suspend_input();
            }
            Action::ResumeInput => {
                self.host.resume_input();
                self.input_suspended = false;
                self.redraw = true;
            }
            Action::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }
}

impl<H> std::fmt::Debug for Runtime<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("phase", &self.state.phase)
            .field("scheduled", &self.scheduler.len())
            .field("input_suspended", &self.input_suspended)
            .finish_non_exhaustive()
    }
}
