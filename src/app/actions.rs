//! Side effects requested by the event handler.
//!
//! The handler never performs I/O itself apart from the clipboard, which the
//! session owns. Everything else comes back as an [`Action`] for the runtime
//! to execute in order.

use crate::storage::Settings;
use crate::worker::WorkerMessage;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Runs a `dcli` operation on a background worker.
    PostToWorker(WorkerMessage),

    /// Delivers `Event::ClipboardTick { generation }` after `after`.
    ScheduleTick {
        generation: u64,
        after: Duration,
    },

    /// Writes settings through the settings store.
    PersistSettings(Settings),

    /// Opens `command` in a new terminal window.
    LaunchTerminal {
        command: Vec<String>,
    },

    /// Stops reading operator input; an interactive child is about to take
    /// the terminal.
    SuspendInput,

    /// Resumes reading operator input.
    ResumeInput,

    /// Leaves the event loop.
    Quit,
}
