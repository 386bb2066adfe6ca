//! Application layer coordinating state, events, and actions.
//!
//! This layer sits between the terminal runtime and the process, clipboard,
//! storage and worker layers. All session transitions happen here, on the
//! foreground thread.
//!
//! # Architecture
//!
//! ```text
//! Operator Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                               ↑                                  ↓
//!                               └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing and session transitions
//! - [`history`]: Bounded recent-search list
//! - [`modes`]: Session phase state machine
//! - [`sort`]: Column sorting with per-column direction toggles
//! - [`state`]: Central session state and view model computation

pub mod actions;
pub mod handler;
pub mod history;
pub mod modes;
pub mod sort;
pub mod state;

pub use actions::Action;
pub use handler::{handle_event, handle_event_at, Event};
pub use history::SearchHistory;
pub use modes::SessionPhase;
pub use sort::{Column, Direction};
pub use state::{AppState, Status};
