//! Foreground runtime: the event loop, delayed events and the host seam.
//!
//! - [`foreground`]: [`Runtime`] and the [`Host`] trait implemented by the binary
//! - [`scheduler`]: Deadline queue for clipboard countdown ticks

pub mod foreground;
pub mod scheduler;

pub use foreground::{Host, Runtime};
pub use scheduler::Scheduler;
