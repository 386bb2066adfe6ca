//! Clipboard access and the timed-exposure guard around it.
//!
//! - [`sink`]: The [`ClipboardSink`] trait and the `arboard` implementation
//! - [`guard`]: [`ClipboardGuard`], which makes sure every copied secret is
//!   erased after a bounded time

pub mod guard;
pub mod sink;

pub use guard::{ClipboardExposure, ClipboardGuard, CopyKind, TickOutcome, MAX_CLEAR_DELAY};
pub use sink::{ClipboardSink, SystemClipboard};
