//! Background workers for `dcli` operations.
//!
//! - `messages`: Request/response types with trace context propagation
//! - `handler`: The worker implementation and the thread-per-message pool

pub mod handler;
pub mod messages;

pub use handler::{CliWorker, WorkerPool};
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
