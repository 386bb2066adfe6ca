//! Background execution of `dcli` operations.
//!
//! [`WorkerPool::post`] spawns one short-lived thread per message. The thread
//! runs the operation through [`CliWorker`] and sends the response back over a
//! channel; it never touches foreground state.

use crate::domain::error::{Result, ViewerError};
use crate::process::{QueryEngine, StatusProbe, SyncCoordinator, SyncResult};
use crate::worker::{WorkerMessage, WorkerResponse};
use std::sync::mpsc::Sender;
use std::sync::Arc;

/// Runs worker messages against the process layer.
#[derive(Debug)]
pub struct CliWorker {
    probe: StatusProbe,
    sync: SyncCoordinator,
    query: QueryEngine,
}

impl CliWorker {
    #[must_use]
    pub const fn new(probe: StatusProbe, sync: SyncCoordinator, query: QueryEngine) -> Self {
        Self { probe, sync, query }
    }

    fn handle_sync(&self) -> WorkerResponse {
        match self.sync.start_sync() {
            Ok(result) => {
                if let SyncResult::Failure { message } = &result {
                    tracing::debug!(message = %message, "sync did not authenticate");
                }
                WorkerResponse::SyncFinished { result }
            }
            Err(e) => WorkerResponse::SyncRejected {
                reason: e.to_string(),
            },
        }
    }

    fn handle_fetch(&self, seq: u64, term: &str) -> WorkerResponse {
        let result = self.query.fetch(term);
        match &result {
            Ok(records) => tracing::debug!(seq, count = records.len(), "fetch complete"),
            Err(e) => tracing::debug!(seq, error = %e, "fetch failed"),
        }
        WorkerResponse::ItemsFetched { seq, result }
    }

    /// Attaches the parent trace context from a message to the current thread.
    ///
    /// Returns a context guard that must be held for the duration of the
    /// operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(
            trace_id,
            span_id,
            TraceFlags::SAMPLED,
            true,
            TraceState::default(),
        );

        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);
        Some(otel_context.attach())
    }

    /// Runs one message to completion and returns its response.
    pub fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", kind = message.kind());
        let _guard = span.entered();

        match message {
            WorkerMessage::ProbeStatus { .. } => WorkerResponse::StatusChecked {
                state: self.probe.check(),
            },
            WorkerMessage::SyncAccount { .. } => self.handle_sync(),
            WorkerMessage::FetchItems { seq, term, .. } => self.handle_fetch(seq, &term),
        }
    }
}

/// Spawns workers and routes their responses to the foreground queue.
///
/// `T` is the foreground's event type; responses are converted with
/// `T::from` before sending.
pub struct WorkerPool<T> {
    worker: Arc<CliWorker>,
    sender: Sender<T>,
}

impl<T> WorkerPool<T>
where
    T: From<WorkerResponse> + Send + 'static,
{
    #[must_use]
    pub fn new(worker: CliWorker, sender: Sender<T>) -> Self {
        Self {
            worker: Arc::new(worker),
            sender,
        }
    }

    /// Starts a worker thread for `message`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Worker`] if the thread cannot be spawned.
    pub fn post(&self, message: WorkerMessage) -> Result<()> {
        let worker = Arc::clone(&self.worker);
        let sender = self.sender.clone();
        let name = format!("dcli-{}", message.kind());

        std::thread::Builder::new()
            .name(name)
            .spawn(move || {
                let response = worker.handle_message(message);
                if sender.send(T::from(response)).is_err() {
                    tracing::debug!("foreground gone, dropping worker response");
                }
            })
            .map(|_| ())
            .map_err(|e| ViewerError::Worker(format!("failed to spawn worker: {e}")))
    }
}

impl<T> std::fmt::Debug for WorkerPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("worker", &self.worker)
            .finish_non_exhaustive()
    }
}
