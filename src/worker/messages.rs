//! Messages between the foreground session and background workers.
//!
//! Requests carry the trace context of the span that issued them so worker
//! spans show up as children of the foreground operation.

use crate::domain::{CliError, Record};
use crate::process::{AuthState, SyncResult};

/// Distributed tracing context for cross-thread span propagation.
///
/// Captures the OpenTelemetry trace and span IDs of the current span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans across threads.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Creates a trace context from the current tracing span.
    ///
    /// Returns `None` when no OpenTelemetry layer is installed or the current
    /// span context is invalid.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();

        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            tracing::trace!("no valid span context to propagate");
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates `WorkerMessage` constructors that attach the current trace
/// context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    probe_status(ProbeStatus {}),
    sync_account(SyncAccount {}),
    fetch_items(FetchItems { seq: u64, term: String }),
}

/// Work for a background worker. Each message runs exactly one `dcli`
/// operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// Check installation and authentication.
    ProbeStatus {
        trace_context: Option<TraceContext>,
    },

    /// Run `dcli sync` interactively, then confirm the identity.
    SyncAccount {
        trace_context: Option<TraceContext>,
    },

    /// List items matching `term`; an empty term lists everything.
    FetchItems {
        /// Query sequence number, echoed in the response.
        seq: u64,
        term: String,
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Short operation name, used for thread names and spans.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ProbeStatus { .. } => "probe",
            Self::SyncAccount { .. } => "sync",
            Self::FetchItems { .. } => "fetch",
        }
    }

    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::ProbeStatus { trace_context }
            | Self::SyncAccount { trace_context }
            | Self::FetchItems { trace_context, .. } => trace_context.as_ref(),
        }
    }
}

/// Results sent back to the foreground.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerResponse {
    StatusChecked {
        state: AuthState,
    },

    SyncFinished {
        result: SyncResult,
    },

    /// A sync was requested while another was running.
    SyncRejected {
        reason: String,
    },

    ItemsFetched {
        /// Sequence number of the request this answers.
        seq: u64,
        result: Result<Vec<Record>, CliError>,
    },
}
