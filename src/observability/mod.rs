//! Logging and OpenTelemetry span export to local files.
//!
//! ```text
//! tracing ─┬─ fmt layer ──────────────────────────→ dashview.log
//!          └─ tracing-opentelemetry → SDK → JsonLinesExporter → dashview-otlp.json
//! ```
//!
//! Both files live in the data directory and rotate at 10 MB, keeping three
//! backups. Worker threads re-attach the trace context carried by their
//! message, so a fetch span nests under the event that requested it.
//!
//! # Modules
//!
//! - [`init`]: Subscriber setup and level resolution
//! - `tracer`: Tracer provider with the file exporter
//! - `span_formatter`: OTLP JSON encoding
//! - [`file_writer`]: Size-rotated file shared by both outputs

pub mod file_writer;
pub mod init;
mod span_formatter;
mod tracer;

pub use init::init_tracing;
