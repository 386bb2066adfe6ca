//! Tracer provider exporting spans to a rotating JSON-lines file.
//!
//! Spans are exported one at a time as they end (simple processor), so a
//! crash loses at most the span that was open.

use super::file_writer::RotatingFile;
use super::span_formatter::SpanFormatter;
use futures_util::future::BoxFuture;
use opentelemetry::trace::TraceError;
use opentelemetry_sdk::export::trace::{ExportResult, SpanData, SpanExporter};
use opentelemetry_sdk::resource::Resource;
use opentelemetry_sdk::trace::TracerProvider;
use std::sync::atomic::{AtomicBool, Ordering};

struct JsonLinesExporter {
    sink: RotatingFile,
    formatter: SpanFormatter,
    closed: AtomicBool,
}

impl JsonLinesExporter {
    fn write_batch(&self, batch: &[SpanData]) -> ExportResult {
        if self.closed.load(Ordering::SeqCst) {
            return Err(TraceError::from("span exporter is shut down"));
        }
        if batch.is_empty() {
            return Ok(());
        }
        let document = self.formatter.format_batch(batch);
        self.sink
            .write_line(&document.to_string())
            .map_err(|e| TraceError::from(format!("{}: {e}", self.sink.path().display())))
    }
}

impl SpanExporter for JsonLinesExporter {
    fn export(&mut self, batch: Vec<SpanData>) -> BoxFuture<'static, ExportResult> {
        Box::pin(std::future::ready(self.write_batch(&batch)))
    }

    fn shutdown(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}

impl std::fmt::Debug for JsonLinesExporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonLinesExporter")
            .field("path", &self.sink.path())
            .field("closed", &self.closed.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Builds a provider that appends every finished span to `sink`.
pub fn create_tracer_provider(sink: RotatingFile, resource: Resource) -> TracerProvider {
    let exporter = JsonLinesExporter {
        sink,
        formatter: SpanFormatter::new(resource.clone()),
        closed: AtomicBool::new(false),
    };

    TracerProvider::builder()
        .with_config(opentelemetry_sdk::trace::Config::default().with_resource(resource))
        .with_simple_exporter(exporter)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{Tracer, TracerProvider as _};
    use opentelemetry::KeyValue;
    use tempfile::TempDir;

    #[test]
    fn finished_spans_land_in_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("spans.json");
        let resource = Resource::new(vec![KeyValue::new("service.name", "dashview")]);
        let provider = create_tracer_provider(RotatingFile::new(path.clone()), resource);

        provider.tracer("test").in_span("sync_account", |_| {});
        let _ = provider.shutdown();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains(r#""name":"sync_account""#));
    }
}
