//! Subscriber setup: a plain-text log file plus OTLP span export.

use super::file_writer::{RotatingFile, SharedLog};
use super::tracer;
use crate::infrastructure::paths::{LOG_FILE, TRACE_FILE};
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use std::sync::Arc;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when neither `RUST_LOG` nor the configuration sets one.
pub const DEFAULT_LEVEL: &str = "info";

/// Installs the global subscriber.
///
/// Filtering comes from `RUST_LOG` when set, otherwise from
/// `config.trace_level`, otherwise [`DEFAULT_LEVEL`]. Events go to
/// `dashview.log` and spans to `dashview-otlp.json`, both in the data
/// directory and both rotated at 10 MB.
///
/// Standard output belongs to the interface, so nothing is printed. When the
/// data directory cannot be created the application runs without tracing.
/// Calling this more than once has no effect.
pub fn init_tracing(config: &Config) {
    let Ok(data_dir) = config.resolve_data_dir() else {
        return;
    };
    if std::fs::create_dir_all(&data_dir).is_err() {
        return;
    }

    let level = config.trace_level.as_deref().unwrap_or(DEFAULT_LEVEL);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log = Arc::new(RotatingFile::new(data_dir.join(LOG_FILE)));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_thread_names(true)
        .with_writer(move || SharedLog(Arc::clone(&log)));

    let resource = Resource::new(vec![
        KeyValue::new("service.name", "dashview"),
        KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
    ]);
    let provider =
        tracer::create_tracer_provider(RotatingFile::new(data_dir.join(TRACE_FILE)), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer("dashview"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init();
}
