//! Subscriber setup.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name attached to every exported span.
pub const SERVICE_NAME: &str = "service-finder";

/// Installs the global tracing subscriber.
///
/// The filter comes from `RUST_LOG` when set, else from `config.trace_level`,
/// else `info`. Events go to stderr in the compact format. When
/// `config.trace_file` is set, finished spans are also exported to that file
/// as JSON lines.
///
/// Only the first call installs a subscriber; later calls are no-ops. If the
/// trace file's directory cannot be created, only the file export is skipped.
///
/// # Example
///
/// ```rust
/// use service_finder::observability::init_tracing;
/// use service_finder::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Default::default()
/// };
/// init_tracing(&config);
///
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let otel_layer = config.trace_file.as_ref().and_then(|trace_file| {
        if let Some(parent) = trace_file.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("trace export disabled: cannot create {}: {e}", parent.display());
                return None;
            }
        }

        let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SERVICE_NAME)]);
        let provider = tracer::create_tracer_provider(trace_file.clone(), resource);
        Some(OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME)))
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(otel_layer)
        .try_init();
}
