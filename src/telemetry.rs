//! Structured logging and OpenTelemetry spans for CV builds.

use crate::config::LogFormat;
use crate::job::{BuildJob, BuildStatus};
use opentelemetry::trace::{Span, Tracer};
use opentelemetry::{global, KeyValue};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const TRACER_NAME: &str = "json-cv";

/// Builds slower than this are logged as a warning.
const SLOW_BUILD_THRESHOLD_MS: i64 = 10_000;

/// Installs the global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG` (default `info`).
pub fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

/// Records a span and a structured log line for a finished build.
///
/// Attributes:
/// - build id, input and output name
/// - status and duration (ms)
/// - asset warning count
/// - HTML and PDF sizes
/// - error message (if failed)
pub fn record_build_telemetry(job: &BuildJob) {
    let tracer = global::tracer(TRACER_NAME);
    let mut span = tracer.start("cv_build");

    span.set_attribute(KeyValue::new("build_id", job.build_id.clone()));
    span.set_attribute(KeyValue::new(
        "input_path",
        job.input_path.display().to_string(),
    ));
    span.set_attribute(KeyValue::new("output_name", job.output_name.clone()));
    span.set_attribute(KeyValue::new("status", job.status.to_string()));
    span.set_attribute(KeyValue::new("asset_warnings", job.asset_warnings as i64));

    if let Some(html_bytes) = job.html_bytes {
        span.set_attribute(KeyValue::new("html_bytes", html_bytes as i64));
    }
    if let Some(pdf_bytes) = job.pdf_bytes {
        span.set_attribute(KeyValue::new("pdf_bytes", pdf_bytes as i64));
    }

    if let Some(duration_ms) = job.duration_ms() {
        span.set_attribute(KeyValue::new("duration_ms", duration_ms));

        info!(
            build_id = %job.build_id,
            duration_ms = duration_ms,
            status = %job.status,
            asset_warnings = job.asset_warnings,
            "CV build finished"
        );

        if duration_ms > SLOW_BUILD_THRESHOLD_MS {
            warn!(
                build_id = %job.build_id,
                duration_ms = duration_ms,
                "CV build exceeded performance threshold ({}ms)",
                SLOW_BUILD_THRESHOLD_MS
            );
        }
    }

    if job.status == BuildStatus::Failed {
        if let Some(ref error) = job.error {
            span.set_attribute(KeyValue::new("error", error.clone()));
            warn!(
                build_id = %job.build_id,
                error = %error,
                "CV build failed"
            );
        }
    }

    span.end();
}

/// Initializes OpenTelemetry with an OTLP exporter.
///
/// Does nothing unless `OTEL_EXPORTER_OTLP_ENDPOINT` is set. Also reads
/// `OTEL_SERVICE_NAME` (default: json-cv). Must run inside a Tokio runtime.
///
/// Returns whether an exporter was installed.
pub fn init_telemetry() -> Result<bool, Box<dyn std::error::Error>> {
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::Config;

    let Ok(endpoint) = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT") else {
        return Ok(false);
    };

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| TRACER_NAME.to_string());

    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(&endpoint),
        )
        .with_trace_config(Config::default().with_resource(
            opentelemetry_sdk::Resource::new(vec![
                KeyValue::new("service.name", service_name),
                KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
            ]),
        ))
        .install_batch(opentelemetry_sdk::runtime::Tokio)?;

    let provider = tracer
        .provider()
        .ok_or("OTLP pipeline returned a tracer without a provider")?;
    global::set_tracer_provider(provider);

    info!("Telemetry initialized: endpoint={}", endpoint);
    Ok(true)
}

/// Flushes pending spans.
pub fn shutdown_telemetry() {
    global::shutdown_tracer_provider();
}
