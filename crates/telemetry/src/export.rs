//! Tracer provider setup: where finished spans go.
//!
//! Production providers batch spans to an OTLP collector over gRPC and also
//! write each finished span as one structured log event.

use opentelemetry::trace::{SpanId, Status};
use opentelemetry::KeyValue;
use opentelemetry_otlp::{ExporterBuildError, WithExportConfig};
use opentelemetry_sdk::error::OTelSdkResult;
use opentelemetry_sdk::trace::{SdkTracerProvider, SpanData, SpanExporter};
use opentelemetry_sdk::Resource;
use thiserror::Error;

use crate::recorder::FinishedSpan;

#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to build OTLP span exporter for {endpoint}: {source}")]
    Exporter {
        endpoint: String,
        #[source]
        source: ExporterBuildError,
    },
}

pub(crate) fn service_resource(service: &str) -> Resource {
    Resource::builder()
        .with_service_name(service.to_string())
        .build()
}

/// Builds the tracer provider for a service binary.
///
/// Must be called inside a Tokio runtime, which the gRPC channel is bound
/// to.
pub fn init_tracer_provider(
    service: &str,
    otlp_endpoint: &str,
) -> Result<SdkTracerProvider, TelemetryError> {
    let otlp = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(otlp_endpoint)
        .build()
        .map_err(|source| TelemetryError::Exporter {
            endpoint: otlp_endpoint.to_string(),
            source,
        })?;

    let provider = SdkTracerProvider::builder()
        .with_resource(service_resource(service))
        .with_batch_exporter(otlp)
        .with_simple_exporter(LogExporter)
        .build();

    tracing::info!(service, endpoint = otlp_endpoint, "OTLP span exporter initialized");
    Ok(provider)
}

/// Flushes pending spans and stops the exporters.
pub fn shutdown_tracer_provider(provider: &SdkTracerProvider) {
    match provider.shutdown() {
        Ok(()) => tracing::info!("tracer provider shut down"),
        Err(e) => tracing::warn!(error = %e, "tracer provider shutdown failed"),
    }
}

/// Writes each finished span as one structured log event and counts it.
///
/// Combined with the JSON log format this yields one record per span,
/// keyed by `trace_id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogExporter;

impl SpanExporter for LogExporter {
    async fn export(&self, batch: Vec<SpanData>) -> OTelSdkResult {
        batch.iter().for_each(log_finished_span);
        Ok(())
    }
}

fn log_finished_span(span: &SpanData) {
    let (status, status_message) = match &span.status {
        Status::Unset => ("unset", None),
        Status::Ok => ("ok", None),
        Status::Error { description } => ("error", Some(description.as_ref())),
    };
    let service = span.service();

    metrics::counter!(
        "spans_finished_total",
        "service" => service.to_string(),
        "status" => status
    )
    .increment(1);

    let parent_span_id = (span.parent_span_id != SpanId::INVALID)
        .then(|| span.parent_span_id.to_string());
    let events: Vec<&str> = span.events.iter().map(|e| e.name.as_ref()).collect();

    tracing::info!(
        target: "telemetry::span",
        service,
        span = %span.name,
        trace_id = %span.span_context.trace_id(),
        span_id = %span.span_context.span_id(),
        parent_span_id = parent_span_id.as_deref(),
        status,
        status_message,
        duration_ms = span.duration().as_millis() as u64,
        attributes = %render_attributes(&span.attributes),
        events = ?events,
        "span finished"
    );
}

/// `key=value` pairs in recording order. Every attribute value has a text
/// form, so nothing is dropped.
fn render_attributes(attributes: &[KeyValue]) -> String {
    attributes
        .iter()
        .map(|kv| format!("{}={}", kv.key.as_str(), kv.value))
        .collect::<Vec<_>>()
        .join(" ")
}
