//! In-process span collection backed by the SDK's in-memory exporter.
//!
//! Tracers handed out by one [`SpanRecorder`] export synchronously into the
//! same buffer, so several services in one test process assemble a single
//! cross-service trace that can be queried after the fact.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use opentelemetry::trace::{SpanId, Status, TraceId};
use opentelemetry::Value;
use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider, SpanData};

use crate::export::service_resource;
use crate::span::SpanCounts;
use crate::tracer::Tracer;

#[derive(Debug, Clone, Default)]
pub struct SpanRecorder {
    exporter: InMemorySpanExporter,
    // Dropping the last provider clone shuts its exporter down.
    providers: Arc<Mutex<Vec<SdkTracerProvider>>>,
    counts: Arc<SpanCounts>,
}

impl SpanRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracer for `service` whose spans land in this recorder.
    pub fn tracer(&self, service: &str) -> Tracer {
        let provider = SdkTracerProvider::builder()
            .with_resource(service_resource(service))
            .with_simple_exporter(self.exporter.clone())
            .build();
        let tracer = Tracer::with_counts(&provider, service, self.counts.clone());
        self.providers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(provider);
        tracer
    }

    pub fn started_count(&self) -> u64 {
        self.counts.started()
    }

    pub fn ended_count(&self) -> u64 {
        self.counts.ended()
    }

    /// Finished spans in end order.
    pub fn finished_spans(&self) -> Vec<SpanData> {
        match self.exporter.get_finished_spans() {
            Ok(spans) => spans,
            Err(e) => {
                tracing::warn!(error = %e, "could not read recorded spans");
                Vec::new()
            }
        }
    }

    /// The first finished span called `name`.
    pub fn span_named(&self, name: &str) -> Option<SpanData> {
        self.finished_spans().into_iter().find(|s| s.name == name)
    }

    pub fn spans_named(&self, name: &str) -> Vec<SpanData> {
        self.finished_spans()
            .into_iter()
            .filter(|s| s.name == name)
            .collect()
    }

    pub fn spans_for_trace(&self, trace_id: TraceId) -> Vec<SpanData> {
        self.finished_spans()
            .into_iter()
            .filter(|s| s.span_context.trace_id() == trace_id)
            .collect()
    }

    pub fn reset(&self) {
        self.exporter.reset();
    }
}

/// Query helpers over an exported span.
pub trait FinishedSpan {
    /// Instrumentation scope name, which [`Tracer`] sets to the service name.
    fn service(&self) -> &str;
    fn trace_id(&self) -> TraceId;
    fn span_id(&self) -> SpanId;
    /// The parent span id; `None` for a trace root.
    fn parent(&self) -> Option<SpanId>;
    fn attribute(&self, key: &str) -> Option<&Value>;
    /// The attribute's text form, whatever its type.
    fn attribute_text(&self, key: &str) -> Option<String>;
    fn has_event(&self, name: &str) -> bool;
    fn is_error(&self) -> bool;
    fn duration(&self) -> Duration;
}

impl FinishedSpan for SpanData {
    fn service(&self) -> &str {
        self.instrumentation_scope.name()
    }

    fn trace_id(&self) -> TraceId {
        self.span_context.trace_id()
    }

    fn span_id(&self) -> SpanId {
        self.span_context.span_id()
    }

    fn parent(&self) -> Option<SpanId> {
        (self.parent_span_id != SpanId::INVALID).then_some(self.parent_span_id)
    }

    fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes
            .iter()
            .find(|kv| kv.key.as_str() == key)
            .map(|kv| &kv.value)
    }

    fn attribute_text(&self, key: &str) -> Option<String> {
        self.attribute(key).map(Value::to_string)
    }

    fn has_event(&self, name: &str) -> bool {
        self.events.iter().any(|e| e.name == name)
    }

    fn is_error(&self) -> bool {
        matches!(self.status, Status::Error { .. })
    }

    fn duration(&self) -> Duration {
        self.end_time
            .duration_since(self.start_time)
            .unwrap_or_default()
    }
}
