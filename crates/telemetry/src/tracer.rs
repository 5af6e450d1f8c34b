use std::borrow::Cow;
use std::sync::Arc;

use opentelemetry::trace::{SpanContext, TraceContextExt as _, Tracer as _, TracerProvider as _};
use opentelemetry::{Context, KeyValue};
use opentelemetry_sdk::trace::{SdkTracer, SdkTracerProvider};

use crate::span::{SpanCounts, SpanHandle};

/// Creates spans for one service.
///
/// Cheap to clone; every clone shares the provider and its exporters.
#[derive(Clone)]
pub struct Tracer {
    service: Arc<str>,
    inner: SdkTracer,
    // Held so the provider is not shut down while spans can still be opened.
    _provider: SdkTracerProvider,
    counts: Arc<SpanCounts>,
}

impl Tracer {
    /// Binds a tracer to `provider`. The service name doubles as the
    /// instrumentation scope, so it travels with every exported span.
    pub fn new(provider: &SdkTracerProvider, service: impl Into<String>) -> Self {
        Self::with_counts(provider, service, Arc::default())
    }

    pub(crate) fn with_counts(
        provider: &SdkTracerProvider,
        service: impl Into<String>,
        counts: Arc<SpanCounts>,
    ) -> Self {
        let service: String = service.into();
        Self {
            inner: provider.tracer(service.clone()),
            service: Arc::from(service),
            _provider: provider.clone(),
            counts,
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service
    }

    pub fn spans_started(&self) -> u64 {
        self.counts.started()
    }

    pub fn spans_ended(&self) -> u64 {
        self.counts.ended()
    }

    /// Opens a span.
    ///
    /// With a valid parent the span joins the parent's trace; without one it
    /// becomes the root of a new trace. There is no ambient current span.
    pub fn start_span(
        &self,
        name: impl Into<Cow<'static, str>>,
        parent: Option<&SpanContext>,
        attributes: impl IntoIterator<Item = KeyValue>,
    ) -> SpanHandle {
        let parent_cx = match parent {
            Some(parent) if parent.is_valid() => {
                Context::new().with_remote_span_context(parent.clone())
            }
            _ => Context::new(),
        };
        let span = self
            .inner
            .span_builder(name)
            .with_attributes(attributes)
            .start_with_context(&self.inner, &parent_cx);
        SpanHandle::start(span, self.counts.clone())
    }
}

impl std::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracer")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}
