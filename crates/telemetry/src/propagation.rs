//! Carrying a [`SpanContext`] across HTTP calls in the W3C `traceparent`
//! header, via the SDK's [`TraceContextPropagator`].

use http::header::{HeaderName, HeaderValue};
use http::HeaderMap;
use opentelemetry::propagation::{Extractor, Injector, TextMapPropagator};
use opentelemetry::trace::{SpanContext, TraceContextExt};
use opentelemetry::Context;
use opentelemetry_sdk::propagation::TraceContextPropagator;

/// W3C trace-context header name.
pub const TRACEPARENT: &str = "traceparent";

struct HeaderInjector<'a>(&'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        match (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            (Ok(name), Ok(value)) => {
                self.0.insert(name, value);
            }
            _ => tracing::warn!(header = key, "could not encode trace-context header"),
        }
    }
}

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

/// Writes `context` into `headers`, replacing any existing value. An invalid
/// context writes nothing.
pub fn inject(context: &SpanContext, headers: &mut HeaderMap) {
    let cx = Context::new().with_remote_span_context(context.clone());
    TraceContextPropagator::new().inject_context(&cx, &mut HeaderInjector(headers));
}

/// Reads the remote parent context from `headers`.
///
/// A missing header yields `None`. So does a malformed one: the request is
/// then traced as a new root rather than rejected.
pub fn extract(headers: &HeaderMap) -> Option<SpanContext> {
    let cx = TraceContextPropagator::new().extract(&HeaderExtractor(headers));
    let context = cx.span().span_context().clone();
    if context.is_valid() {
        return Some(context);
    }
    if let Some(raw) = headers.get(TRACEPARENT) {
        tracing::debug!(traceparent = ?raw, "ignoring malformed traceparent");
    }
    None
}

/// Parses a single `traceparent` value.
pub fn from_traceparent(value: &str) -> Option<SpanContext> {
    let mut headers = HeaderMap::new();
    headers.insert(TRACEPARENT, HeaderValue::from_str(value).ok()?);
    extract(&headers)
}
