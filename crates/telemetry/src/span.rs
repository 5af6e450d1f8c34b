//! An owned, end-once wrapper around an SDK span.

use std::borrow::Cow;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use opentelemetry::trace::{Span as _, SpanContext, Status, TraceId};
use opentelemetry::{Key, KeyValue, Value};
use opentelemetry_sdk::trace::Span;

/// Running totals of opened and closed spans, shared by tracer clones.
#[derive(Debug, Default)]
pub(crate) struct SpanCounts {
    started: AtomicU64,
    ended: AtomicU64,
}

impl SpanCounts {
    pub(crate) fn started(&self) -> u64 {
        self.started.load(Ordering::Relaxed)
    }

    pub(crate) fn ended(&self) -> u64 {
        self.ended.load(Ordering::Relaxed)
    }
}

/// An open span.
///
/// Ends exactly once: explicitly via [`SpanHandle::end`], or on drop. A span
/// dropped while the thread is panicking is marked as an error first.
/// Mutations after the span ended are ignored.
pub struct SpanHandle {
    span: Span,
    context: SpanContext,
    counts: Arc<SpanCounts>,
    ended: bool,
}

impl SpanHandle {
    pub(crate) fn start(span: Span, counts: Arc<SpanCounts>) -> Self {
        counts.started.fetch_add(1, Ordering::Relaxed);
        let context = span.span_context().clone();
        Self {
            span,
            context,
            counts,
            ended: false,
        }
    }

    /// The context children of this span are parented on.
    pub fn context(&self) -> SpanContext {
        self.context.clone()
    }

    pub fn trace_id(&self) -> TraceId {
        self.context.trace_id()
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn set_attribute(&mut self, key: impl Into<Key>, value: impl Into<Value>) {
        if !self.ended {
            self.span.set_attribute(KeyValue::new(key, value));
        }
    }

    pub fn add_event(&mut self, name: impl Into<Cow<'static, str>>) {
        self.add_event_with_attributes(name, Vec::new());
    }

    pub fn add_event_with_attributes(
        &mut self,
        name: impl Into<Cow<'static, str>>,
        attributes: Vec<KeyValue>,
    ) {
        if !self.ended {
            self.span.add_event(name, attributes);
        }
    }

    /// Adds an `exception` event carrying the error's type, message and
    /// immediate cause.
    pub fn record_exception<E: std::error::Error + ?Sized>(&mut self, error: &E) {
        let mut attributes = vec![
            KeyValue::new("exception.type", short_type_name::<E>()),
            KeyValue::new("exception.message", error.to_string()),
        ];
        if let Some(cause) = error.source() {
            attributes.push(KeyValue::new("exception.cause", cause.to_string()));
        }
        self.add_event_with_attributes("exception", attributes);
    }

    /// Adds an `exception` event for a failure that is not an `Error` value,
    /// such as a caught panic.
    pub fn record_exception_message(&mut self, kind: &str, message: &str) {
        self.add_event_with_attributes(
            "exception",
            vec![
                KeyValue::new("exception.type", kind.to_string()),
                KeyValue::new("exception.message", message.to_string()),
            ],
        );
    }

    /// Sets the span status. Follows the SDK's precedence: `Ok` is final and
    /// `Unset` never overwrites.
    pub fn set_status(&mut self, status: Status) {
        if !self.ended {
            self.span.set_status(status);
        }
    }

    /// Ends the span. Later calls are no-ops.
    pub fn end(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;
        self.span.end();
        self.counts.ended.fetch_add(1, Ordering::Relaxed);
    }
}

impl Drop for SpanHandle {
    fn drop(&mut self) {
        if !self.ended {
            if std::thread::panicking() {
                self.span.set_status(Status::error("span dropped during panic"));
            }
            self.end();
        }
    }
}

impl std::fmt::Debug for SpanHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpanHandle")
            .field("trace_id", &self.context.trace_id())
            .field("span_id", &self.context.span_id())
            .field("ended", &self.ended)
            .finish()
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
