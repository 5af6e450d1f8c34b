//! Span creation and trace-context propagation on the OpenTelemetry SDK.
//!
//! Each service owns a [`Tracer`] bound to an `SdkTracerProvider`. Spans are
//! opened with an explicit parent [`SpanContext`] rather than an ambient
//! "current span", so the causal tree is exactly the chain of contexts
//! handed from caller to callee. Across process boundaries the context
//! travels in the W3C `traceparent` header (see [`propagation`]).
//!
//! A [`SpanHandle`] ends its span exactly once: explicitly via
//! [`SpanHandle::end`], or on drop for every other exit path.

pub mod export;
pub mod propagation;
pub mod recorder;
pub mod span;
pub mod subscriber;
pub mod tracer;

pub use export::{LogExporter, TelemetryError, init_tracer_provider, shutdown_tracer_provider};
pub use opentelemetry::trace::{SpanContext, SpanId, Status, TraceId};
pub use opentelemetry::{KeyValue, Value};
pub use opentelemetry_sdk::trace::SdkTracerProvider;
pub use recorder::{FinishedSpan, SpanRecorder};
pub use span::SpanHandle;
pub use subscriber::init_logging;
pub use tracer::Tracer;
