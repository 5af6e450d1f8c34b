//! Shipping service.

pub mod routes;
pub mod service;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use telemetry::Tracer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use service::Shipping;

/// Service name reported on every span.
pub const SERVICE_NAME: &str = "shipping-service";

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8082;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub shipping: Shipping,
}

impl AppState {
    pub fn new(tracer: Tracer) -> Arc<Self> {
        Arc::new(Self {
            shipping: Shipping::new(tracer),
        })
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(common::routes::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(common::routes::health))
        .route("/shipments/create", post(routes::shipments::create))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
