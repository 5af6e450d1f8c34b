//! Inventory service.
//!
//! Answers availability checks and reservations with fixed numbers. Product
//! IDs ending in `-with-error` fail with a server error and IDs ending in
//! `-with-delay` stall for the configured delay, so that failures and
//! latency show up in the distributed trace.

pub mod config;
pub mod error;
pub mod routes;
pub mod sentinel;
pub mod service;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use telemetry::Tracer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::InventoryError;
pub use service::Inventory;

/// Service name reported on every span.
pub const SERVICE_NAME: &str = "inventory-service";

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub inventory: Inventory,
}

impl AppState {
    pub fn new(tracer: Tracer, config: &Config) -> Arc<Self> {
        Arc::new(Self {
            inventory: Inventory::new(tracer, config.simulated_delay),
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
        .route("/inventory/check", post(routes::inventory::check))
        .route("/inventory/reserve", post(routes::inventory::reserve))
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
