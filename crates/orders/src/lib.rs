//! Orders HTTP API.
//!
//! Accepts order requests and runs the order-creation saga against the
//! inventory and shipping services, tracing the whole run as one distributed
//! trace rooted in this service.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use saga::services::build_http_client;
use saga::{
    HttpInventoryClient, HttpShippingClient, InventoryService, SagaCoordinator, ShippingService,
};
use telemetry::Tracer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{Config, ConfigError};

/// Service name reported on every span.
pub const SERVICE_NAME: &str = "order-service";

/// Shared application state accessible from all handlers.
pub struct AppState<I, S>
where
    I: InventoryService,
    S: ShippingService,
{
    pub coordinator: SagaCoordinator<I, S>,
}

impl<I, S> AppState<I, S>
where
    I: InventoryService,
    S: ShippingService,
{
    pub fn new(tracer: Tracer, inventory: I, shipping: S) -> Arc<Self> {
        Arc::new(Self {
            coordinator: SagaCoordinator::new(tracer, inventory, shipping),
        })
    }
}

/// Builds state that reaches the downstream services over HTTP.
pub fn create_http_state(
    tracer: Tracer,
    config: &Config,
) -> reqwest::Result<Arc<AppState<HttpInventoryClient, HttpShippingClient>>> {
    let client = build_http_client(config.downstream_timeout)?;
    Ok(AppState::new(
        tracer,
        HttpInventoryClient::new(config.inventory_url.clone(), client.clone()),
        HttpShippingClient::new(config.shipping_url.clone(), client),
    ))
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<I, S>(state: Arc<AppState<I, S>>, metrics_handle: PrometheusHandle) -> Router
where
    I: InventoryService + 'static,
    S: ShippingService + 'static,
{
    let metrics_router = Router::new()
        .route("/metrics", get(common::routes::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(common::routes::health))
        .route("/orders/create", post(routes::orders::create::<I, S>))
        .route("/orders/{id}", get(routes::orders::get))
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
