//! Shipment creation endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use common::CreateShipmentRequest;
use telemetry::propagation;

use crate::AppState;

/// POST /shipments/create — acknowledge a shipment for an order.
#[tracing::instrument(skip(state, headers, req), fields(order_id = %req.order_id))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateShipmentRequest>,
) -> String {
    let parent = propagation::extract(&headers);
    state.shipping.create_shipment(parent.as_ref(), &req.order_id)
}
