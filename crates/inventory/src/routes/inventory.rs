//! Inventory check and reservation endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use common::{CheckInventoryRequest, InventoryResponse, ReserveInventoryRequest, ReserveInventoryResponse};
use telemetry::propagation;

use crate::AppState;
use crate::error::InventoryError;

/// POST /inventory/check — report availability for a product.
#[tracing::instrument(skip(state, headers, req), fields(product_id = %req.product_id))]
pub async fn check(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CheckInventoryRequest>,
) -> Result<Json<InventoryResponse>, InventoryError> {
    let parent = propagation::extract(&headers);
    let response = state
        .inventory
        .check_availability(parent.as_ref(), &req.product_id)
        .await?;
    Ok(Json(response))
}

/// POST /inventory/reserve — reserve units of a product for an order.
#[tracing::instrument(skip(state, headers, req), fields(order_id = %req.order_id, product_id = %req.product_id))]
pub async fn reserve(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<ReserveInventoryRequest>,
) -> Result<Json<ReserveInventoryResponse>, InventoryError> {
    let parent = propagation::extract(&headers);
    let response = state.inventory.reserve(parent.as_ref(), &req).await?;
    Ok(Json(response))
}
