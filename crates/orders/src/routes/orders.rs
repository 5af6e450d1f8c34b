//! Order creation and lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::{CreateOrderRequest, OrderOutcome};
use saga::{InventoryService, ShippingService};

use crate::AppState;
use crate::error::ApiError;

/// POST /orders/create — run the order-creation saga.
///
/// Answers 201 with a `Location` header when the order was created and 200
/// with the outcome otherwise, failures included.
#[tracing::instrument(skip(state, req), fields(product_id = %req.product_id, amount = req.amount))]
pub async fn create<I, S>(
    State(state): State<Arc<AppState<I, S>>>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<Response, ApiError>
where
    I: InventoryService + 'static,
    S: ShippingService + 'static,
{
    if req.amount == 0 {
        return Err(ApiError::BadRequest(
            "amount must be a positive integer".to_string(),
        ));
    }

    let report = state.coordinator.create_order(&req).await;
    tracing::info!(
        order_id = %report.outcome.order_id,
        status = %report.outcome.status,
        trace_id = %report.trace_id,
        "order request completed"
    );

    let response = match report.location {
        Some(location) => (
            StatusCode::CREATED,
            [(header::LOCATION, location)],
            Json(report.outcome),
        )
            .into_response(),
        None => (StatusCode::OK, Json(report.outcome)).into_response(),
    };
    Ok(response)
}

/// GET /orders/{id} — orders are not persisted, so there is never one to
/// return.
#[tracing::instrument]
pub async fn get(Path(id): Path<String>) -> Json<Option<OrderOutcome>> {
    Json(None)
}
