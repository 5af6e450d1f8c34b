//! Inventory error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failures raised by the inventory operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Injected by the `-with-error` product suffix during a lookup.
    #[error("Intentional inventory error for product: {0}")]
    SimulatedLookup(String),

    /// Injected by the `-with-error` product suffix during a reservation.
    #[error("Intentional inventory reservation error for product: {0}")]
    SimulatedReservation(String),
}

impl IntoResponse for InventoryError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        tracing::error!(error = %message, "inventory request failed");
        let body = serde_json::json!({ "error": message });
        (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(body)).into_response()
    }
}
