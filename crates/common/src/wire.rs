//! JSON bodies exchanged between the services.
//!
//! Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};

/// `POST /orders/create` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub product_id: String,
    pub amount: u32,
}

/// `POST /inventory/check` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInventoryRequest {
    pub product_id: String,
}

/// `POST /inventory/check` response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryResponse {
    pub available: bool,
    pub quantity: i64,
}

/// `POST /inventory/reserve` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveInventoryRequest {
    pub order_id: String,
    pub product_id: String,
    pub quantity: u32,
}

/// `POST /inventory/reserve` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReserveInventoryResponse {
    pub success: bool,
    pub message: String,
    pub remaining_quantity: i64,
}

/// `POST /shipments/create` request body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentRequest {
    pub order_id: String,
}
