//! The client-visible result of one order-creation saga.

use serde::{Deserialize, Serialize};

use crate::types::OrderId;

/// Final status of an order-creation request.
///
/// `Failed` is an expected business failure (a dependency said no or
/// errored). `Error` is an unanticipated fault in the orchestration itself,
/// kept separate so operators can alert on it differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Created,
    Failed,
    Error,
}

impl OrderStatus {
    /// Returns the status name as it appears on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "CREATED",
            OrderStatus::Failed => "FAILED",
            OrderStatus::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `POST /orders/create` response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderOutcome {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub message: String,
}

impl OrderOutcome {
    pub fn created(order_id: OrderId) -> Self {
        Self {
            order_id,
            status: OrderStatus::Created,
            message: "Order successfully created".to_string(),
        }
    }

    pub fn failed(order_id: OrderId, message: impl Into<String>) -> Self {
        Self {
            order_id,
            status: OrderStatus::Failed,
            message: message.into(),
        }
    }

    pub fn error(order_id: OrderId, message: impl Into<String>) -> Self {
        Self {
            order_id,
            status: OrderStatus::Error,
            message: message.into(),
        }
    }

    /// Returns true if the saga ran to completion.
    pub fn is_created(&self) -> bool {
        self.status == OrderStatus::Created
    }
}
