//! Saga state machine.

use common::OrderStatus;
use serde::{Deserialize, Serialize};

/// The state of one order-creation saga.
///
/// State transitions:
/// ```text
/// Start ──► InventoryCheck ──► InventoryReserve ──► ShipmentCreate ──► Done
///   │             │                   │                   │
///   └─────────────┴───────────────────┴───────────────────┴──► Failed | Error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SagaState {
    /// The order has been accepted but no step has run.
    #[default]
    Start,

    /// Checking availability with the inventory service.
    InventoryCheck,

    /// Reserving stock with the inventory service.
    InventoryReserve,

    /// Creating the shipment with the shipping service.
    ShipmentCreate,

    /// All steps succeeded (terminal state).
    Done,

    /// A step failed (terminal state).
    Failed,

    /// The orchestration itself faulted (terminal state).
    Error,
}

impl SagaState {
    /// Returns true if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SagaState::Done | SagaState::Failed | SagaState::Error)
    }

    /// Returns true if the saga may move from this state to `next`.
    pub fn can_transition_to(&self, next: SagaState) -> bool {
        use SagaState::*;
        match (self, next) {
            (Start, InventoryCheck)
            | (InventoryCheck, InventoryReserve)
            | (InventoryReserve, ShipmentCreate)
            | (ShipmentCreate, Done) => true,
            (current, Failed | Error) => !current.is_terminal(),
            _ => false,
        }
    }

    /// Maps a terminal state to the client-visible order status.
    pub fn order_status(&self) -> Option<OrderStatus> {
        match self {
            SagaState::Done => Some(OrderStatus::Created),
            SagaState::Failed => Some(OrderStatus::Failed),
            SagaState::Error => Some(OrderStatus::Error),
            _ => None,
        }
    }

    /// Returns the state name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaState::Start => "START",
            SagaState::InventoryCheck => "INVENTORY_CHECK",
            SagaState::InventoryReserve => "INVENTORY_RESERVE",
            SagaState::ShipmentCreate => "SHIPMENT_CREATE",
            SagaState::Done => "DONE",
            SagaState::Failed => "FAILED",
            SagaState::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for SagaState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
