//! The three saga steps and the uniform result each one produces.

use crate::error::DownstreamError;
use crate::order_fulfillment::{
    SPAN_CHECK_INVENTORY, SPAN_CREATE_SHIPMENT, SPAN_RESERVE_INVENTORY,
};
use crate::state::SagaState;

/// One step of the order-creation saga, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SagaStep {
    CheckInventory,
    ReserveInventory,
    CreateShipment,
}

impl SagaStep {
    /// All steps in the order they run.
    pub const ALL: [SagaStep; 3] = [
        SagaStep::CheckInventory,
        SagaStep::ReserveInventory,
        SagaStep::CreateShipment,
    ];

    /// Returns the step name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaStep::CheckInventory => "check",
            SagaStep::ReserveInventory => "reserve",
            SagaStep::CreateShipment => "ship",
        }
    }

    /// Name of the child span wrapping this step.
    pub fn span_name(&self) -> &'static str {
        match self {
            SagaStep::CheckInventory => SPAN_CHECK_INVENTORY,
            SagaStep::ReserveInventory => SPAN_RESERVE_INVENTORY,
            SagaStep::CreateShipment => SPAN_CREATE_SHIPMENT,
        }
    }

    /// The saga state while this step runs.
    pub fn state(&self) -> SagaState {
        match self {
            SagaStep::CheckInventory => SagaState::InventoryCheck,
            SagaStep::ReserveInventory => SagaState::InventoryReserve,
            SagaStep::CreateShipment => SagaState::ShipmentCreate,
        }
    }

    /// Event added to the root span just before the step starts.
    pub fn start_event(&self) -> &'static str {
        match self {
            SagaStep::CheckInventory => "Starting inventory check",
            SagaStep::ReserveInventory => "Starting inventory reservation",
            SagaStep::CreateShipment => "Starting shipment creation",
        }
    }

    /// Root span status message, and outcome message prefix, when this step
    /// fails.
    pub fn failure_summary(&self) -> &'static str {
        match self {
            SagaStep::CheckInventory => "Inventory check failed",
            SagaStep::ReserveInventory => "Inventory reservation failed",
            SagaStep::CreateShipment => "Shipment creation failed",
        }
    }

    /// Client-visible message for a failure of this step.
    pub fn failure_message(&self, detail: &str) -> String {
        format!("{}: {detail}", self.failure_summary())
    }

    /// Describes a downstream failure in this step's words.
    pub fn downstream_detail(&self, err: &DownstreamError) -> String {
        match self {
            SagaStep::CheckInventory if err.is_server_error() => {
                format!("Server error checking inventory: {err}")
            }
            SagaStep::CheckInventory => format!("Error checking inventory: {err}"),
            SagaStep::ReserveInventory if err.is_server_error() => {
                format!("Server error reserving inventory: {err}")
            }
            SagaStep::ReserveInventory => format!("Error reserving inventory: {err}"),
            SagaStep::CreateShipment if err.is_server_error() => {
                format!("Server error creating shipment: {err}")
            }
            SagaStep::CreateShipment if err.is_client_error() => {
                format!("Client error creating shipment: {err}")
            }
            SagaStep::CreateShipment => format!("Unexpected error creating shipment: {err}"),
        }
    }
}

impl std::fmt::Display for SagaStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalized result of one step, whatever the downstream call looked like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub ok: bool,
    pub detail: String,
}

impl StepResult {
    pub fn success(detail: impl Into<String>) -> Self {
        Self {
            ok: true,
            detail: detail.into(),
        }
    }

    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            detail: detail.into(),
        }
    }
}
