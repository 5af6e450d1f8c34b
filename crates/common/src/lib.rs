//! Shared types for the order, inventory and shipping services.
//!
//! Everything that crosses a service boundary lives here so that the
//! orchestrator's HTTP clients and the downstream handlers agree on the
//! JSON shape of each request and response.

pub mod config;
pub mod outcome;
pub mod routes;
pub mod shutdown;
pub mod types;
pub mod wire;

pub use config::{LogFormat, ServerConfig};
pub use outcome::{OrderOutcome, OrderStatus};
pub use shutdown::shutdown_signal;
pub use types::OrderId;
pub use wire::{
    CheckInventoryRequest, CreateOrderRequest, CreateShipmentRequest, InventoryResponse,
    ReserveInventoryRequest, ReserveInventoryResponse,
};
