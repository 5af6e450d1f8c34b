//! Order-creation saga.
//!
//! One order runs three strictly sequential steps against downstream
//! services:
//! 1. Check inventory availability
//! 2. Reserve inventory
//! 3. Create a shipment
//!
//! Every step runs inside its own child span of the saga's root span, and the
//! step's span context is propagated to the downstream service. A failed step
//! short-circuits the saga; nothing is compensated.

pub mod coordinator;
pub mod error;
pub mod order_fulfillment;
pub mod services;
pub mod state;
pub mod step;

pub use coordinator::{SagaCoordinator, SagaReport};
pub use error::{DownstreamError, SagaError};
pub use services::{
    HttpInventoryClient, HttpShippingClient, InMemoryInventoryService, InMemoryShippingService,
    InventoryService, ShippingService, StubReply,
};
pub use state::SagaState;
pub use step::{SagaStep, StepResult};
