//! Inventory service trait and in-memory implementation.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use common::{InventoryResponse, ReserveInventoryRequest, ReserveInventoryResponse};
use telemetry::SpanContext;

use super::StubReply;
use crate::error::SagaError;

/// Trait for inventory operations used by the saga.
///
/// `Ok(None)` means the service answered successfully but sent no body.
#[async_trait]
pub trait InventoryService: Send + Sync {
    /// Asks whether a product is available.
    async fn check_availability(
        &self,
        trace: &SpanContext,
        product_id: &str,
    ) -> Result<Option<InventoryResponse>, SagaError>;

    /// Reserves stock for an order.
    async fn reserve(
        &self,
        trace: &SpanContext,
        request: &ReserveInventoryRequest,
    ) -> Result<Option<ReserveInventoryResponse>, SagaError>;
}

#[derive(Debug, Default)]
struct InMemoryInventoryState {
    check_reply: StubReply,
    reserve_reply: StubReply,
    check_calls: Vec<(SpanContext, String)>,
    reserve_calls: Vec<(SpanContext, ReserveInventoryRequest)>,
}

/// In-memory inventory service for testing.
///
/// Answers like the real service (100 available, 95 remaining) unless a
/// different reply has been scripted, and records every call together with
/// the trace context it carried.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInventoryService {
    state: Arc<RwLock<InMemoryInventoryState>>,
}

impl InMemoryInventoryService {
    /// Creates a new in-memory inventory service.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, InMemoryInventoryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, InMemoryInventoryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Scripts the reply for subsequent availability checks.
    pub fn set_check_reply(&self, reply: StubReply) {
        self.write().check_reply = reply;
    }

    /// Scripts the reply for subsequent reservations.
    pub fn set_reserve_reply(&self, reply: StubReply) {
        self.write().reserve_reply = reply;
    }

    /// Returns the number of availability checks received.
    pub fn check_count(&self) -> usize {
        self.read().check_calls.len()
    }

    /// Returns the number of reservations received.
    pub fn reserve_count(&self) -> usize {
        self.read().reserve_calls.len()
    }

    /// Trace contexts received by availability checks, in call order.
    pub fn check_contexts(&self) -> Vec<SpanContext> {
        self.read().check_calls.iter().map(|(ctx, _)| ctx.clone()).collect()
    }

    /// Reservation requests received, in call order.
    pub fn reserve_requests(&self) -> Vec<ReserveInventoryRequest> {
        self.read()
            .reserve_calls
            .iter()
            .map(|(_, req)| req.clone())
            .collect()
    }
}

#[async_trait]
impl InventoryService for InMemoryInventoryService {
    async fn check_availability(
        &self,
        trace: &SpanContext,
        product_id: &str,
    ) -> Result<Option<InventoryResponse>, SagaError> {
        let reply = {
            let mut state = self.write();
            state.check_calls.push((trace.clone(), product_id.to_string()));
            state.check_reply.clone()
        };

        reply.resolve("memory://inventory/check", || InventoryResponse {
            available: true,
            quantity: 100,
        })
    }

    async fn reserve(
        &self,
        trace: &SpanContext,
        request: &ReserveInventoryRequest,
    ) -> Result<Option<ReserveInventoryResponse>, SagaError> {
        let reply = {
            let mut state = self.write();
            state.reserve_calls.push((trace.clone(), request.clone()));
            state.reserve_reply.clone()
        };

        reply.resolve("memory://inventory/reserve", || ReserveInventoryResponse {
            success: true,
            message: "Inventory reserved successfully".to_string(),
            remaining_quantity: 95,
        })
    }
}
