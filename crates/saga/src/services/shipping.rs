//! Shipping service trait and in-memory implementation.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use telemetry::SpanContext;

use super::StubReply;
use crate::error::SagaError;

/// Trait for shipping operations used by the saga.
#[async_trait]
pub trait ShippingService: Send + Sync {
    /// Creates a shipment for an order, returning the service's
    /// acknowledgement text.
    async fn create_shipment(&self, trace: &SpanContext, order_id: &str)
    -> Result<String, SagaError>;
}

#[derive(Debug, Default)]
struct InMemoryShippingState {
    reply: StubReply,
    calls: Vec<(SpanContext, String)>,
}

/// In-memory shipping service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryShippingService {
    state: Arc<RwLock<InMemoryShippingState>>,
}

impl InMemoryShippingService {
    /// Creates a new in-memory shipping service.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, InMemoryShippingState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Scripts the reply for subsequent shipment requests.
    pub fn set_reply(&self, reply: StubReply) {
        self.write().reply = reply;
    }

    fn write(&self) -> RwLockWriteGuard<'_, InMemoryShippingState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the number of shipment requests received.
    pub fn shipment_count(&self) -> usize {
        self.read().calls.len()
    }

    /// Order IDs shipped, in call order.
    pub fn shipped_orders(&self) -> Vec<String> {
        self.read().calls.iter().map(|(_, id)| id.clone()).collect()
    }

    /// Trace contexts received, in call order.
    pub fn contexts(&self) -> Vec<SpanContext> {
        self.read().calls.iter().map(|(ctx, _)| ctx.clone()).collect()
    }
}

#[async_trait]
impl ShippingService for InMemoryShippingService {
    async fn create_shipment(
        &self,
        trace: &SpanContext,
        order_id: &str,
    ) -> Result<String, SagaError> {
        let reply = {
            let mut state = self.write();
            state.calls.push((trace.clone(), order_id.to_string()));
            state.reply.clone()
        };

        reply
            .resolve("memory://shipments/create", || "Shipped!".to_string())
            .map(Option::unwrap_or_default)
    }
}

#[cfg(test)]
mod tests {
    use telemetry::propagation;

    use super::*;

    #[tokio::test]
    async fn test_create_shipment_records_call() {
        let service = InMemoryShippingService::new();
        let trace = propagation::from_traceparent(
            "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01",
        )
        .unwrap();

        let ack = service.create_shipment(&trace, "order-1").await.unwrap();

        assert_eq!(ack, "Shipped!");
        assert_eq!(service.shipment_count(), 1);
        assert_eq!(service.shipped_orders(), vec!["order-1".to_string()]);
        assert_eq!(
            service
                .contexts()
                .iter()
                .map(SpanContext::span_id)
                .collect::<Vec<_>>(),
            vec![trace.span_id()]
        );
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let service = InMemoryShippingService::new();
        service.set_reply(StubReply::Unreachable);
        let trace = propagation::from_traceparent(
            "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01",
        )
        .unwrap();

        assert!(service.create_shipment(&trace, "order-1").await.is_err());
        assert_eq!(service.shipment_count(), 1);
    }
}
