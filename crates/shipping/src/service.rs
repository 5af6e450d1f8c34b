//! Shipment creation. A stub collaborator: it always succeeds.

use telemetry::{KeyValue, SpanContext, Status, Tracer};

pub const SHIPMENT_SPAN: &str = "shipment-creation";

/// Body returned for every created shipment.
pub const SHIPPED_ACK: &str = "Shipped!";

#[derive(Debug, Clone)]
pub struct Shipping {
    tracer: Tracer,
}

impl Shipping {
    pub fn new(tracer: Tracer) -> Self {
        Self { tracer }
    }

    /// Acknowledges a shipment for the order.
    pub fn create_shipment(&self, parent: Option<&SpanContext>, order_id: &str) -> String {
        tracing::info!(order_id, "creating shipment");

        let mut span = self.tracer.start_span(
            SHIPMENT_SPAN,
            parent,
            [KeyValue::new("order.id", order_id.to_string())],
        );
        span.add_event("Shipment dispatched");
        span.set_status(Status::Ok);
        span.end();

        metrics::counter!("shipments_created_total").increment(1);
        SHIPPED_ACK.to_string()
    }
}
