//! Inventory operations.
//!
//! There is no stock store: every product answers with the same fixed
//! numbers. What the operations do exercise is the span contract. Each call
//! opens one span under the caller's propagated context, annotates it with
//! the request and the computed result, records any failure on the span
//! before returning it, and always ends the span.

use std::time::Duration;

use common::{InventoryResponse, ReserveInventoryRequest, ReserveInventoryResponse};
use telemetry::{KeyValue, SpanContext, SpanHandle, Status, Tracer};

use crate::error::InventoryError;
use crate::sentinel::Sentinel;

/// Units reported as on hand for every product.
pub const AVAILABLE_QUANTITY: i64 = 100;

/// Units reported as left after any reservation.
pub const REMAINING_AFTER_RESERVATION: i64 = 95;

pub const LOOKUP_SPAN: &str = "inventory-lookup";
pub const RESERVATION_SPAN: &str = "inventory-reservation";

/// The inventory endpoint's business logic.
#[derive(Debug, Clone)]
pub struct Inventory {
    tracer: Tracer,
    simulated_delay: Duration,
}

impl Inventory {
    pub fn new(tracer: Tracer, simulated_delay: Duration) -> Self {
        Self {
            tracer,
            simulated_delay,
        }
    }

    /// Reports availability for a product.
    pub async fn check_availability(
        &self,
        parent: Option<&SpanContext>,
        product_id: &str,
    ) -> Result<InventoryResponse, InventoryError> {
        tracing::info!(product_id, "checking inventory");

        let mut span = self.tracer.start_span(
            LOOKUP_SPAN,
            parent,
            [KeyValue::new("product.id", product_id.to_string())],
        );

        let result = self.lookup(&mut span, product_id).await;
        if let Err(e) = &result {
            tracing::error!(product_id, error = %e, "error during inventory check");
            span.record_exception(e);
            span.set_status(Status::error(format!("Error checking inventory: {e}")));
        }
        span.end();

        record_request("check", result.is_ok());
        result
    }

    async fn lookup(
        &self,
        span: &mut SpanHandle,
        product_id: &str,
    ) -> Result<InventoryResponse, InventoryError> {
        span.add_event("Starting inventory database lookup");
        self.apply_sentinel(product_id, || {
            InventoryError::SimulatedLookup(product_id.to_string())
        })
        .await?;

        let response = InventoryResponse {
            available: true,
            quantity: AVAILABLE_QUANTITY,
        };
        tracing::info!(product_id, quantity = response.quantity, "found units of product");

        span.set_attribute("inventory.available", response.available);
        span.set_attribute("inventory.quantity", response.quantity);
        span.add_event("Product available");
        Ok(response)
    }

    /// Reserves units of a product for an order.
    ///
    /// The requested quantity is recorded but not subtracted from anything.
    pub async fn reserve(
        &self,
        parent: Option<&SpanContext>,
        request: &ReserveInventoryRequest,
    ) -> Result<ReserveInventoryResponse, InventoryError> {
        tracing::info!(
            order_id = %request.order_id,
            product_id = %request.product_id,
            quantity = request.quantity,
            "reserving inventory"
        );

        let mut span = self.tracer.start_span(
            RESERVATION_SPAN,
            parent,
            [
                KeyValue::new("order.id", request.order_id.clone()),
                KeyValue::new("product.id", request.product_id.clone()),
                KeyValue::new("order.quantity", i64::from(request.quantity)),
            ],
        );

        let result = self.reservation(&mut span, request).await;
        if let Err(e) = &result {
            tracing::error!(order_id = %request.order_id, error = %e, "error during inventory reservation");
            span.record_exception(e);
            span.set_status(Status::error(format!("Error reserving inventory: {e}")));
        }
        span.end();

        record_request("reserve", result.is_ok());
        result
    }

    async fn reservation(
        &self,
        span: &mut SpanHandle,
        request: &ReserveInventoryRequest,
    ) -> Result<ReserveInventoryResponse, InventoryError> {
        self.apply_sentinel(&request.product_id, || {
            InventoryError::SimulatedReservation(request.product_id.clone())
        })
        .await?;

        let response = ReserveInventoryResponse {
            success: true,
            message: "Inventory reserved successfully".to_string(),
            remaining_quantity: REMAINING_AFTER_RESERVATION,
        };
        tracing::info!(
            product_id = %request.product_id,
            quantity = request.quantity,
            remaining = response.remaining_quantity,
            "reserved units of product"
        );

        span.set_attribute("inventory.remaining", response.remaining_quantity);
        span.add_event("Inventory successfully reserved");
        Ok(response)
    }

    async fn apply_sentinel(
        &self,
        product_id: &str,
        failure: impl FnOnce() -> InventoryError,
    ) -> Result<(), InventoryError> {
        match Sentinel::classify(product_id) {
            Sentinel::Error => {
                tracing::error!(product_id, "detected error-triggering product ID");
                Err(failure())
            }
            Sentinel::Delay => {
                tracing::info!(product_id, delay_ms = self.simulated_delay.as_millis() as u64, "detected delay-triggering product ID");
                tokio::time::sleep(self.simulated_delay).await;
                tracing::info!(product_id, "delay complete");
                Ok(())
            }
            Sentinel::None => Ok(()),
        }
    }
}

fn record_request(operation: &'static str, ok: bool) {
    let result = if ok { "ok" } else { "error" };
    metrics::counter!(
        "inventory_requests_total",
        "operation" => operation,
        "result" => result
    )
    .increment(1);
}
