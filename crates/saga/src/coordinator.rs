//! Saga coordinator for the order-creation process.

use std::panic::AssertUnwindSafe;
use std::time::Instant;

use common::{CreateOrderRequest, OrderId, OrderOutcome, ReserveInventoryRequest};
use futures_util::FutureExt;
use telemetry::{KeyValue, SpanContext, SpanHandle, Status, TraceId, Tracer};

use crate::error::SagaError;
use crate::order_fulfillment::{
    ATTR_INVENTORY_AVAILABLE, ATTR_INVENTORY_QUANTITY, ATTR_INVENTORY_REMAINING,
    ATTR_ORDER_ID, ATTR_ORDER_QUANTITY, ATTR_PRODUCT_ID, ATTR_RESERVATION_SUCCESS,
    ATTR_SAGA_STATE, INVALID_INVENTORY_RESPONSE, ROOT_SPAN, order_location,
};
use crate::services::{InventoryService, ShippingService};
use crate::state::SagaState;
use crate::step::{SagaStep, StepResult};

/// What one saga run produced.
#[derive(Debug, Clone)]
pub struct SagaReport {
    pub outcome: OrderOutcome,
    /// Set only when the order was created.
    pub location: Option<String>,
    pub trace_id: TraceId,
    pub state: SagaState,
    /// The step that failed, when the saga ended `Failed`.
    pub failed_step: Option<SagaStep>,
}

enum Completion {
    AllStepsSucceeded,
    StepFailed { step: SagaStep, detail: String },
}

/// Orchestrates the order-creation saga.
///
/// Drives inventory check, inventory reservation and shipment creation in
/// order, each inside a child span of the saga's root span. The first failed
/// step ends the saga; completed steps are not compensated.
pub struct SagaCoordinator<I, S>
where
    I: InventoryService,
    S: ShippingService,
{
    tracer: Tracer,
    inventory: I,
    shipping: S,
}

impl<I, S> SagaCoordinator<I, S>
where
    I: InventoryService,
    S: ShippingService,
{
    /// Creates a new saga coordinator.
    pub fn new(tracer: Tracer, inventory: I, shipping: S) -> Self {
        Self {
            tracer,
            inventory,
            shipping,
        }
    }

    pub fn inventory(&self) -> &I {
        &self.inventory
    }

    pub fn shipping(&self) -> &S {
        &self.shipping
    }

    /// Runs one order-creation saga to completion.
    ///
    /// Never fails: step failures become a `FAILED` outcome and anything
    /// unexpected, panics included, becomes an `ERROR` outcome. The root span
    /// is ended before this returns.
    #[tracing::instrument(skip(self, request), fields(product_id = %request.product_id, amount = request.amount))]
    pub async fn create_order(&self, request: &CreateOrderRequest) -> SagaReport {
        metrics::counter!("saga_executions_total").increment(1);
        let saga_start = Instant::now();

        let order_id = OrderId::new();
        let mut root = self.tracer.start_span(
            ROOT_SPAN,
            None,
            [
                KeyValue::new(ATTR_ORDER_ID, order_id.to_string()),
                KeyValue::new(ATTR_PRODUCT_ID, request.product_id.clone()),
                KeyValue::new(ATTR_ORDER_QUANTITY, i64::from(request.amount)),
            ],
        );
        let trace_id = root.trace_id();
        tracing::info!(%order_id, %trace_id, "saga started");

        let run = AssertUnwindSafe(self.run_steps(&mut root, order_id, request))
            .catch_unwind()
            .await;

        let (outcome, state, failed_step) = match run {
            Ok(Ok(Completion::AllStepsSucceeded)) => {
                root.set_status(Status::Ok);
                (OrderOutcome::created(order_id), SagaState::Done, None)
            }
            Ok(Ok(Completion::StepFailed { step, detail })) => {
                root.set_status(Status::error(step.failure_summary()));
                metrics::counter!("saga_step_failures_total", "step" => step.as_str())
                    .increment(1);
                tracing::warn!(%order_id, step = %step, detail = %detail, "saga step failed");
                (
                    OrderOutcome::failed(order_id, step.failure_message(&detail)),
                    SagaState::Failed,
                    Some(step),
                )
            }
            Ok(Err(err)) => {
                root.record_exception(&err);
                (self.fault(&mut root, order_id, &err.to_string()), SagaState::Error, None)
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                root.record_exception_message("panic", &message);
                (self.fault(&mut root, order_id, &message), SagaState::Error, None)
            }
        };

        root.set_attribute(ATTR_SAGA_STATE, state.as_str());
        root.end();

        let duration = saga_start.elapsed().as_secs_f64();
        metrics::histogram!("saga_duration_seconds").record(duration);
        metrics::counter!("saga_outcomes_total", "status" => outcome.status.as_str())
            .increment(1);
        tracing::info!(%order_id, status = %outcome.status, duration, "saga finished");

        let location = outcome.is_created().then(|| order_location(&order_id));
        SagaReport {
            outcome,
            location,
            trace_id,
            state,
            failed_step,
        }
    }

    fn fault(&self, root: &mut SpanHandle, order_id: OrderId, message: &str) -> OrderOutcome {
        let message = format!("Unexpected error: {message}");
        tracing::error!(%order_id, error = %message, "saga faulted");
        root.set_status(Status::error(message.clone()));
        OrderOutcome::error(order_id, message)
    }

    async fn run_steps(
        &self,
        root: &mut SpanHandle,
        order_id: OrderId,
        request: &CreateOrderRequest,
    ) -> Result<Completion, SagaError> {
        let mut state = SagaState::Start;
        for step in SagaStep::ALL {
            if !state.can_transition_to(step.state()) {
                return Err(SagaError::Internal(format!(
                    "illegal saga transition from {state} to {}",
                    step.state()
                )));
            }
            state = step.state();
            tracing::debug!(%order_id, %state, "saga step started");
            root.add_event(step.start_event());

            let result = self.run_step(step, root.context(), order_id, request).await?;
            if !result.ok {
                return Ok(Completion::StepFailed {
                    step,
                    detail: result.detail,
                });
            }
        }
        Ok(Completion::AllStepsSucceeded)
    }

    /// Runs one step in its own child span.
    ///
    /// Downstream failures are recorded on the child span and normalized into
    /// a failed [`StepResult`]; any other error is recorded and propagated.
    async fn run_step(
        &self,
        step: SagaStep,
        parent: SpanContext,
        order_id: OrderId,
        request: &CreateOrderRequest,
    ) -> Result<StepResult, SagaError> {
        let mut attributes = vec![KeyValue::new(ATTR_ORDER_ID, order_id.to_string())];
        if step != SagaStep::CreateShipment {
            attributes.push(KeyValue::new(ATTR_PRODUCT_ID, request.product_id.clone()));
            attributes.push(KeyValue::new(ATTR_ORDER_QUANTITY, i64::from(request.amount)));
        }
        let mut span = self.tracer.start_span(step.span_name(), Some(&parent), attributes);

        let called = match step {
            SagaStep::CheckInventory => self.check_inventory(&mut span, request).await,
            SagaStep::ReserveInventory => {
                self.reserve_inventory(&mut span, order_id, request).await
            }
            SagaStep::CreateShipment => self.create_shipment(&mut span, order_id).await,
        };

        let result = match called {
            Ok(result) => result,
            Err(SagaError::Downstream(err)) => {
                span.record_exception(&err);
                let detail = step.downstream_detail(&err);
                span.set_status(Status::error(detail.clone()));
                StepResult::failure(detail)
            }
            Err(err) => {
                span.record_exception(&err);
                span.set_status(Status::error(err.to_string()));
                return Err(err);
            }
        };

        if result.ok {
            span.set_status(Status::Ok);
        }
        span.end();
        Ok(result)
    }

    async fn check_inventory(
        &self,
        span: &mut SpanHandle,
        request: &CreateOrderRequest,
    ) -> Result<StepResult, SagaError> {
        let reply = self
            .inventory
            .check_availability(&span.context(), &request.product_id)
            .await?;
        let Some(reply) = reply else {
            return Ok(invalid_inventory_response(span));
        };

        span.set_attribute(ATTR_INVENTORY_AVAILABLE, reply.available);
        span.set_attribute(ATTR_INVENTORY_QUANTITY, reply.quantity);
        Ok(StepResult::success(format!(
            "available={}, quantity={}",
            reply.available, reply.quantity
        )))
    }

    async fn reserve_inventory(
        &self,
        span: &mut SpanHandle,
        order_id: OrderId,
        request: &CreateOrderRequest,
    ) -> Result<StepResult, SagaError> {
        let body = ReserveInventoryRequest {
            order_id: order_id.to_string(),
            product_id: request.product_id.clone(),
            quantity: request.amount,
        };
        let reply = self.inventory.reserve(&span.context(), &body).await?;
        let Some(reply) = reply else {
            return Ok(invalid_inventory_response(span));
        };

        span.set_attribute(ATTR_RESERVATION_SUCCESS, reply.success);
        span.set_attribute(ATTR_INVENTORY_REMAINING, reply.remaining_quantity);
        Ok(StepResult::success(reply.message))
    }

    async fn create_shipment(
        &self,
        span: &mut SpanHandle,
        order_id: OrderId,
    ) -> Result<StepResult, SagaError> {
        let ack = self
            .shipping
            .create_shipment(&span.context(), &order_id.to_string())
            .await?;
        Ok(StepResult::success(ack))
    }
}

fn invalid_inventory_response(span: &mut SpanHandle) -> StepResult {
    span.set_status(Status::error(INVALID_INVENTORY_RESPONSE));
    StepResult::failure(INVALID_INVENTORY_RESPONSE)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
