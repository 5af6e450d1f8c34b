//! HTTP client tests against local mock services.

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use common::{CreateOrderRequest, OrderStatus, ReserveInventoryRequest};
use saga::services::build_http_client;
use saga::{
    DownstreamError, HttpInventoryClient, HttpShippingClient, InventoryService, SagaCoordinator,
    SagaError, SagaState, SagaStep, ShippingService,
};
use telemetry::propagation::{self, TRACEPARENT};
use telemetry::{FinishedSpan, SpanContext, SpanRecorder};

const CALLER_TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn trace() -> SpanContext {
    propagation::from_traceparent(CALLER_TRACEPARENT).unwrap()
}

fn client() -> reqwest::Client {
    build_http_client(None).unwrap()
}

#[tokio::test]
async fn test_check_sends_traceparent_and_decodes_body() {
    let seen = Arc::new(Mutex::new(None::<String>));
    let recorder = seen.clone();
    let app = Router::new().route(
        "/inventory/check",
        post(move |headers: HeaderMap, body: String| {
            let recorder = recorder.clone();
            async move {
                assert!(body.contains("\"productId\":\"SKU-001\""));
                *recorder.lock().unwrap() = headers
                    .get(TRACEPARENT)
                    .and_then(|v| v.to_str().ok())
                    .map(str::to_string);
                r#"{"available":true,"quantity":100}"#
            }
        }),
    );
    let base = spawn(app).await;
    let inventory = HttpInventoryClient::new(format!("{base}/"), client());
    let ctx = trace();

    let reply = inventory
        .check_availability(&ctx, "SKU-001")
        .await
        .unwrap()
        .unwrap();

    assert!(reply.available);
    assert_eq!(reply.quantity, 100);
    assert_eq!(
        seen.lock().unwrap().as_deref(),
        Some(CALLER_TRACEPARENT)
    );
}

#[tokio::test]
async fn test_server_error_maps_to_server_status() {
    let app = Router::new().route(
        "/inventory/check",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                r#"{"error":"Intentional inventory error for product: SKU-with-error"}"#,
            )
        }),
    );
    let base = spawn(app).await;
    let inventory = HttpInventoryClient::new(base, client());

    let err = inventory
        .check_availability(&trace(), "SKU-with-error")
        .await
        .unwrap_err();

    match err {
        SagaError::Downstream(DownstreamError::ServerStatus { status, body }) => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert!(body.contains("Intentional inventory error"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_reserve_body_is_none() {
    let app = Router::new().route("/inventory/reserve", post(|| async { StatusCode::OK }));
    let base = spawn(app).await;
    let inventory = HttpInventoryClient::new(base, client());
    let request = ReserveInventoryRequest {
        order_id: "o-1".to_string(),
        product_id: "SKU-001".to_string(),
        quantity: 1,
    };

    let reply = inventory.reserve(&trace(), &request).await.unwrap();

    assert!(reply.is_none());
}

#[tokio::test]
async fn test_shipping_returns_plain_text_and_maps_client_errors() {
    let app = Router::new().route(
        "/shipments/create",
        post(|body: String| async move {
            if body.contains("bad-order") {
                (StatusCode::UNPROCESSABLE_ENTITY, "rejected".to_string())
            } else {
                (StatusCode::OK, "Shipped!".to_string())
            }
        }),
    );
    let base = spawn(app).await;
    let shipping = HttpShippingClient::new(base, client());

    let ack = shipping.create_shipment(&trace(), "order-1").await.unwrap();
    assert_eq!(ack, "Shipped!");

    let err = shipping
        .create_shipment(&trace(), "bad-order")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SagaError::Downstream(DownstreamError::ClientStatus { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let inventory = HttpInventoryClient::new(format!("http://{addr}"), client());
    let err = inventory
        .check_availability(&trace(), "SKU-001")
        .await
        .unwrap_err();

    match err {
        SagaError::Downstream(err @ DownstreamError::Transport { .. }) => {
            assert!(err.to_string().starts_with("I/O error on POST request for"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_unparseable_base_url_fails_the_step() {
    let spans = SpanRecorder::new();
    let coordinator = SagaCoordinator::new(
        spans.tracer("order-service"),
        HttpInventoryClient::new("http://bad host:1", client()),
        HttpShippingClient::new("http://bad host:2", client()),
    );

    let report = coordinator
        .create_order(&CreateOrderRequest {
            product_id: "SKU-001".to_string(),
            amount: 1,
        })
        .await;

    assert_eq!(report.outcome.status, OrderStatus::Failed);
    assert!(
        report
            .outcome
            .message
            .starts_with("Inventory check failed: Error checking inventory: invalid request URL"),
        "{}",
        report.outcome.message
    );
    assert_eq!(report.state, SagaState::Failed);
    assert_eq!(report.failed_step, Some(SagaStep::CheckInventory));

    let check = spans.span_named(saga::order_fulfillment::SPAN_CHECK_INVENTORY).unwrap();
    assert!(check.is_error());
    assert!(check.has_event("exception"));
    assert_eq!(spans.started_count(), spans.ended_count());
}
