//! Integration tests for the orders API with in-memory downstream services.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use metrics_exporter_prometheus::PrometheusHandle;
use orders::AppState;
use saga::order_fulfillment::ROOT_SPAN;
use saga::{InMemoryInventoryService, InMemoryShippingService, StubReply};
use telemetry::{FinishedSpan, SpanRecorder};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            metrics_exporter_prometheus::PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct Harness {
    app: axum::Router,
    inventory: InMemoryInventoryService,
    shipping: InMemoryShippingService,
    spans: SpanRecorder,
}

fn setup() -> Harness {
    let spans = SpanRecorder::new();
    let inventory = InMemoryInventoryService::new();
    let shipping = InMemoryShippingService::new();
    let state = AppState::new(
        spans.tracer(orders::SERVICE_NAME),
        inventory.clone(),
        shipping.clone(),
    );
    Harness {
        app: orders::create_app(state, get_metrics_handle()),
        inventory,
        shipping,
        spans,
    }
}

fn create_order(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/orders/create")
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_create_order_returns_201_with_location() {
    let h = setup();

    let response = h
        .app
        .oneshot(create_order(
            serde_json::json!({"productId": "SKU-001", "amount": 2}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let json = body_json(response).await;
    let order_id = json["orderId"].as_str().unwrap();
    assert!(!order_id.is_empty());
    assert_eq!(location, format!("/orders/{order_id}"));
    assert_eq!(json["status"], "CREATED");
    assert_eq!(json["message"], "Order successfully created");

    assert_eq!(h.shipping.shipped_orders(), vec![order_id.to_string()]);
    assert_eq!(h.spans.started_count(), h.spans.ended_count());
}

#[tokio::test]
async fn test_failed_order_returns_200_without_location() {
    let h = setup();
    h.inventory
        .set_check_reply(StubReply::ServerError("boom".to_string()));

    let response = h
        .app
        .oneshot(create_order(
            serde_json::json!({"productId": "SKU-001", "amount": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::LOCATION).is_none());
    let json = body_json(response).await;
    assert_eq!(json["status"], "FAILED");
    assert!(
        json["message"]
            .as_str()
            .unwrap()
            .contains("Inventory check failed")
    );
    assert_eq!(h.inventory.reserve_count(), 0);
}

#[tokio::test]
async fn test_unexpected_error_still_returns_200() {
    let h = setup();
    h.shipping.set_reply(StubReply::Panic("label printer on fire".to_string()));

    let response = h
        .app
        .oneshot(create_order(
            serde_json::json!({"productId": "SKU-001", "amount": 1}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ERROR");
    assert_eq!(json["message"], "Unexpected error: label printer on fire");
    assert!(h.spans.span_named(ROOT_SPAN).unwrap().is_error());
    assert_eq!(h.spans.started_count(), h.spans.ended_count());
}

#[tokio::test]
async fn test_zero_amount_is_rejected() {
    let h = setup();

    let response = h
        .app
        .oneshot(create_order(
            serde_json::json!({"productId": "SKU-001", "amount": 0}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("amount"));
    assert_eq!(h.inventory.check_count(), 0);
    assert_eq!(h.spans.started_count(), 0);
}

#[tokio::test]
async fn test_negative_or_fractional_amount_is_rejected() {
    for amount in [serde_json::json!(-1), serde_json::json!(1.5)] {
        let h = setup();

        let response = h
            .app
            .oneshot(create_order(
                serde_json::json!({"productId": "SKU-001", "amount": amount}),
            ))
            .await
            .unwrap();

        assert!(response.status().is_client_error(), "{amount}");
        assert_eq!(h.inventory.check_count(), 0);
    }
}

#[tokio::test]
async fn test_get_order_returns_null() {
    let h = setup();

    let response = h
        .app
        .oneshot(
            Request::builder()
                .uri("/orders/5f0c6a8e-1d5b-4c3e-9a0b-2b8f7e6d4c1a")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, serde_json::Value::Null);
}

#[tokio::test]
async fn test_health_and_metrics() {
    let h = setup();

    let response = h
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "ok");

    let response = h
        .app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
