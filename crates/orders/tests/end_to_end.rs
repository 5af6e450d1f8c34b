//! End-to-end tests: the orders API talking to real inventory and shipping
//! services over HTTP on ephemeral ports.
//!
//! All three services export into one shared span recorder, standing in for
//! a trace collector, so the assembled cross-process tree can be checked.

use std::sync::OnceLock;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use inventory::service::{LOOKUP_SPAN, RESERVATION_SPAN};
use metrics_exporter_prometheus::PrometheusHandle;
use orders::Config;
use saga::order_fulfillment::{
    ROOT_SPAN, SPAN_CHECK_INVENTORY, SPAN_CREATE_SHIPMENT, SPAN_RESERVE_INVENTORY,
};
use shipping::service::SHIPMENT_SPAN;
use telemetry::{FinishedSpan, SpanRecorder};
use tower::ServiceExt;

const SIMULATED_DELAY: Duration = Duration::from_millis(50);

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

async fn serve(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Starts inventory and shipping, then returns the orders router wired to
/// them.
async fn setup() -> (axum::Router, SpanRecorder) {
    let spans = SpanRecorder::new();
    let tracer = |service: &str| spans.tracer(service);

    let inventory_config = inventory::Config {
        simulated_delay: SIMULATED_DELAY,
        ..inventory::Config::default()
    };
    let inventory_url = serve(inventory::create_app(
        inventory::AppState::new(tracer(inventory::SERVICE_NAME), &inventory_config),
        get_metrics_handle(),
    ))
    .await;
    let shipping_url = serve(shipping::create_app(
        shipping::AppState::new(tracer(shipping::SERVICE_NAME)),
        get_metrics_handle(),
    ))
    .await;

    let config = Config::from_lookup(|key| match key {
        "INVENTORY_SERVICE_URL" => Some(inventory_url.clone()),
        "SHIPPING_SERVICE_URL" => Some(shipping_url.clone()),
        "DOWNSTREAM_TIMEOUT_MS" => Some("5000".to_string()),
        _ => None,
    })
    .unwrap();
    let state = orders::create_http_state(tracer(orders::SERVICE_NAME), &config).unwrap();
    (orders::create_app(state, get_metrics_handle()), spans)
}

fn create_order(product_id: &str, amount: u32) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/orders/create")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::json!({"productId": product_id, "amount": amount}).to_string(),
        ))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_trace_spans_all_three_services() {
    let (app, spans) = setup().await;

    let response = app.oneshot(create_order("SKU-001", 3)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "CREATED");

    let root = spans.span_named(ROOT_SPAN).unwrap();
    let tree = spans.spans_for_trace(root.trace_id());
    assert_eq!(tree.len(), 7);

    // Each remote span hangs off the step span that called it.
    for (step, remote, service) in [
        (SPAN_CHECK_INVENTORY, LOOKUP_SPAN, inventory::SERVICE_NAME),
        (SPAN_RESERVE_INVENTORY, RESERVATION_SPAN, inventory::SERVICE_NAME),
        (SPAN_CREATE_SHIPMENT, SHIPMENT_SPAN, shipping::SERVICE_NAME),
    ] {
        let step_span = spans.span_named(step).unwrap();
        let remote_span = spans.span_named(remote).unwrap();
        assert_eq!(step_span.service(), orders::SERVICE_NAME);
        assert_eq!(step_span.parent(), Some(root.span_id()));
        assert_eq!(remote_span.service(), service);
        assert_eq!(remote_span.trace_id(), root.trace_id(), "{remote}");
        assert_eq!(remote_span.parent(), Some(step_span.span_id()), "{remote}");
    }

    assert_eq!(spans.started_count(), spans.ended_count());
}

#[tokio::test]
async fn test_error_sentinel_fails_inventory_check() {
    let (app, spans) = setup().await;

    let response = app
        .oneshot(create_order("SKU-with-error", 1))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "FAILED");
    let message = json["message"].as_str().unwrap();
    assert!(message.contains("Inventory check failed"), "{message}");
    assert!(message.contains("Server error checking inventory"), "{message}");

    assert!(spans.span_named(LOOKUP_SPAN).unwrap().is_error());
    assert!(spans.span_named(SPAN_CHECK_INVENTORY).unwrap().is_error());
    assert!(spans.span_named(RESERVATION_SPAN).is_none());
    assert!(spans.span_named(SHIPMENT_SPAN).is_none());
    assert_eq!(spans.started_count(), spans.ended_count());
}

#[tokio::test]
async fn test_delay_sentinel_still_creates_order() {
    let (app, spans) = setup().await;

    let started = Instant::now();
    let response = app
        .oneshot(create_order("SKU-with-delay", 1))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["status"], "CREATED");
    assert!(started.elapsed() >= SIMULATED_DELAY);

    let lookup = spans.span_named(LOOKUP_SPAN).unwrap();
    assert!(lookup.duration() >= SIMULATED_DELAY);
}
