//! Orders service entry point.

use orders::{Config, SERVICE_NAME};
use telemetry::Tracer;

#[tokio::main]
async fn main() {
    // 1. Load configuration and initialize logging
    let config = Config::from_env().expect("invalid configuration");
    telemetry::init_logging(&config.server);

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Build the application
    let provider = telemetry::init_tracer_provider(SERVICE_NAME, &config.server.otlp_endpoint)
        .expect("failed to initialize tracing");
    let tracer = Tracer::new(&provider, SERVICE_NAME);
    let state = orders::create_http_state(tracer, &config).expect("failed to build HTTP client");
    let app = orders::create_app(state, metrics_handle);

    // 4. Start server
    let addr = config.server.addr();
    tracing::info!(
        %addr,
        inventory_url = %config.inventory_url,
        shipping_url = %config.shipping_url,
        downstream_timeout_ms = config.downstream_timeout.map(|t| t.as_millis() as u64),
        "starting orders service"
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(common::shutdown_signal())
        .await
        .expect("server error");

    telemetry::shutdown_tracer_provider(&provider);
    tracing::info!("server shut down gracefully");
}
