//! Shipping service entry point.

use common::ServerConfig;
use shipping::{AppState, DEFAULT_PORT, SERVICE_NAME};
use telemetry::Tracer;

#[tokio::main]
async fn main() {
    // 1. Load configuration and initialize logging
    let config = ServerConfig::from_env(DEFAULT_PORT);
    telemetry::init_logging(&config);

    // 2. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Build the application
    let provider = telemetry::init_tracer_provider(SERVICE_NAME, &config.otlp_endpoint)
        .expect("failed to initialize tracing");
    let tracer = Tracer::new(&provider, SERVICE_NAME);
    let app = shipping::create_app(AppState::new(tracer), metrics_handle);

    // 4. Start server
    let addr = config.addr();
    tracing::info!(%addr, "starting shipping service");

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
