//! HTTP clients for the inventory and shipping services.

use std::time::Duration;

use async_trait::async_trait;
use common::{
    CheckInventoryRequest, CreateShipmentRequest, InventoryResponse, ReserveInventoryRequest,
    ReserveInventoryResponse,
};
use http::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use telemetry::{SpanContext, propagation};

use super::{InventoryService, ShippingService};
use crate::error::{DownstreamError, SagaError};

/// Builds the shared HTTP client. `None` leaves requests unbounded.
pub fn build_http_client(timeout: Option<Duration>) -> reqwest::Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build()
}

fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

fn trace_headers(trace: &SpanContext) -> HeaderMap {
    let mut headers = HeaderMap::new();
    propagation::inject(trace, &mut headers);
    headers
}

/// POSTs `body` as JSON with the trace context attached and returns the raw
/// response text once the status is known to be 2xx.
async fn post_json<B: Serialize + ?Sized>(
    client: &reqwest::Client,
    url: &str,
    trace: &SpanContext,
    body: &B,
) -> Result<String, SagaError> {
    let response = client
        .post(url)
        .headers(trace_headers(trace))
        .json(body)
        .send()
        .await
        .map_err(|e| {
            let url = url.to_string();
            let message = e.to_string();
            if e.is_builder() {
                DownstreamError::InvalidUrl { url, message }
            } else {
                DownstreamError::Transport { url, message }
            }
        })?;

    let status = response.status();
    let text = response.text().await.map_err(|e| DownstreamError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    })?;

    if status.is_server_error() {
        return Err(DownstreamError::ServerStatus { status, body: text }.into());
    }
    if status.is_client_error() {
        return Err(DownstreamError::ClientStatus { status, body: text }.into());
    }

    tracing::debug!(url, %status, "downstream call succeeded");
    Ok(text)
}

/// Decodes an optional JSON body; an empty body is `None`.
fn decode_body<T: DeserializeOwned>(url: &str, text: &str) -> Result<Option<T>, SagaError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str::<Option<T>>(text).map_err(|e| {
        SagaError::from(DownstreamError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    })
}

/// Inventory service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpInventoryClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpInventoryClient {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

#[async_trait]
impl InventoryService for HttpInventoryClient {
    async fn check_availability(
        &self,
        trace: &SpanContext,
        product_id: &str,
    ) -> Result<Option<InventoryResponse>, SagaError> {
        let url = endpoint(&self.base_url, "/inventory/check");
        let body = CheckInventoryRequest {
            product_id: product_id.to_string(),
        };
        let text = post_json(&self.client, &url, trace, &body).await?;
        decode_body(&url, &text)
    }

    async fn reserve(
        &self,
        trace: &SpanContext,
        request: &ReserveInventoryRequest,
    ) -> Result<Option<ReserveInventoryResponse>, SagaError> {
        let url = endpoint(&self.base_url, "/inventory/reserve");
        let text = post_json(&self.client, &url, trace, request).await?;
        decode_body(&url, &text)
    }
}

/// Shipping service reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpShippingClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpShippingClient {
    pub fn new(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

#[async_trait]
impl ShippingService for HttpShippingClient {
    async fn create_shipment(
        &self,
        trace: &SpanContext,
        order_id: &str,
    ) -> Result<String, SagaError> {
        let url = endpoint(&self.base_url, "/shipments/create");
        let body = CreateShipmentRequest {
            order_id: order_id.to_string(),
        };
        post_json(&self.client, &url, trace, &body).await
    }
}
