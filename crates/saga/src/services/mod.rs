//! Downstream service traits, their HTTP clients, and in-memory doubles.

pub mod client;
pub mod inventory;
pub mod shipping;

use http::StatusCode;

use crate::error::{DownstreamError, SagaError};

pub use client::{HttpInventoryClient, HttpShippingClient, build_http_client};
pub use inventory::{InMemoryInventoryService, InventoryService};
pub use shipping::{InMemoryShippingService, ShippingService};

/// Scripted reply for an in-memory double.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StubReply {
    /// Answer normally.
    #[default]
    Succeed,
    /// Answer with a 500 status and the given body.
    ServerError(String),
    /// Answer with a 4xx status.
    ClientError(StatusCode),
    /// Fail before any response arrives.
    Unreachable,
    /// Answer 2xx with an empty body.
    EmptyBody,
    /// Fail with a non-downstream saga error.
    Fault(String),
    /// Panic inside the call.
    Panic(String),
}

impl StubReply {
    /// Resolves the reply, yielding `Some(value())` when it succeeds.
    pub(crate) fn resolve<T>(
        &self,
        url: &str,
        value: impl FnOnce() -> T,
    ) -> Result<Option<T>, SagaError> {
        match self {
            StubReply::Succeed => Ok(Some(value())),
            StubReply::ServerError(body) => Err(DownstreamError::ServerStatus {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                body: body.clone(),
            }
            .into()),
            StubReply::ClientError(status) => Err(DownstreamError::ClientStatus {
                status: *status,
                body: String::new(),
            }
            .into()),
            StubReply::Unreachable => Err(DownstreamError::Transport {
                url: url.to_string(),
                message: "Connection refused".to_string(),
            }
            .into()),
            StubReply::EmptyBody => Ok(None),
            StubReply::Fault(message) => Err(SagaError::Internal(message.clone())),
            StubReply::Panic(message) => panic!("{message}"),
        }
    }
}
