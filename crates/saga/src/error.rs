//! Saga error types.

use http::StatusCode;
use thiserror::Error;

/// A downstream call that was made but did not produce a usable answer.
///
/// These are expected failures: the saga turns them into a failed step
/// rather than propagating them.
#[derive(Debug, Clone, Error)]
pub enum DownstreamError {
    /// The request never got a response (connection refused, reset, timeout).
    #[error("I/O error on POST request for \"{url}\": {message}")]
    Transport { url: String, message: String },

    /// The service answered with a 5xx status.
    #[error("{status}: {body}")]
    ServerStatus { status: StatusCode, body: String },

    /// The service answered with a 4xx status.
    #[error("{status}: {body}")]
    ClientStatus { status: StatusCode, body: String },

    /// The request could not be built from the configured URL.
    #[error("invalid request URL \"{url}\": {message}")]
    InvalidUrl { url: String, message: String },

    /// The service answered 2xx with a body that could not be decoded.
    #[error("could not decode response from \"{url}\": {message}")]
    Decode { url: String, message: String },
}

impl DownstreamError {
    pub fn is_server_error(&self) -> bool {
        matches!(self, DownstreamError::ServerStatus { .. })
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, DownstreamError::ClientStatus { .. })
    }
}

/// Errors that can occur while running a saga.
#[derive(Debug, Error)]
pub enum SagaError {
    /// A downstream call failed; handled as a step failure.
    #[error(transparent)]
    Downstream(#[from] DownstreamError),

    /// Any other fault inside the orchestration.
    #[error("{0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_status_message_includes_code_and_body() {
        let err = DownstreamError::ServerStatus {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: "{\"error\":\"boom\"}".to_string(),
        };
        assert_eq!(err.to_string(), "500 Internal Server Error: {\"error\":\"boom\"}");
        assert!(err.is_server_error());
        assert!(!err.is_client_error());
    }

    #[test]
    fn downstream_converts_into_saga_error_transparently() {
        let err: SagaError = DownstreamError::Transport {
            url: "http://inventory/inventory/check".to_string(),
            message: "connection refused".to_string(),
        }
        .into();
        assert!(matches!(err, SagaError::Downstream(_)));
        assert_eq!(
            err.to_string(),
            "I/O error on POST request for \"http://inventory/inventory/check\": connection refused"
        );
    }

    #[test]
    fn invalid_url_is_a_downstream_failure() {
        let err: SagaError = DownstreamError::InvalidUrl {
            url: "http://bad host:1/inventory/check".to_string(),
            message: "builder error".to_string(),
        }
        .into();
        assert!(matches!(err, SagaError::Downstream(_)));
        assert_eq!(
            err.to_string(),
            "invalid request URL \"http://bad host:1/inventory/check\": builder error"
        );
    }
}
