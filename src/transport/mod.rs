/// Transport module
///
/// The capability the token client issues its requests through, plus the
/// reqwest-backed implementation used outside of tests.

use std::future::Future;

use reqwest::StatusCode;
use serde_json::{Map, Value};
use thiserror::Error;

pub mod http;

pub use self::http::HttpTransport;

/// Caller-built request payload. Field names and values are owned by the
/// upstream endpoint contract; the client never looks inside.
pub type QueryPayload = Map<String, Value>;

/// Result a transport future resolves to.
pub type TransportResult = Result<Value, TransportError>;

#[derive(Debug, Error)]
pub enum TransportError {
    /// Request could not be sent or the connection failed
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("unexpected status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Payload could not be put on the wire
    #[error("payload encoding failed: {0}")]
    Encode(String),

    /// Configured credential could not be resolved
    #[error("auth resolution failed: {0}")]
    Auth(String),
}

impl TransportError {
    /// Only failures where the request never reached the console are
    /// retried; anything else may already have had an effect upstream.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Request(err) if err.is_connect())
    }

    /// Short label for metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            TransportError::Request(err) if err.is_timeout() => "timeout",
            TransportError::Request(err) if err.is_connect() => "connect",
            TransportError::Request(_) => "request",
            TransportError::Status { .. } => "status",
            TransportError::Encode(_) => "encode",
            TransportError::Auth(_) => "auth",
        }
    }
}

/// HTTP verbs a transport must support.
///
/// Every method returns the pending result of exactly one outbound request.
pub trait Transport {
    fn get(
        &self,
        path: &str,
        payload: &QueryPayload,
    ) -> impl Future<Output = TransportResult> + Send;

    fn post(
        &self,
        path: &str,
        payload: &QueryPayload,
    ) -> impl Future<Output = TransportResult> + Send;

    fn delete(
        &self,
        path: &str,
        payload: &QueryPayload,
    ) -> impl Future<Output = TransportResult> + Send;
}
