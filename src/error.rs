// Error types module

use std::time::Duration;

use thiserror::Error;

/// Transport-level error reported by an [`HttpClient`](crate::client::HttpClient)
/// implementation.
///
/// Only failures where no usable HTTP response was received are errors at this
/// seam; a response with a non-2xx status is still `Ok` and is classified by
/// the gateway. This keeps the retry predicate's two failure classes (network
/// vs HTTP) cleanly separated.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The request did not complete within the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection-level failure (DNS, connect, TLS, reset mid-body)
    #[error("transport error: {0}")]
    Transport(String),

    /// The request could not be constructed (malformed URL, bad header value)
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Human-readable message for the error envelope
    pub fn message(&self) -> String {
        self.to_string()
    }
}
