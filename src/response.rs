//! Response envelope types
//!
//! Every gateway call resolves to an [`ApiResponse`]: success and failure
//! share one shape, failures carry a populated [`ApiErrorInfo`], and nothing
//! the transport does surfaces as a Rust error to the caller.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::RawResponse;
use crate::constants::{CODE_UNKNOWN_ERROR, STATUS_NO_RESPONSE};
use crate::error::ClientError;

/// Structured error carried in a failed envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorInfo {
    /// Human-readable description
    pub message: String,
    /// Machine-readable code for programmatic branching;
    /// `"UNKNOWN_ERROR"` when the server supplied none
    pub code: String,
    /// Whatever else the server sent alongside the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// A failure before envelope mapping; the value error middleware transforms
#[derive(Debug, Clone)]
pub struct Failure {
    /// HTTP status if a response was received, `None` for network failures
    pub status: Option<u16>,
    /// Response headers if a response was received
    pub headers: HashMap<String, String>,
    pub error: ApiErrorInfo,
}

impl Failure {
    /// Build from a non-2xx HTTP response, mining the body for a structured
    /// `{message, code, ...}` error shape
    pub fn from_response(response: &RawResponse) -> Self {
        let parsed: Option<Value> = serde_json::from_slice(&response.body).ok();

        let message = parsed
            .as_ref()
            .and_then(|v| v.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", response.status));

        let code = parsed
            .as_ref()
            .and_then(|v| v.get("code"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| CODE_UNKNOWN_ERROR.to_string());

        let details = parsed.or_else(|| {
            if response.body.is_empty() {
                None
            } else {
                Some(Value::String(
                    String::from_utf8_lossy(&response.body).into_owned(),
                ))
            }
        });

        Self {
            status: Some(response.status),
            headers: response.headers.clone(),
            error: ApiErrorInfo {
                message,
                code,
                details,
            },
        }
    }

    /// Build from a transport error where no response was received
    pub fn from_client_error(error: &ClientError) -> Self {
        Self {
            status: None,
            headers: HashMap::new(),
            error: ApiErrorInfo {
                message: error.message(),
                code: CODE_UNKNOWN_ERROR.to_string(),
                details: None,
            },
        }
    }
}

/// Normalized result of every gateway call
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T = Value> {
    /// Deserialized body on success, `None` on failure or empty body
    pub data: Option<T>,
    /// HTTP status; 500 when no response was received
    pub status: u16,
    /// Response headers; empty when no response was received
    pub headers: HashMap<String, String>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorInfo>,
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Map a successful raw response into the envelope.
    ///
    /// A body that is empty or does not deserialize to `T` yields
    /// `data: None` while the call still counts as a success.
    pub fn from_success(response: &RawResponse) -> Self {
        Self {
            data: serde_json::from_slice(&response.body).ok(),
            status: response.status,
            headers: response.headers.clone(),
            success: true,
            error: None,
        }
    }

    /// Map an exhausted failure into the envelope
    pub fn from_failure(failure: Failure) -> Self {
        Self {
            data: None,
            status: failure.status.unwrap_or(STATUS_NO_RESPONSE),
            headers: failure.headers,
            success: false,
            error: Some(failure.error),
        }
    }
}
