//! HTTP transport seam
//!
//! The gateway talks to the network through the [`HttpClient`] trait so the
//! transport can be swapped without touching the dispatch pipeline:
//! - `ReqwestClient`: production implementation backed by reqwest
//! - test transports: in-process fakes that script responses
//!
//! A non-2xx response is NOT an error at this seam. `execute` returns
//! `Err(ClientError)` only when no usable HTTP response was received.

mod reqwest_client;

pub use reqwest_client::ReqwestClient;

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::error::ClientError;

/// HTTP method supported by the gateway surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// Lower-cased name, used in cache key derivation
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "get",
            Method::Put => "put",
            Method::Post => "post",
            Method::Delete => "delete",
        }
    }

    /// True for methods whose responses are cached by default
    pub fn is_get(&self) -> bool {
        matches!(self, Method::Get)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully-resolved request descriptor handed to the transport.
///
/// Everything is resolved by the gateway before dispatch: the URL is absolute,
/// headers are the merge of config defaults and per-call values, and the
/// timeout is the gateway's configured request timeout. Request middleware
/// receives and returns this descriptor; the final value is what is sent.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute URL (base URL joined with the endpoint path)
    pub url: String,
    /// Query parameters; BTreeMap so serialization order is canonical
    pub params: BTreeMap<String, String>,
    /// Merged headers; caller values already won over config defaults
    pub headers: HashMap<String, String>,
    /// JSON body for POST/PUT
    pub body: Option<Value>,
    pub timeout: Duration,
}

/// Raw HTTP response snapshot.
///
/// Also the shape stored in the response cache, so cached and fresh responses
/// flow through the same middleware without conversion.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl RawResponse {
    /// True for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport abstraction consumed by the gateway
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Execute the request and return the response, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] only when no HTTP response was received
    /// (connect failure, timeout, malformed request).
    async fn execute(&self, request: &HttpRequest) -> Result<RawResponse, ClientError>;
}
