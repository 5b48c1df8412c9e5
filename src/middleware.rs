//! Middleware chains
//!
//! Pluggable transform functions applied in order at three points of the
//! pipeline: request descriptors before dispatch, successful responses
//! (network or cache) before envelope mapping, and failures after retries are
//! exhausted. Each function receives and returns the value; the final value
//! is what flows on.
//!
//! Middleware is trusted: a function that panics is not caught by the
//! gateway, so callers can install fail-fast validation in development.

use std::fmt;
use std::sync::Arc;

use crate::client::{HttpRequest, RawResponse};
use crate::response::Failure;

pub type RequestMiddleware = Arc<dyn Fn(HttpRequest) -> HttpRequest + Send + Sync>;
pub type ResponseMiddleware = Arc<dyn Fn(RawResponse) -> RawResponse + Send + Sync>;
pub type ErrorMiddleware = Arc<dyn Fn(Failure) -> Failure + Send + Sync>;

/// Ordered request/response/error transform chains
#[derive(Clone, Default)]
pub struct MiddlewareChains {
    request: Vec<RequestMiddleware>,
    response: Vec<ResponseMiddleware>,
    error: Vec<ErrorMiddleware>,
}

impl MiddlewareChains {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_request<F>(mut self, f: F) -> Self
    where
        F: Fn(HttpRequest) -> HttpRequest + Send + Sync + 'static,
    {
        self.request.push(Arc::new(f));
        self
    }

    pub fn on_response<F>(mut self, f: F) -> Self
    where
        F: Fn(RawResponse) -> RawResponse + Send + Sync + 'static,
    {
        self.response.push(Arc::new(f));
        self
    }

    pub fn on_error<F>(mut self, f: F) -> Self
    where
        F: Fn(Failure) -> Failure + Send + Sync + 'static,
    {
        self.error.push(Arc::new(f));
        self
    }

    pub fn apply_request(&self, request: HttpRequest) -> HttpRequest {
        self.request.iter().fold(request, |req, f| f(req))
    }

    pub fn apply_response(&self, response: RawResponse) -> RawResponse {
        self.response.iter().fold(response, |res, f| f(res))
    }

    pub fn apply_error(&self, failure: Failure) -> Failure {
        self.error.iter().fold(failure, |err, f| f(err))
    }

    pub fn is_empty(&self) -> bool {
        self.request.is_empty() && self.response.is_empty() && self.error.is_empty()
    }
}

impl fmt::Debug for MiddlewareChains {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareChains")
            .field("request", &self.request.len())
            .field("response", &self.response.len())
            .field("error", &self.error.len())
            .finish()
    }
}
