//! Production transport backed by reqwest
//!
//! One `reqwest::Client` is built at construction and reused for every
//! request so connection pooling works across the gateway's lifetime. The
//! request timeout is applied per request from the descriptor, which lets
//! `update_config` change it without rebuilding the client.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use super::{HttpClient, HttpRequest, Method, RawResponse};
use crate::error::ClientError;

/// reqwest-backed [`HttpClient`] implementation
#[derive(Debug, Clone, Default)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }

    fn build_headers(headers: &HashMap<String, String>) -> Result<HeaderMap, ClientError> {
        let mut map = HeaderMap::with_capacity(headers.len());
        for (name, value) in headers {
            let name = HeaderName::from_str(name)
                .map_err(|e| ClientError::InvalidRequest(format!("bad header name {name:?}: {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ClientError::InvalidRequest(format!("bad header value: {e}")))?;
            map.insert(name, value);
        }
        Ok(map)
    }

    fn to_reqwest_method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    fn map_error(err: reqwest::Error, request: &HttpRequest) -> ClientError {
        if err.is_timeout() {
            ClientError::Timeout(request.timeout)
        } else if err.is_builder() {
            ClientError::InvalidRequest(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn execute(&self, request: &HttpRequest) -> Result<RawResponse, ClientError> {
        let headers = Self::build_headers(&request.headers)?;

        let mut builder = self
            .inner
            .request(Self::to_reqwest_method(request.method), &request.url)
            .headers(headers)
            .timeout(request.timeout);

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(e, request))?;

        let status = response.status().as_u16();
        let mut headers = HashMap::with_capacity(response.headers().len());
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str().to_string(), value.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(e, request))?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
