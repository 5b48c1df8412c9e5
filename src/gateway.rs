//! Request Gateway
//!
//! The single entry point for outbound API calls. Every verb method resolves
//! to a normalized [`ApiResponse`] envelope and never returns an error to the
//! caller; all failure paths produce `success: false` with a populated error.
//!
//! Dispatch pipeline per request:
//! 1. Resolve the descriptor: absolute URL, merged headers, timeout
//! 2. Apply request middleware in order; the final descriptor is what is sent
//! 3. Cacheable request: serve a valid cached response, short-circuiting the
//!    network (the response pipeline still runs, so middleware and health
//!    observers see hits and network responses identically)
//! 4. Dispatch through the transport; on failure consult the retry policy,
//!    sleep the backoff, and dispatch again until it succeeds or the retry
//!    ceiling is reached
//! 5. Success: record health, store in cache, apply response middleware
//!    Failure: record health and diagnostics, apply error middleware
//!
//! Configuration is held behind an `ArcSwap`, so `update_config` takes effect
//! for subsequent calls without reconstructing the gateway while in-flight
//! requests keep the snapshot they started with.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{CacheConfigUpdate, CacheKey, CacheStats, ResponseCache};
use crate::client::{HttpClient, HttpRequest, Method, ReqwestClient};
use crate::config::{GatewayConfig, GatewayConfigUpdate};
use crate::constants::DEFAULT_CONTENT_TYPE;
use crate::diagnostics::{DiagnosticsCollector, DiagnosticsSummary};
use crate::middleware::MiddlewareChains;
use crate::monitor::{ConnectionMonitor, ConnectionStatus};
use crate::response::{ApiResponse, Failure};
use crate::retry::{RetryPolicy, RetryState};

/// Per-call options: query parameters and extra headers
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Query parameters, sorted by key so cache keys are canonical
    pub params: BTreeMap<String, String>,
    /// Headers merged over the gateway defaults; these values win
    pub headers: HashMap<String, String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Live configuration snapshot read by every dispatch
struct ResolvedConfig {
    base_url: String,
    timeout: Duration,
    /// Default headers with `Content-Type: application/json` merged in
    headers: HashMap<String, String>,
    debug: bool,
    retry: Option<RetryPolicy>,
}

impl ResolvedConfig {
    fn from_config(config: &GatewayConfig) -> Self {
        let mut headers =
            HashMap::from([("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string())]);
        headers.extend(config.default_headers.clone());

        Self {
            base_url: config.base_url.clone(),
            timeout: Duration::from_millis(config.timeout_ms),
            headers,
            debug: config.debug,
            retry: config.retry.as_ref().map(|r| r.to_policy()),
        }
    }
}

/// Resolve an endpoint against the base URL; absolute endpoints pass through
fn join_url(base_url: &str, endpoint: &str) -> String {
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        return endpoint.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

/// Unified request-dispatch facade
pub struct Gateway {
    state: ArcSwap<ResolvedConfig>,
    middleware: MiddlewareChains,
    cache: ResponseCache,
    monitor: ConnectionMonitor,
    diagnostics: DiagnosticsCollector,
    client: Arc<dyn HttpClient>,
}

impl Gateway {
    /// Construct with the production reqwest transport
    pub fn new(config: GatewayConfig) -> Self {
        Self::with_client(config, Arc::new(ReqwestClient::new()))
    }

    /// Construct with a custom transport (tests use a scripted fake)
    pub fn with_client(config: GatewayConfig, client: Arc<dyn HttpClient>) -> Self {
        let resolved = ResolvedConfig::from_config(&config);
        Self {
            state: ArcSwap::from_pointee(resolved),
            middleware: config.middleware.clone(),
            cache: ResponseCache::new(config.cache.clone()),
            monitor: ConnectionMonitor::new(),
            diagnostics: DiagnosticsCollector::new(),
            client,
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResponse<T> {
        self.dispatch(Method::Get, endpoint, None, options).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> ApiResponse<T> {
        self.dispatch(Method::Post, endpoint, body, options).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> ApiResponse<T> {
        self.dispatch(Method::Put, endpoint, body, options).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> ApiResponse<T> {
        self.dispatch(Method::Delete, endpoint, None, options).await
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        options: RequestOptions,
    ) -> ApiResponse<T> {
        let config = self.state.load_full();

        let mut headers = config.headers.clone();
        headers.extend(options.headers);

        let request = HttpRequest {
            method,
            url: join_url(&config.base_url, endpoint),
            params: options.params,
            headers,
            body,
            timeout: config.timeout,
        };
        let request = self.middleware.apply_request(request);

        // Derived once from the final descriptor and used for both lookup and
        // store, so key-affecting middleware cannot split the two
        let key = CacheKey::derive(method, &request.url, &request.params, request.body.as_ref());

        if config.debug {
            self.diagnostics.record_request(endpoint);
            debug!(method = %method, endpoint, "dispatching request");
        }

        if let Some(cached) = self.cache.get(method, &key) {
            self.monitor.record_success();
            let response = self.middleware.apply_response(cached);
            return ApiResponse::from_success(&response);
        }

        let mut retry_state = RetryState::new();
        loop {
            let (status, failure) = match self.client.execute(&request).await {
                Ok(raw) if raw.is_success() => {
                    self.monitor.record_success();
                    self.cache.set(method, key, &raw);
                    let raw = self.middleware.apply_response(raw);
                    return ApiResponse::from_success(&raw);
                }
                Ok(raw) => (Some(raw.status), Failure::from_response(&raw)),
                Err(err) => (None, Failure::from_client_error(&err)),
            };

            self.monitor.record_failure();
            if config.debug {
                self.diagnostics
                    .record_error(endpoint, &failure.error.message, status);
                warn!(
                    method = %method,
                    endpoint,
                    status = ?status,
                    error = %failure.error.message,
                    "request failed"
                );
            }

            if let Some(policy) = &config.retry {
                if policy.should_retry(status) && retry_state.can_retry(policy) {
                    let retry_index = retry_state.begin_retry();
                    let delay = policy.backoff_delay(retry_index);
                    let delay_ms = delay.as_millis() as u64;
                    debug!(
                        method = %method,
                        endpoint,
                        retry = retry_state.retries(),
                        delay_ms,
                        "retrying after backoff"
                    );
                    tokio::time::sleep(delay).await;
                    if config.debug {
                        self.diagnostics.record_request(endpoint);
                    }
                    continue;
                }
            }

            let failure = self.middleware.apply_error(failure);
            return ApiResponse::from_failure(failure);
        }
    }

    /// Merge a partial config into the live configuration; takes effect for
    /// all subsequent calls. An optional cache partial is forwarded to the
    /// response cache.
    pub fn update_config(
        &self,
        update: GatewayConfigUpdate,
        cache_update: Option<CacheConfigUpdate>,
    ) {
        self.state.rcu(|current| {
            let headers = match &update.default_headers {
                Some(new_headers) => {
                    let mut merged = HashMap::from([(
                        "Content-Type".to_string(),
                        DEFAULT_CONTENT_TYPE.to_string(),
                    )]);
                    merged.extend(new_headers.clone());
                    merged
                }
                None => current.headers.clone(),
            };

            Arc::new(ResolvedConfig {
                base_url: update
                    .base_url
                    .clone()
                    .unwrap_or_else(|| current.base_url.clone()),
                timeout: update
                    .timeout_ms
                    .map(Duration::from_millis)
                    .unwrap_or(current.timeout),
                headers,
                debug: update.debug.unwrap_or(current.debug),
                retry: match &update.retry {
                    Some(retry) => Some(retry.to_policy()),
                    None => current.retry.clone(),
                },
            })
        });

        if let Some(cache_update) = cache_update {
            self.cache.update_config(&cache_update);
        }
    }

    /// Current connection health verdict and counters
    pub fn connection_status(&self) -> ConnectionStatus {
        self.monitor.status()
    }

    /// Reset connection health state
    pub fn reset_connection(&self) {
        self.monitor.reset()
    }

    /// Per-endpoint diagnostics summary
    pub fn diagnostics(&self) -> DiagnosticsSummary {
        self.diagnostics.summary()
    }

    /// Clear all diagnostics entries
    pub fn reset_diagnostics(&self) {
        self.diagnostics.reset()
    }

    /// Empty the response cache unconditionally
    pub fn clear_cache(&self) {
        self.cache.clear()
    }

    /// Cache hit/miss/eviction counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
