// Configuration module

mod retry;

pub use retry::RetryConfig;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cache::CacheConfig;
use crate::constants::DEFAULT_TIMEOUT_MS;
use crate::middleware::MiddlewareChains;

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Gateway configuration.
///
/// Scalar fields deserialize from YAML; middleware chains are closures and
/// can only be supplied programmatically. Constructed once at startup and
/// partially replaceable at runtime via
/// [`Gateway::update_config`](crate::gateway::Gateway::update_config).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Base URL every endpoint is resolved against
    pub base_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Headers sent with every request; `Content-Type: application/json` is
    /// always added underneath, these values win on conflict
    #[serde(default)]
    pub default_headers: HashMap<String, String>,
    /// Record requests and errors in diagnostics and log failures
    #[serde(default)]
    pub debug: bool,
    /// Retry policy; requests fail on first error when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Request/response/error transform chains (programmatic only)
    #[serde(skip)]
    pub middleware: MiddlewareChains,
}

impl GatewayConfig {
    /// Minimal configuration for the given base URL, everything else default
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: default_timeout_ms(),
            default_headers: HashMap::new(),
            debug: false,
            retry: None,
            cache: CacheConfig::default(),
            middleware: MiddlewareChains::new(),
        }
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("base_url cannot be empty".to_string());
        }
        if self.timeout_ms == 0 {
            return Err("timeout_ms must be greater than 0".to_string());
        }
        if let Some(retry) = &self.retry {
            retry.validate()?;
        }
        self.cache.validate()?;
        Ok(())
    }
}

/// Partial gateway configuration for runtime updates.
///
/// Absent fields leave the current value untouched; present fields replace
/// it wholesale (headers included).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_headers: Option<HashMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryConfig>,
}
