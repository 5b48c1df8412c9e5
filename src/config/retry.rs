//! Retry configuration
//!
//! Serde-facing shape of the retry policy, so deployments can configure
//! retry behavior from YAML. Defaults are sourced from `crate::constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_MAX_RETRIES, DEFAULT_MAX_RETRY_DELAY_MS, DEFAULT_RETRYABLE_STATUSES,
    DEFAULT_RETRY_DELAY_MS,
};
use crate::retry::RetryPolicy;

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_retry_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY_MS
}

fn default_max_retry_delay_ms() -> u64 {
    DEFAULT_MAX_RETRY_DELAY_MS
}

fn default_true() -> bool {
    true
}

fn default_retryable_statuses() -> Vec<u16> {
    DEFAULT_RETRYABLE_STATUSES.to_vec()
}

/// Retry configuration (YAML format)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of automatic retries per logical request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Base retry delay in milliseconds
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    /// Cap for exponential backoff growth in milliseconds
    #[serde(default = "default_max_retry_delay_ms")]
    pub max_retry_delay_ms: u64,
    /// Grow delays exponentially (with jitter); fixed delay when false
    #[serde(default = "default_true")]
    pub exponential_backoff: bool,
    /// Retry failures where no HTTP response was received
    #[serde(default = "default_true")]
    pub retry_network_errors: bool,
    /// HTTP status codes that qualify for a retry
    #[serde(default = "default_retryable_statuses")]
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            max_retry_delay_ms: default_max_retry_delay_ms(),
            exponential_backoff: true,
            retry_network_errors: true,
            retryable_statuses: default_retryable_statuses(),
        }
    }
}

impl RetryConfig {
    /// Convert to the runtime policy from the retry module
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            retry_delay_ms: self.retry_delay_ms,
            max_retry_delay_ms: self.max_retry_delay_ms,
            exponential_backoff: self.exponential_backoff,
            retry_network_errors: self.retry_network_errors,
            retryable_statuses: self.retryable_statuses.clone(),
        }
    }

    /// Validate retry configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_retry_delay_ms < self.retry_delay_ms {
            return Err(format!(
                "max_retry_delay_ms ({}) cannot be less than retry_delay_ms ({})",
                self.max_retry_delay_ms, self.retry_delay_ms
            ));
        }
        Ok(())
    }
}
