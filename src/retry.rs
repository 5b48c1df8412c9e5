//! Retry Logic with Exponential Backoff
//!
//! Handles transient backend failures by automatically retrying failed
//! requests with exponential backoff delays between attempts.
//!
//! ## Retriable vs Non-Retriable Failures
//!
//! **Retriable** (will be retried):
//! - Network-level failures with no HTTP response (when `retry_network_errors`)
//! - 408 Request Timeout, 429 Too Many Requests
//! - 500 Internal Server Error, 502 Bad Gateway, 503 Service Unavailable,
//!   504 Gateway Timeout
//!
//! **Non-Retriable** (fail immediately):
//! - Any status outside the configured retryable set (400, 403, 404, ...)
//!
//! ## Exponential Backoff with Jitter
//!
//! Delays between retries grow exponentially, capped at `max_retry_delay_ms`,
//! with additive jitter of 0–20% of the capped value so concurrent callers
//! hitting the same outage do not retry in lockstep:
//! - Retry 0: ~1000ms
//! - Retry 1: ~2000ms (2x)
//! - Retry 2: ~4000ms (2x)
//! - Capped at max_retry_delay_ms

use std::time::Duration;

use rand::Rng;

use crate::constants::{
    BACKOFF_JITTER_FACTOR, DEFAULT_MAX_RETRIES, DEFAULT_MAX_RETRY_DELAY_MS,
    DEFAULT_RETRYABLE_STATUSES, DEFAULT_RETRY_DELAY_MS,
};

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of automatic retries per logical request
    /// (not counting the initial dispatch)
    pub max_retries: u32,
    /// Base retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Cap for exponential backoff growth in milliseconds
    pub max_retry_delay_ms: u64,
    /// Grow the delay exponentially; when false the base delay is used as-is
    pub exponential_backoff: bool,
    /// Retry failures where no HTTP response was received
    pub retry_network_errors: bool,
    /// HTTP status codes that qualify for a retry
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            max_retry_delay_ms: DEFAULT_MAX_RETRY_DELAY_MS,
            exponential_backoff: true,
            retry_network_errors: true,
            retryable_statuses: DEFAULT_RETRYABLE_STATUSES.to_vec(),
        }
    }
}

impl RetryPolicy {
    /// Check whether a failure qualifies for a retry.
    ///
    /// `status` is `None` for network-level failures (no response received)
    /// and `Some(code)` for HTTP-level failures.
    pub fn should_retry(&self, status: Option<u16>) -> bool {
        match status {
            None => self.retry_network_errors,
            Some(code) => self.retryable_statuses.contains(&code),
        }
    }

    /// Compute the delay before the retry with the given 0-based index.
    ///
    /// The exponential component is `retry_delay_ms * 2^retry_index` capped at
    /// `max_retry_delay_ms`; jitter adds a uniform 0–20% of the capped value
    /// on top. With `exponential_backoff` disabled the base delay is returned
    /// unmodified.
    pub fn backoff_delay(&self, retry_index: u32) -> Duration {
        if !self.exponential_backoff {
            return Duration::from_millis(self.retry_delay_ms);
        }

        let capped_ms = self
            .retry_delay_ms
            .saturating_mul(2u64.saturating_pow(retry_index))
            .min(self.max_retry_delay_ms);

        let jitter_ms = capped_ms as f64 * BACKOFF_JITTER_FACTOR * rand::thread_rng().gen::<f64>();

        Duration::from_millis(capped_ms.saturating_add(jitter_ms as u64))
    }
}

/// Per-request retry bookkeeping.
///
/// One value per logical request, owned by the dispatch loop; concurrent
/// requests never share counters. Dropped when the request succeeds or
/// exhausts the ceiling.
#[derive(Debug, Default)]
pub struct RetryState {
    retries: u32,
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of retries performed so far
    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Whether another retry is permitted under the policy's ceiling
    pub fn can_retry(&self, policy: &RetryPolicy) -> bool {
        self.retries < policy.max_retries
    }

    /// Record that a retry is about to be dispatched, returning the 0-based
    /// index of that retry for backoff computation
    pub fn begin_retry(&mut self) -> u32 {
        let index = self.retries;
        self.retries += 1;
        index
    }
}
