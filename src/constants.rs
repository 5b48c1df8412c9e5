// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

// =============================================================================
// Gateway defaults
// =============================================================================

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Content type sent with every request unless overridden by the caller
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Status code reported when no response was received (network-level failure)
pub const STATUS_NO_RESPONSE: u16 = 500;

/// Error code reported when the server did not supply a structured code
pub const CODE_UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

// =============================================================================
// Cache defaults
// =============================================================================

/// Default TTL for cached responses in milliseconds (5 minutes)
pub const DEFAULT_CACHE_TTL_MS: u64 = 300_000;

/// Default maximum number of cached responses
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 100;

// =============================================================================
// Retry defaults
// =============================================================================

/// Default maximum number of automatic retries per logical request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base retry delay in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1_000;

/// Default cap for exponential backoff growth in milliseconds
pub const DEFAULT_MAX_RETRY_DELAY_MS: u64 = 30_000;

/// HTTP status codes retried by default
pub const DEFAULT_RETRYABLE_STATUSES: [u16; 6] = [408, 429, 500, 502, 503, 504];

/// Fraction of the capped backoff added as random jitter (0–20%)
pub const BACKOFF_JITTER_FACTOR: f64 = 0.2;

// =============================================================================
// Connection health defaults
// =============================================================================

/// Elapsed time since the last success after which the gateway may be
/// considered offline, in milliseconds
pub const OFFLINE_AFTER_MS: u64 = 30_000;

/// Consecutive failures required (together with the elapsed-time condition)
/// before the gateway is considered offline
pub const OFFLINE_CONSECUTIVE_FAILURES: u64 = 2;

// =============================================================================
// Diagnostics defaults
// =============================================================================

/// Endpoint key used when a request URL is absent or empty
pub const UNKNOWN_ENDPOINT: &str = "unknown-endpoint";
