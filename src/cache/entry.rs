//! Cache entry type
//!
//! An entry is a response snapshot plus the metadata needed for TTL expiry
//! and insertion-order eviction.

use std::time::{Duration, Instant};

use crate::client::RawResponse;

/// A cached response with insertion metadata
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The cached response snapshot
    pub response: RawResponse,
    /// When this entry was inserted
    pub inserted_at: Instant,
    /// Monotonic insertion sequence; the smallest surviving value is the
    /// eviction victim when the store exceeds its size bound
    pub seq: u64,
}

impl CacheEntry {
    pub fn new(response: RawResponse, seq: u64) -> Self {
        Self {
            response,
            inserted_at: Instant::now(),
            seq,
        }
    }

    /// An entry is expired at or after `ttl` since insertion
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}
