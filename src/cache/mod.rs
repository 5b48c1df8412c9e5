//! Response caching
//!
//! This module provides the gateway's response cache:
//! - `CacheKey`: canonical key derived from {url, method, params, body}
//! - `CacheEntry`: response snapshot with TTL and insertion-order metadata
//! - `CacheConfig` / `CacheConfigUpdate`: configuration and partial updates
//! - `ResponseCache`: TTL + bounded-size store with insertion-order eviction
//! - `CacheStats`: hit/miss/eviction counters

mod config;
mod entry;
mod key;
mod stats;
mod store;

pub use config::{CacheConfig, CacheConfigUpdate};
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use stats::CacheStats;
pub use store::ResponseCache;
