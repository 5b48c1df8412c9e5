//! Cache statistics

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Snapshot of cache counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that went to the network
    pub misses: u64,
    /// Entries removed to enforce the size bound
    pub evictions: u64,
    /// Entries removed because their TTL elapsed
    pub expired: u64,
    /// Current entry count
    pub entries: usize,
}

impl CacheStats {
    /// Hit rate as a percentage of all lookups
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }
}

/// Statistics tracker using atomics for thread safety
#[derive(Debug, Default)]
pub(crate) struct CacheStatsTracker {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    expired: AtomicU64,
}

impl CacheStatsTracker {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_expiry(&self) {
        self.expired.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self, entries: usize) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            entries,
        }
    }
}
