//! In-memory response store
//!
//! TTL semantics are lazy: an expired entry is removed by the lookup that
//! finds it, not by a background sweeper. The size bound evicts the
//! earliest-inserted surviving entry (insertion order, a FIFO approximation)
//! rather than the least recently used one; callers assuming true LRU should
//! read the eviction tests before relying on recency.
//!
//! All operations are total: malformed or non-cacheable input is a miss or a
//! no-op, never an error. The interior lock is never held across an await.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::debug;

use super::config::{CacheConfig, CacheConfigUpdate};
use super::entry::CacheEntry;
use super::key::CacheKey;
use super::stats::{CacheStats, CacheStatsTracker};
use crate::client::{Method, RawResponse};

struct CacheInner {
    config: CacheConfig,
    entries: HashMap<CacheKey, CacheEntry>,
    next_seq: u64,
}

/// TTL + bounded-size response cache with insertion-order eviction
pub struct ResponseCache {
    inner: Mutex<CacheInner>,
    stats: CacheStatsTracker,
}

impl ResponseCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Mutex::new(CacheInner {
                config,
                entries: HashMap::new(),
                next_seq: 0,
            }),
            stats: CacheStatsTracker::default(),
        }
    }

    fn is_cacheable(config: &CacheConfig, method: Method) -> bool {
        config.enabled && (method.is_get() || config.cache_non_get)
    }

    /// Look up a cached response.
    ///
    /// Returns `None` when caching is disabled, the method is not cacheable,
    /// no entry exists, or the entry's TTL has elapsed (in which case the
    /// entry is removed as a side effect).
    pub fn get(&self, method: Method, key: &CacheKey) -> Option<RawResponse> {
        let mut inner = self.inner.lock();

        if !Self::is_cacheable(&inner.config, method) {
            return None;
        }

        let ttl = Duration::from_millis(inner.config.ttl_ms);
        let live = match inner.entries.get(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) if entry.is_expired(ttl) => None,
            Some(entry) => Some(entry.response.clone()),
        };

        match live {
            Some(response) => {
                self.stats.record_hit();
                debug!(key = %key, "cache hit");
                Some(response)
            }
            None => {
                inner.entries.remove(key);
                self.stats.record_expiry();
                self.stats.record_miss();
                debug!(key = %key, "cache miss (expired)");
                None
            }
        }
    }

    /// Store a response.
    ///
    /// No-op under the same non-cacheable conditions as [`get`](Self::get).
    /// Overwriting an existing key refreshes its insertion timestamp and
    /// order. Enforces `max_entries` by evicting the earliest-inserted
    /// surviving entry.
    pub fn set(&self, method: Method, key: CacheKey, response: &RawResponse) {
        let mut inner = self.inner.lock();

        if !Self::is_cacheable(&inner.config, method) {
            return;
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(key, CacheEntry::new(response.clone(), seq));

        while inner.entries.len() > inner.config.max_entries {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.seq)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    inner.entries.remove(&key);
                    self.stats.record_eviction();
                    debug!(key = %key, "cache eviction (size bound)");
                }
                None => break,
            }
        }
    }

    /// Merge a partial config update; disabling caching clears all entries
    pub fn update_config(&self, update: &CacheConfigUpdate) {
        let mut inner = self.inner.lock();
        update.apply_to(&mut inner.config);
        if !inner.config.enabled {
            inner.entries.clear();
            debug!("cache disabled by config update, entries cleared");
        }
    }

    /// Remove every entry unconditionally
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    /// Current counters plus entry count
    pub fn stats(&self) -> CacheStats {
        let entries = self.inner.lock().entries.len();
        self.stats.snapshot(entries)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
