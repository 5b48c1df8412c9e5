//! Cache configuration types

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_MS};

fn default_enabled() -> bool {
    true
}

fn default_ttl_ms() -> u64 {
    DEFAULT_CACHE_TTL_MS
}

fn default_max_entries() -> usize {
    DEFAULT_CACHE_MAX_ENTRIES
}

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled at all
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Entry time-to-live in milliseconds
    #[serde(default = "default_ttl_ms")]
    pub ttl_ms: u64,
    /// Maximum number of entries before the oldest-inserted is evicted
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    /// Cache responses to non-GET requests as well
    #[serde(default)]
    pub cache_non_get: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            ttl_ms: default_ttl_ms(),
            max_entries: default_max_entries(),
            cache_non_get: false,
        }
    }
}

impl CacheConfig {
    /// Validate cache configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.max_entries == 0 {
            return Err(
                "max_entries must be greater than 0 (use enabled=false to disable caching)"
                    .to_string(),
            );
        }
        Ok(())
    }
}

/// Partial cache configuration for runtime updates.
///
/// Every field is optional; absent fields leave the current value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_non_get: Option<bool>,
}

impl CacheConfigUpdate {
    /// Apply this partial update onto an existing configuration
    pub fn apply_to(&self, config: &mut CacheConfig) {
        if let Some(enabled) = self.enabled {
            config.enabled = enabled;
        }
        if let Some(ttl_ms) = self.ttl_ms {
            config.ttl_ms = ttl_ms;
        }
        if let Some(max_entries) = self.max_entries {
            config.max_entries = max_entries;
        }
        if let Some(cache_non_get) = self.cache_non_get {
            config.cache_non_get = cache_non_get;
        }
    }
}
