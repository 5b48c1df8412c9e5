//! Connection health monitoring
//!
//! Tracks request outcomes per gateway instance and derives an online/offline
//! verdict. The gateway is considered offline only when BOTH conditions hold:
//! more than [`OFFLINE_AFTER_MS`] has elapsed since the last success AND at
//! least [`OFFLINE_CONSECUTIVE_FAILURES`] consecutive failures have been
//! recorded. A single success flips both conditions back.
//!
//! Uses lock-free atomics for all operations, including timestamp tracking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::constants::{OFFLINE_AFTER_MS, OFFLINE_CONSECUTIVE_FAILURES};

/// Get current time as milliseconds since UNIX epoch (lock-free timestamp)
#[inline]
fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Point-in-time connection health report
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionStatus {
    pub is_online: bool,
    /// Milliseconds since the last recorded success; 0 if none ever
    pub time_since_last_success_ms: u64,
    /// Total failures recorded since construction or the last reset
    pub failed_request_count: u64,
}

/// Per-gateway connection health state
#[derive(Debug, Default)]
pub struct ConnectionMonitor {
    /// Last success as milliseconds since UNIX epoch; 0 means never
    last_success_ms: AtomicU64,
    total_failures: AtomicU64,
    consecutive_failures: AtomicU64,
}

impl ConnectionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful request: stamp now, reset the consecutive counter
    pub fn record_success(&self) {
        self.last_success_ms.store(now_ms(), Ordering::Release);
        self.consecutive_failures.store(0, Ordering::Relaxed);
    }

    /// Record a failed request: bump total and consecutive counters
    pub fn record_failure(&self) {
        self.total_failures.fetch_add(1, Ordering::Relaxed);
        self.consecutive_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Milliseconds since the last success, 0 if no success was ever recorded
    pub fn time_since_last_success(&self) -> u64 {
        let last = self.last_success_ms.load(Ordering::Acquire);
        if last == 0 {
            0
        } else {
            now_ms().saturating_sub(last)
        }
    }

    /// Offline requires BOTH a stale last-success AND repeated failures
    pub fn is_online(&self) -> bool {
        let stale = self.time_since_last_success() > OFFLINE_AFTER_MS;
        let failing =
            self.consecutive_failures.load(Ordering::Relaxed) >= OFFLINE_CONSECUTIVE_FAILURES;
        !(stale && failing)
    }

    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus {
            is_online: self.is_online(),
            time_since_last_success_ms: self.time_since_last_success(),
            failed_request_count: self.total_failures.load(Ordering::Relaxed),
        }
    }

    /// Zero all state, including the last-success timestamp
    pub fn reset(&self) {
        self.last_success_ms.store(0, Ordering::Release);
        self.total_failures.store(0, Ordering::Relaxed);
        self.consecutive_failures.store(0, Ordering::Relaxed);
    }

    #[cfg(test)]
    pub(crate) fn backdate_last_success(&self, age_ms: u64) {
        self.last_success_ms
            .store(now_ms().saturating_sub(age_ms), Ordering::Release);
    }
}
