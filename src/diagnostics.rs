//! Per-endpoint request diagnostics
//!
//! Aggregates request and error counts per logical route: the endpoint key is
//! the request URL with its query string stripped, so `/users?page=1` and
//! `/users?page=2` land in the same bucket. The map grows for the lifetime of
//! the process (one entry per distinct route, naturally bounded by the
//! backend's route set); `reset()` is the only eviction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::constants::UNKNOWN_ENDPOINT;

/// Last error observed for an endpoint
#[derive(Debug, Clone, Serialize)]
pub struct LastError {
    pub message: String,
    /// HTTP status if a response was received
    pub status: Option<u16>,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
struct EndpointStats {
    request_count: u64,
    error_count: u64,
    last_error: Option<LastError>,
    last_request_at: Option<DateTime<Utc>>,
}

/// Per-endpoint summary row
#[derive(Debug, Clone, Serialize)]
pub struct EndpointReport {
    pub endpoint: String,
    pub request_count: u64,
    pub error_count: u64,
    /// Errors as a percentage of requests for this endpoint
    pub error_rate: f64,
    pub last_error: Option<LastError>,
    pub last_request_at: Option<DateTime<Utc>>,
}

/// Full diagnostics view: per-endpoint rows plus aggregate totals
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticsSummary {
    pub endpoints: Vec<EndpointReport>,
    pub total_requests: u64,
    pub total_errors: u64,
}

/// Collector for per-endpoint request/error counters
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    endpoints: RwLock<HashMap<String, EndpointStats>>,
}

/// Strip the query string; absent or empty URLs map to a sentinel key
fn normalize_endpoint(url: &str) -> String {
    let path = url.split('?').next().unwrap_or("");
    if path.is_empty() {
        UNKNOWN_ENDPOINT.to_string()
    } else {
        path.to_string()
    }
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a dispatched request against its endpoint
    pub fn record_request(&self, url: &str) {
        let endpoint = normalize_endpoint(url);
        let mut endpoints = self.endpoints.write();
        let stats = endpoints.entry(endpoint).or_default();
        stats.request_count += 1;
        stats.last_request_at = Some(Utc::now());
    }

    /// Count an error against its endpoint and remember it as the last error
    pub fn record_error(&self, url: &str, message: &str, status: Option<u16>) {
        let endpoint = normalize_endpoint(url);
        let mut endpoints = self.endpoints.write();
        let stats = endpoints.entry(endpoint).or_default();
        stats.error_count += 1;
        stats.last_error = Some(LastError {
            message: message.to_string(),
            status,
            at: Utc::now(),
        });
    }

    /// Build the summary view, endpoints sorted by name for stable output
    pub fn summary(&self) -> DiagnosticsSummary {
        let endpoints = self.endpoints.read();

        let mut reports: Vec<EndpointReport> = endpoints
            .iter()
            .map(|(endpoint, stats)| EndpointReport {
                endpoint: endpoint.clone(),
                request_count: stats.request_count,
                error_count: stats.error_count,
                error_rate: if stats.request_count == 0 {
                    0.0
                } else {
                    stats.error_count as f64 / stats.request_count as f64 * 100.0
                },
                last_error: stats.last_error.clone(),
                last_request_at: stats.last_request_at,
            })
            .collect();
        reports.sort_by(|a, b| a.endpoint.cmp(&b.endpoint));

        let total_requests = reports.iter().map(|r| r.request_count).sum();
        let total_errors = reports.iter().map(|r| r.error_count).sum();

        DiagnosticsSummary {
            endpoints: reports,
            total_requests,
            total_errors,
        }
    }

    /// Clear all endpoint entries
    pub fn reset(&self) {
        self.endpoints.write().clear();
    }
}
