// Logging module for structured logging using the tracing crate

use std::error::Error;

/// Initialize the tracing subscriber for structured logging
///
/// The subscriber is configured with:
/// - JSON formatting for easy parsing by log aggregation systems
/// - `RUST_LOG`-style env filtering, defaulting to `info`
/// - Output to stdout for container/cloud-native deployments
///
/// Call once at application startup; a second call returns an error because
/// a global subscriber is already installed.
///
/// # Errors
///
/// Returns an error if a global subscriber has already been set.
pub fn init_subscriber() -> Result<(), Box<dyn Error>> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| -> Box<dyn Error> { e })?;

    Ok(())
}
