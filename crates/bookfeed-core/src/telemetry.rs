//! Tracing subscriber setup.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::error::{BookfeedError, BookfeedResult};

/// Build the log filter.
///
/// A `RUST_LOG`-style directive string takes precedence over `log_level`.
pub fn build_env_filter(log_level: &str, rust_log: Option<&str>) -> Result<EnvFilter> {
    let directives = rust_log.unwrap_or(log_level);
    EnvFilter::try_new(directives).with_context(|| format!("invalid log level filter: {directives}"))
}

/// Initialize the global tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to `log_level`. Fails if the
/// filter does not parse or a global subscriber is already installed.
pub fn init_tracing(log_level: &str) -> BookfeedResult<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = build_env_filter(log_level, rust_log.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| {
            BookfeedError::Internal(anyhow::anyhow!("failed to install tracing subscriber: {e}"))
        })
}
