//! Logging initialization.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Initialize the logging subsystem.
///
/// Logs go to stderr only: stdout belongs to whatever is piped through
/// the proxy. An unparseable level falls back to `info`.
///
/// # Errors
///
/// Returns an error if no usable log filter can be built.
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level)
        .or_else(|_| EnvFilter::try_new("info"))
        .context("failed to parse log level")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .ok(); // Ignore if already initialized

    Ok(())
}
