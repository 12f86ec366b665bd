//! lsproxy - workspace-caching LSP proxy
//!
//! Accepts editor connections, wraps a locally spawned language server
//! per session, and rewrites document URIs between the editor's project
//! view and the session's local workspace cache.

use anyhow::{Context, Result};
use clap::Parser;

mod args;
mod logging;

use args::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init(&args.log_level)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting lsproxy");

    let mut config = if let Some(config_path) = &args.config {
        lsproxy_core::ProxyConfig::load_from(config_path)
            .with_context(|| format!("failed to load config from {}", config_path.display()))?
    } else {
        lsproxy_core::ProxyConfig::load().context("failed to load configuration")?
    };

    if let Some(listen) = args.listen {
        config.listen = listen;
    }
    if let Some(cache_dir) = args.cache_dir {
        config.cache_root = cache_dir;
    }

    tracing::debug!(
        listen = %config.listen,
        cache_root = %config.cache_root.display(),
        server = %config.server.command,
        "configuration loaded"
    );

    lsproxy_core::serve(config).await.context("proxy error")?;

    tracing::info!("lsproxy shutdown complete");
    Ok(())
}
