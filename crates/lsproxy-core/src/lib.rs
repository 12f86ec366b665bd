//! # lsproxy-core
//!
//! Core library for the workspace-caching LSP proxy.
//!
//! The proxy sits between a remote editor and a locally running
//! language server. The editor addresses documents with paths rooted at
//! `/` (its project root); the server operates on a per-session local
//! cache of that project. Every message flowing through the proxy has
//! its document URIs rewritten to the receiving side's viewpoint.
//!
//! ## Architecture
//!
//! - [`uri`] - translation of document URIs between the two viewpoints
//! - [`walk`] - structural walker locating URIs inside arbitrary payloads
//! - [`cache`] - per-session workspace cache lifecycle
//! - [`session`] - per-connection state tying the above together
//! - [`proxy`] - framed transport and the per-connection engine
//! - [`config`] - configuration types and loading
//! - [`error`] - error types for the library
//!
//! ## Example
//!
//! ```rust,ignore
//! use lsproxy_core::{ProxyConfig, serve};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lsproxy_core::Error> {
//!     let config = ProxyConfig::load()?;
//!     serve(config).await
//! }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod paths;
pub mod proxy;
pub mod session;
pub mod uri;
pub mod walk;

use std::sync::Arc;

pub use cache::{FileSync, LocalSync, WorkspaceCache};
pub use config::ProxyConfig;
pub use error::{Error, Result};
pub use session::Session;
use tokio::net::TcpListener;

/// Run the proxy: accept editor connections and drive a session per
/// connection.
///
/// Accept failures and session failures are logged and do not bring
/// the listener down.
///
/// # Errors
///
/// Returns an error if binding the configured address fails.
pub async fn serve(config: ProxyConfig) -> Result<()> {
    let config = Arc::new(config);
    let cache = Arc::new(WorkspaceCache::new(config.cache_root.clone()));
    let sync: Arc<dyn FileSync> = Arc::new(LocalSync::new(config.project_root.clone()));

    let listener = TcpListener::bind(&config.listen).await?;
    tracing::info!(listen = %config.listen, "listening for editor connections");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::warn!(error = %err, "failed to accept connection");
                continue;
            }
        };
        tracing::info!(%peer, "client connected");

        let config = Arc::clone(&config);
        let cache = Arc::clone(&cache);
        let sync = Arc::clone(&sync);
        tokio::spawn(async move {
            if let Err(err) = proxy::run_session(stream, config, cache, sync).await {
                tracing::error!(error = %err, "session failed");
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::config::ServerCommand;

    #[tokio::test]
    async fn test_serve_reports_bind_failure() {
        let config = ProxyConfig {
            listen: "256.256.256.256:0".to_string(),
            cache_root: std::env::temp_dir().join("lsproxy-bind-test"),
            project_root: PathBuf::from("."),
            sync_globs: vec![],
            server: ServerCommand {
                command: "true".to_string(),
                args: vec![],
            },
        };
        assert!(matches!(serve(config).await, Err(Error::Io(_))));
    }
}
