//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// Workspace-caching LSP proxy
///
/// Sits between a remote editor and a locally running language server,
/// rewriting document URIs between the editor's project view and a
/// per-session local workspace cache.
#[derive(Debug, Parser)]
#[command(name = "lsproxy")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, searches for lsproxy.toml in:
    /// 1. $LSPROXY_CONFIG environment variable
    /// 2. Current directory
    /// 3. ~/.config/lsproxy/lsproxy.toml
    #[arg(short, long, value_name = "FILE", env = "LSPROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level
    ///
    /// Valid values: trace, debug, info, warn, error
    #[arg(short, long, default_value = "info", env = "LSPROXY_LOG")]
    pub log_level: String,

    /// Override the listen address from the configuration
    #[arg(long, value_name = "ADDR")]
    pub listen: Option<String>,

    /// Override the cache root from the configuration
    #[arg(long, value_name = "DIR", env = "LSPROXY_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,
}
