//! Error types for lsproxy-core.
//!
//! This module defines the canonical error type for the library.
//! Malformed document URIs are deliberately *not* represented here:
//! the translator recovers from them locally (log and pass through)
//! so that one bad field never aborts an otherwise-valid message.

use std::path::PathBuf;

/// The main error type for lsproxy-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Populating a session's workspace cache failed.
    ///
    /// Fatal to session startup: the wrapped language server cannot be
    /// pointed at a nonexistent or partial project.
    #[error("failed to populate workspace cache at {path:?}: {source}")]
    CachePopulate {
        /// Session cache directory that could not be populated.
        path: PathBuf,
        /// Underlying sync failure.
        #[source]
        source: Box<Error>,
    },

    /// File synchronization into a cache directory failed.
    #[error("workspace sync failed: {0}")]
    Sync(String),

    /// The session has begun teardown and no longer accepts messages.
    #[error("session is closed")]
    SessionClosed,

    /// Base-protocol framing error while reading a message.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The peer closed its end of the connection.
    #[error("peer disconnected")]
    Disconnected,

    /// The wrapped language server failed to spawn.
    #[error("failed to spawn language server '{command}': {source}")]
    ServerSpawnFailed {
        /// Command that failed to spawn.
        command: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    /// Invalid configuration contents.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A specialized Result type for lsproxy-core operations.
pub type Result<T> = std::result::Result<T, Error>;
