//! Per-connection session state.
//!
//! A session spans one client connection: a collision-resistant key
//! generated at establishment, the cache directory derived from it, and
//! the translation of every message flowing through in either direction.
//! Sessions are independent; concurrent sessions share only the
//! read-only cache root.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;
use tokio::sync::OnceCell;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::{FileSync, WorkspaceCache};
use crate::error::{Error, Result};
use crate::uri::{to_client_uri, to_server_uri};
use crate::walk::rewrite_uris;

/// One client-to-proxy-to-server connection lifetime.
#[derive(Debug)]
pub struct Session {
    id: String,
    cache: Arc<WorkspaceCache>,
    cache_dir: PathBuf,
    populated: OnceCell<PathBuf>,
    closed: AtomicBool,
}

impl Session {
    /// Create a session with a freshly generated key.
    #[must_use]
    pub fn new(cache: Arc<WorkspaceCache>) -> Self {
        let id = Uuid::new_v4().to_string();
        let cache_dir = cache.session_dir(&id);
        Self {
            id,
            cache,
            cache_dir,
            populated: OnceCell::new(),
            closed: AtomicBool::new(false),
        }
    }

    /// The session key.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The session's cache directory, derived through the cache manager.
    #[must_use]
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Whether teardown has begun.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Populate the session's cache, exactly once.
    ///
    /// Concurrent callers coalesce onto a single clone; later calls see
    /// the already-populated directory.
    ///
    /// # Errors
    ///
    /// Propagates the cache population failure; fatal to session
    /// startup.
    pub async fn populate(&self, globs: &[String], sync: &dyn FileSync) -> Result<&Path> {
        let dir = self
            .populated
            .get_or_try_init(|| self.cache.populate(&self.id, globs, sync))
            .await?;
        Ok(dir.as_path())
    }

    /// Rewrite every document URI in an inbound message to the server's
    /// viewpoint, in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] once teardown has begun, so no
    /// message is ever translated against a cache directory whose
    /// removal has started.
    pub fn translate_to_server(&self, payload: &mut Value) -> Result<()> {
        self.ensure_open()?;
        rewrite_uris(payload, |uri| to_server_uri(uri, &self.cache_dir));
        Ok(())
    }

    /// Rewrite every document URI in an outbound message back to the
    /// client's viewpoint, in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionClosed`] once teardown has begun.
    pub fn translate_to_client(&self, payload: &mut Value) -> Result<()> {
        self.ensure_open()?;
        rewrite_uris(payload, |uri| to_client_uri(uri, &self.cache_dir));
        Ok(())
    }

    /// Tear the session down: stop accepting messages, then remove the
    /// cache directory.
    ///
    /// Removal failures are logged, never escalated; cleanup must not
    /// block session shutdown. Idempotent.
    pub async fn shutdown(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        info!(session = %self.id, "session closing");
        // Destroy even when populate never completed: a failed sync can
        // leave a partially created directory behind, and a directory
        // that never existed counts as removed.
        if let Err(err) = self.cache.destroy(&self.id).await {
            warn!(session = %self.id, error = %err, "failed to remove session cache");
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::SessionClosed);
        }
        Ok(())
    }
}
