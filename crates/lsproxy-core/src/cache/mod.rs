//! Workspace cache lifecycle.
//!
//! Each session owns one directory under the configured cache root,
//! holding a snapshot of the client's project for the wrapped language
//! server to operate on. The directory path is a pure function of the
//! cache root and the session key; every consumer derives it through
//! [`WorkspaceCache::session_dir`] so the rule cannot diverge.

mod sync;

use std::path::{Path, PathBuf};

pub use sync::{FileSync, LocalSync};
use tracing::info;

use crate::error::{Error, Result};
use crate::paths::filepath_has_prefix;

/// Owns the cache root and the per-session directories beneath it.
#[derive(Debug)]
pub struct WorkspaceCache {
    root: PathBuf,
}

impl WorkspaceCache {
    /// Create a cache manager over `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configured cache root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The cache directory for `session_key`: `<root>/<session_key>`.
    #[must_use]
    pub fn session_dir(&self, session_key: &str) -> PathBuf {
        self.root.join(session_key)
    }

    /// Materialize the client's project into the session's directory.
    ///
    /// Delegates the byte transfer to `sync`; an empty `globs` slice
    /// clones the whole project.
    ///
    /// # Errors
    ///
    /// A sync failure is wrapped in [`Error::CachePopulate`] and is
    /// fatal to session startup: the server cannot be pointed at a
    /// nonexistent or partial project.
    pub async fn populate(
        &self,
        session_key: &str,
        globs: &[String],
        sync: &dyn FileSync,
    ) -> Result<PathBuf> {
        let dir = self.session_dir(session_key);
        tokio::fs::create_dir_all(&dir).await?;

        sync.clone_into(&dir, globs)
            .await
            .map_err(|source| Error::CachePopulate {
                path: dir.clone(),
                source: Box::new(source),
            })?;

        info!(cache_dir = %dir.display(), "cloned workspace into session cache");
        Ok(dir)
    }

    /// Recursively remove the session's cache directory.
    ///
    /// A directory that never came into existence counts as removed.
    /// Callers at session teardown log failures and proceed; a failed
    /// cleanup must never block shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails, or if the derived directory
    /// would fall outside the cache root (a session key containing path
    /// traversal).
    pub async fn destroy(&self, session_key: &str) -> Result<()> {
        // A session key is a single path component; anything else could
        // derive a directory outside the root.
        let mut components = Path::new(session_key).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(std::path::Component::Normal(_)), None)
        );
        let dir = self.session_dir(session_key);
        let dir_str = dir.to_string_lossy();
        let root_str = self.root.to_string_lossy();
        if !single_normal || !filepath_has_prefix(&dir_str, &root_str) || dir == self.root {
            return Err(Error::Config(format!(
                "refusing to remove {} outside cache root {}",
                dir.display(),
                self.root.display()
            )));
        }

        info!(cache_dir = %dir.display(), "removing session cache");
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Io(e)),
        }
    }
}
