//! File synchronization collaborator.
//!
//! Populating a session cache is delegated through the [`FileSync`]
//! trait so the actual byte transfer stays pluggable. [`LocalSync`]
//! is the shipped implementation: a glob-scoped copy of a local
//! project root, which stands in for a remote workspace fetch.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;

use crate::error::{Error, Result};

/// Materializes a snapshot of the client's project into a directory.
#[async_trait]
pub trait FileSync: Send + Sync {
    /// Clone the subset of the project matching `globs` into `dest`.
    ///
    /// An empty `globs` slice means the whole project.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transfer fails; callers treat
    /// this as fatal to session startup.
    async fn clone_into(&self, dest: &Path, globs: &[String]) -> Result<()>;
}

/// [`FileSync`] over a local project directory.
#[derive(Debug, Clone)]
pub struct LocalSync {
    source_root: PathBuf,
}

impl LocalSync {
    /// Create a sync source rooted at `source_root`.
    pub fn new(source_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
        }
    }
}

#[async_trait]
impl FileSync for LocalSync {
    async fn clone_into(&self, dest: &Path, globs: &[String]) -> Result<()> {
        let source = self.source_root.clone();
        let dest = dest.to_path_buf();
        let globs = globs.to_vec();

        // The walk and copies are disk bound; keep them off the runtime.
        tokio::task::spawn_blocking(move || copy_tree(&source, &dest, &globs))
            .await
            .map_err(|e| Error::Sync(format!("sync task failed: {e}")))?
    }
}

/// Copy every file under `source` matching `globs` into `dest`,
/// recreating the directory structure.
fn copy_tree(source: &Path, dest: &Path, globs: &[String]) -> Result<()> {
    let mut overrides = OverrideBuilder::new(source);
    for glob in globs {
        overrides
            .add(glob)
            .map_err(|e| Error::Sync(format!("invalid glob {glob:?}: {e}")))?;
    }
    let overrides = overrides
        .build()
        .map_err(|e| Error::Sync(e.to_string()))?;

    let walker = WalkBuilder::new(source)
        .overrides(overrides)
        .standard_filters(false)
        .build();

    let mut copied = 0usize;
    for entry in walker {
        let entry = entry.map_err(|e| Error::Sync(e.to_string()))?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| Error::Sync(format!("{} escapes the source root", entry.path().display())))?;
        let target = dest.join(rel);
        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::copy(entry.path(), &target)?;
        copied += 1;
    }

    tracing::debug!(
        source = %source.display(),
        dest = %dest.display(),
        copied,
        "local sync complete"
    );
    Ok(())
}
