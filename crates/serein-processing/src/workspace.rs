//! Per-run scratch workspaces.
//!
//! Every pipeline run gets its own uuid-named directory under a common root, so
//! concurrent runs can never alias each other's files. The `Workspace` guard
//! removes the directory on drop, which covers every exit path including panics;
//! a failed removal is logged and never masks the run's own error.

use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Creates scratch workspaces under a fixed root directory.
#[derive(Clone, Debug)]
pub struct WorkspaceManager {
    root: PathBuf,
}

impl WorkspaceManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a fresh workspace directory `root/<uuid>`.
    pub async fn acquire(&self) -> std::io::Result<Workspace> {
        let path = self.root.join(Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&path).await?;
        tracing::debug!(workspace = %path.display(), "Workspace acquired");
        Ok(Workspace {
            path,
            released: false,
        })
    }
}

/// One run's scratch directory. Removed on `release` or on drop.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    released: bool,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create (if needed) and return a child directory of the workspace.
    pub async fn subdir(&self, name: &str) -> std::io::Result<PathBuf> {
        let dir = self.path.join(name);
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Remove the workspace directory. Errors are logged, not returned: cleanup
    /// trouble must not displace whatever outcome the run already has.
    pub async fn release(mut self) {
        self.released = true;
        if let Err(e) = tokio::fs::remove_dir_all(&self.path).await {
            tracing::warn!(
                workspace = %self.path.display(),
                error = %e,
                "Failed to remove workspace"
            );
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    workspace = %self.path.display(),
                    error = %e,
                    "Failed to remove workspace on drop"
                );
            }
        }
    }
}
