//! Per-request conversion workspaces
//!
//! Every conversion gets its own scratch directory holding exactly one input
//! file and, on success, the tool's output. The directory never outlives the
//! conversion call and is never shared between requests, so no locking
//! discipline is needed around it.

use crate::error::Result;
use crate::types::InputFormat;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, warn};

/// Isolated scratch directory exclusively owned by one in-flight conversion
///
/// The directory name comes from the tempfile primitive, not from the artifact
/// identifier, so live workspaces cannot collide. [`Workspace::release`]
/// removes the directory recursively; the `TempDir` drop guard covers panic
/// and early-return paths so the directory is gone on every exit path.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a fresh uniquely-named workspace under `root`
    ///
    /// The root itself is created if missing.
    pub async fn create(root: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(root).await?;

        let dir = tempfile::Builder::new()
            .prefix("convert-")
            .tempdir_in(root)?;

        debug!(path = ?dir.path(), "created workspace");
        Ok(Self { dir })
    }

    /// Path of the workspace directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write the request content verbatim as the single input file
    ///
    /// Returns the path of the written file (`input.{ext}`).
    pub async fn write_input(&self, content: &str, format: InputFormat) -> Result<PathBuf> {
        let input = self.dir.path().join(format!("input.{}", format.extension()));
        tokio::fs::write(&input, content.as_bytes()).await?;
        Ok(input)
    }

    /// Remove the workspace and everything in it
    ///
    /// Removal failure is a housekeeping problem, not a conversion failure:
    /// it is logged and absorbed, never surfaced to the caller.
    pub fn release(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(e) = self.dir.close() {
            warn!(path = ?path, error = %e, "failed to remove workspace directory");
        } else {
            debug!(path = ?path, "released workspace");
        }
    }
}
