//! Time-based artifact retention and eviction
//!
//! Publication time is tracked implicitly through filesystem modification
//! time; there is no index beyond the store directory listing. Eviction is
//! lazy: every resolve checks age and deletes what has aged out. An optional
//! background sweep bounds disk usage when nobody requests expired files.

use crate::error::Result;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of resolving an identifier against the publish store
#[derive(Debug)]
pub enum Resolution {
    /// Artifact exists and is within its retention window
    Fresh(PathBuf),
    /// Artifact existed but aged out; it has been deleted
    Expired,
    /// No artifact matches the identifier
    NotFound,
}

/// Tracks published artifacts and evicts them past the retention window
///
/// Cheap to clone; holds only the store path and the window.
#[derive(Clone)]
pub struct RetentionRegistry {
    publish_dir: PathBuf,
    window: Duration,
}

impl RetentionRegistry {
    /// Create a registry over `publish_dir` with a fixed retention window
    pub fn new(publish_dir: PathBuf, window: Duration) -> Self {
        Self {
            publish_dir,
            window,
        }
    }

    /// Resolve a syntactically valid identifier to an artifact path
    ///
    /// Deletion happens before `Expired` is reported, so a client is never
    /// told "expired" about a file that could still be fetched, and a second
    /// resolve of the same identifier reports `NotFound`.
    pub async fn resolve(&self, file_id: &str) -> Result<Resolution> {
        let matches = self.matching_files(file_id).await?;
        let Some(path) = matches.first().cloned() else {
            return Ok(Resolution::NotFound);
        };

        if matches.len() > 1 {
            // One artifact per identifier is an invariant of the publisher;
            // more than one match means something else wrote into the store.
            warn!(
                file_id,
                count = matches.len(),
                "multiple artifacts match one identifier, using the first"
            );
        }

        let meta = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta,
            // Lost a race with another eviction; same answer either way
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Resolution::NotFound),
            Err(e) => return Err(e.into()),
        };

        let age = meta.modified()?.elapsed().unwrap_or_default();
        if age > self.window {
            self.evict(&path, file_id).await;
            return Ok(Resolution::Expired);
        }

        Ok(Resolution::Fresh(path))
    }

    /// Delete every artifact past the retention window
    ///
    /// Companion to lazy eviction for bounded disk usage; wired to a periodic
    /// task when `sweep_interval_secs` is configured. Returns the number of
    /// artifacts removed.
    pub async fn sweep(&self) -> Result<usize> {
        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.publish_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                Err(_) => continue,
            };
            if !meta.is_file() {
                continue;
            }

            let age = match meta.modified() {
                Ok(mtime) => mtime.elapsed().unwrap_or_default(),
                Err(_) => continue,
            };
            if age > self.window {
                let path = entry.path();
                match tokio::fs::remove_file(&path).await {
                    Ok(()) => removed += 1,
                    Err(e) if e.kind() == ErrorKind::NotFound => {}
                    Err(e) => warn!(?path, error = %e, "failed to sweep expired artifact"),
                }
            }
        }

        Ok(removed)
    }

    /// All store files whose name starts with `{file_id}.`
    ///
    /// The prefix scan tolerates unknown extensions; sorting keeps the
    /// multi-match case deterministic.
    async fn matching_files(&self, file_id: &str) -> Result<Vec<PathBuf>> {
        let prefix = format!("{file_id}.");
        let mut matches = Vec::new();

        let mut entries = tokio::fs::read_dir(&self.publish_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with(&prefix))
            {
                matches.push(entry.path());
            }
        }

        matches.sort();
        Ok(matches)
    }

    async fn evict(&self, path: &Path, file_id: &str) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => info!(file_id, ?path, "evicted expired artifact"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(file_id, ?path, error = %e, "failed to evict expired artifact"),
        }
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const WINDOW: Duration = Duration::from_secs(30 * 60);

    async fn store_with(files: &[&str]) -> tempfile::TempDir {
        let store = tempdir().unwrap();
        for name in files {
            tokio::fs::write(store.path().join(name), b"artifact bytes")
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_resolve_fresh_artifact() {
        let store = store_with(&["conv_1_abc.pdf"]).await;
        let registry = RetentionRegistry::new(store.path().to_path_buf(), WINDOW);

        match registry.resolve("conv_1_abc").await.unwrap() {
            Resolution::Fresh(path) => {
                assert_eq!(path, store.path().join("conv_1_abc.pdf"));
            }
            other => panic!("expected Fresh, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_unknown_identifier() {
        let store = store_with(&["conv_1_abc.pdf"]).await;
        let registry = RetentionRegistry::new(store.path().to_path_buf(), WINDOW);

        assert!(matches!(
            registry.resolve("conv_2_xyz").await.unwrap(),
            Resolution::NotFound
        ));
    }

    #[tokio::test]
    async fn test_prefix_match_requires_dot() {
        // "conv_1" must not resolve to "conv_10_abc.pdf"
        let store = store_with(&["conv_10_abc.pdf"]).await;
        let registry = RetentionRegistry::new(store.path().to_path_buf(), WINDOW);

        assert!(matches!(
            registry.resolve("conv_1").await.unwrap(),
            Resolution::NotFound
        ));
        assert!(matches!(
            registry.resolve("conv_10_abc").await.unwrap(),
            Resolution::Fresh(_)
        ));
    }

    #[tokio::test]
    async fn test_expired_artifact_is_deleted_then_not_found() {
        let store = store_with(&["conv_1_abc.pdf"]).await;
        // Zero window: everything already published has aged out
        let registry = RetentionRegistry::new(store.path().to_path_buf(), Duration::ZERO);

        assert!(matches!(
            registry.resolve("conv_1_abc").await.unwrap(),
            Resolution::Expired
        ));
        assert!(
            !store.path().join("conv_1_abc.pdf").exists(),
            "file must be gone after the first expired resolve"
        );

        // Idempotence: every later resolve reports NotFound
        for _ in 0..2 {
            assert!(matches!(
                registry.resolve("conv_1_abc").await.unwrap(),
                Resolution::NotFound
            ));
        }
    }

    #[tokio::test]
    async fn test_multiple_matches_resolve_to_first_sorted() {
        let store = store_with(&["conv_1_abc.pdf", "conv_1_abc.html"]).await;
        let registry = RetentionRegistry::new(store.path().to_path_buf(), WINDOW);

        match registry.resolve("conv_1_abc").await.unwrap() {
            Resolution::Fresh(path) => {
                // Deterministic: lexicographically first wins
                assert_eq!(path, store.path().join("conv_1_abc.html"));
            }
            other => panic!("expected Fresh, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired() {
        let store = store_with(&["conv_1_abc.pdf", "conv_2_def.pdf"]).await;

        let expired = RetentionRegistry::new(store.path().to_path_buf(), Duration::ZERO);
        assert_eq!(expired.sweep().await.unwrap(), 2);
        assert_eq!(expired.sweep().await.unwrap(), 0);

        let store = store_with(&["conv_3_ghi.pdf"]).await;
        let fresh = RetentionRegistry::new(store.path().to_path_buf(), WINDOW);
        assert_eq!(fresh.sweep().await.unwrap(), 0);
        assert!(store.path().join("conv_3_ghi.pdf").exists());
    }
}
