//! Artifact publication into the shared download store
//!
//! Publication is the single atomic step that makes a conversion output
//! externally visible. The output is copied (not moved) out of the workspace,
//! keeping workspace cleanup uniform across success and failure paths.

use crate::error::{Error, Result};
use crate::identifier;
use crate::types::{Artifact, TargetFormat};
use std::path::Path;
use tracing::debug;

/// Publish a workspace output file under a freshly generated identifier
///
/// The bytes land under a temporary name first and are renamed into place,
/// so a concurrent reader never observes a partially written artifact. The
/// staging name starts with a dot and therefore can never match another
/// identifier's `{id}.` prefix during a store scan.
pub async fn publish(
    output_path: &Path,
    publish_dir: &Path,
    format: TargetFormat,
) -> Result<Artifact> {
    let file_id = identifier::new_file_id();
    let file_name = format!("{file_id}.{}", format.extension());
    let staging = publish_dir.join(format!(".{file_id}.part"));
    let dest = publish_dir.join(&file_name);

    let size_bytes = tokio::fs::copy(output_path, &staging).await.map_err(|e| {
        Error::Publish(format!(
            "failed to copy {} into store: {e}",
            output_path.display()
        ))
    })?;

    if let Err(e) = tokio::fs::rename(&staging, &dest).await {
        // Leave no partial file behind if the rename itself failed
        tokio::fs::remove_file(&staging).await.ok();
        return Err(Error::Publish(format!(
            "failed to move artifact into place: {e}"
        )));
    }

    debug!(%file_id, size_bytes, "published artifact");
    Ok(Artifact {
        file_id,
        file_name,
        size_bytes,
        format,
    })
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::tempdir;

    async fn output_file(dir: &Path, content: &[u8]) -> std::path::PathBuf {
        let path = dir.join("input.pdf");
        tokio::fs::write(&path, content).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_publish_copies_bytes_exactly() {
        let ws = tempdir().unwrap();
        let store = tempdir().unwrap();
        let content = b"%PDF-1.4 pretend document body".to_vec();
        let output = output_file(ws.path(), &content).await;

        let artifact = publish(&output, store.path(), TargetFormat::Pdf)
            .await
            .unwrap();

        assert_eq!(artifact.size_bytes, content.len() as u64);
        assert_eq!(artifact.file_name, format!("{}.pdf", artifact.file_id));
        assert!(identifier::is_valid(&artifact.file_id));

        let stored = tokio::fs::read(store.path().join(&artifact.file_name))
            .await
            .unwrap();
        assert_eq!(stored, content, "copy step must not truncate or corrupt");

        // Source stays in place; cleanup is the workspace's job
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_publish_leaves_no_staging_file() {
        let ws = tempdir().unwrap();
        let store = tempdir().unwrap();
        let output = output_file(ws.path(), b"bytes").await;

        publish(&output, store.path(), TargetFormat::Pdf)
            .await
            .unwrap();

        let mut entries = tokio::fs::read_dir(store.path()).await.unwrap();
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let name = entry.file_name().to_string_lossy().to_string();
            assert!(
                !name.ends_with(".part"),
                "staging file left behind: {name}"
            );
        }
    }

    #[tokio::test]
    async fn test_publish_into_missing_store_fails() {
        let ws = tempdir().unwrap();
        let output = output_file(ws.path(), b"bytes").await;

        let err = publish(&output, Path::new("/nonexistent/store"), TargetFormat::Pdf)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Publish(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_concurrent_publishes_get_distinct_identifiers() {
        let ws = tempdir().unwrap();
        let store = tempdir().unwrap();
        let output = output_file(ws.path(), b"shared source").await;

        let mut tasks = tokio::task::JoinSet::new();
        for _ in 0..32 {
            let output = output.clone();
            let store_dir = store.path().to_path_buf();
            tasks.spawn(async move { publish(&output, &store_dir, TargetFormat::Pdf).await });
        }

        let mut ids = HashSet::new();
        while let Some(result) = tasks.join_next().await {
            let artifact = result.unwrap().unwrap();
            ids.insert(artifact.file_id);
        }
        assert_eq!(ids.len(), 32, "concurrent publishes must not collide");
    }
}
