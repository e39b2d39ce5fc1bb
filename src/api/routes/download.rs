//! Artifact download handler.

use super::DownloadQuery;
use crate::api::AppState;
use crate::error::Error;
use crate::retention::Resolution;
use crate::types::TargetFormat;
use axum::{
    body::Body,
    extract::{Query, State},
    http::{StatusCode, header},
    response::Response,
};
use std::io::ErrorKind;
use std::path::Path;
use tokio_util::io::ReaderStream;
use tracing::debug;

/// Filename stem presented to the client in Content-Disposition
const DOWNLOAD_FILE_STEM: &str = "converted_document";

/// GET /download?file={id} - Stream a published artifact
///
/// The identifier is validated before any store access; traversal-shaped
/// values are rejected without touching the filesystem. Served filenames are
/// fixed to a generic stem so store-internal names never leak to clients.
#[utoipa::path(
    get,
    path = "/download",
    tag = "download",
    params(
        ("file" = String, Query, description = "Artifact identifier from a previous conversion")
    ),
    responses(
        (status = 200, description = "Artifact bytes as attachment", content_type = "application/octet-stream"),
        (status = 400, description = "Syntactically invalid identifier", body = crate::error::ApiError),
        (status = 404, description = "No artifact matches the identifier", body = crate::error::ApiError),
        (status = 410, description = "Artifact expired and was evicted", body = crate::error::ApiError)
    ),
    security(
        ("api_key" = [])
    )
)]
pub async fn download_artifact(
    State(state): State<AppState>,
    Query(query): Query<DownloadQuery>,
) -> Result<Response, Error> {
    match state.converter.resolve_artifact(&query.file).await? {
        Resolution::Fresh(path) => stream_artifact(&path, &query.file).await,
        Resolution::Expired => Err(Error::ArtifactExpired(query.file)),
        Resolution::NotFound => Err(Error::ArtifactNotFound(query.file)),
    }
}

/// Build a streaming attachment response for an on-disk artifact
///
/// The file is opened before any response line is committed, so open
/// failures still produce a clean error status instead of a broken stream.
async fn stream_artifact(path: &Path, file_id: &str) -> Result<Response, Error> {
    let extension = path.extension().and_then(|ext| ext.to_str());
    let (content_type, filename) = match extension.and_then(TargetFormat::from_extension) {
        Some(format) => (
            format.content_type(),
            format!("{DOWNLOAD_FILE_STEM}.{}", format.extension()),
        ),
        None => ("application/octet-stream", DOWNLOAD_FILE_STEM.to_string()),
    };

    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        // Evicted between resolve and open; report it as missing
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::ArtifactNotFound(file_id.to_string()));
        }
        Err(e) => return Err(Error::Streaming(e.to_string())),
    };
    let size = file.metadata().await.map(|meta| meta.len()).ok();

    debug!(file_id, ?size, content_type, "streaming artifact");

    let stream = ReaderStream::new(file);
    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        );
    if let Some(size) = size {
        response = response.header(header::CONTENT_LENGTH, size);
    }

    response
        .body(Body::from_stream(stream))
        .map_err(|e| Error::Streaming(e.to_string()))
}
