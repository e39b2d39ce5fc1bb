//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`convert`] — Document submission and conversion
//! - [`download`] — Artifact retrieval
//! - [`system`] — Health, runtime info, OpenAPI

use crate::types::{InputFormat, TargetFormat};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod convert;
mod download;
mod system;

// Re-export all handlers so `routes::function_name` continues to work
pub use convert::*;
pub use download::*;
pub use system::*;

// ============================================================================
// Query/Request Types (shared across handlers)
// ============================================================================

/// Request body for POST /convert
///
/// Every field is optional; an empty or absent body converts a generated
/// sample document with the default formats.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ConvertRequestBody {
    /// Source content to convert. Defaults to a generated sample document.
    pub content: Option<String>,
    /// Format tag of the source content (default: txt)
    pub input_format: Option<InputFormat>,
    /// Target format to produce (default: configured default, normally pdf)
    pub target_format: Option<TargetFormat>,
}

/// Conversion metadata echoed back alongside a successful conversion
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ConversionInfo {
    /// Format the source content was interpreted as
    pub input_format: InputFormat,
    /// Format of the published artifact
    pub output_format: TargetFormat,
    /// Whether the conversion tool answered the availability probe
    pub tool_available: bool,
    /// Minutes the artifact stays downloadable
    pub retention_minutes: u64,
}

/// Response for POST /convert
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ConvertResponse {
    /// Always "success" (failures are reported as error responses)
    pub status: String,
    /// Human-readable outcome message
    pub message: String,
    /// Published artifact filename (`{file_id}.{ext}`)
    pub output_file: String,
    /// Artifact size in bytes
    pub file_size: u64,
    /// Opaque identifier to retrieve the artifact with
    pub file_id: String,
    /// Relative URL the artifact can be downloaded from
    pub download_url: String,
    /// Metadata about the performed conversion
    pub conversion_info: ConversionInfo,
    /// When the conversion completed
    pub timestamp: DateTime<Utc>,
}

/// Query parameters for GET /download
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct DownloadQuery {
    /// Artifact identifier returned by a previous conversion
    pub file: String,
}
