//! Core types and events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Format tag for submitted source content
///
/// The tag decides the extension of the single input file written into the
/// workspace; the conversion tool infers the source filter from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Plain UTF-8 text (default)
    #[default]
    Txt,
    /// Comma-separated values
    Csv,
    /// HTML markup
    Html,
}

impl InputFormat {
    /// File extension used for the workspace input file
    pub fn extension(&self) -> &'static str {
        match self {
            InputFormat::Txt => "txt",
            InputFormat::Csv => "csv",
            InputFormat::Html => "html",
        }
    }
}

/// Target format for a conversion request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    /// Portable Document Format (default)
    #[default]
    Pdf,
    /// HTML markup
    Html,
    /// OpenDocument text
    Odt,
}

impl TargetFormat {
    /// File extension of the produced artifact
    pub fn extension(&self) -> &'static str {
        match self {
            TargetFormat::Pdf => "pdf",
            TargetFormat::Html => "html",
            TargetFormat::Odt => "odt",
        }
    }

    /// MIME content type served for artifacts of this format
    pub fn content_type(&self) -> &'static str {
        match self {
            TargetFormat::Pdf => "application/pdf",
            TargetFormat::Html => "text/html",
            TargetFormat::Odt => "application/vnd.oasis.opendocument.text",
        }
    }

    /// Reverse lookup from an artifact file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "pdf" => Some(TargetFormat::Pdf),
            "html" => Some(TargetFormat::Html),
            "odt" => Some(TargetFormat::Odt),
            _ => None,
        }
    }
}

/// One document conversion submission
///
/// Ephemeral; exists only for the duration of a single
/// [`convert_document`](crate::converter::DocumentConverter::convert_document) call.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// Source content, written verbatim into the workspace input file
    pub content: String,
    /// Format tag of the source content
    pub input_format: InputFormat,
    /// Format the tool is asked to produce
    pub target_format: TargetFormat,
}

/// A published, downloadable conversion output
///
/// Lives in the publish store as `{file_id}.{ext}` until the retention window
/// elapses; identity is the filename.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Artifact {
    /// Opaque identifier the artifact is looked up by
    pub file_id: String,
    /// Filename inside the publish store (`{file_id}.{ext}`)
    pub file_name: String,
    /// Artifact size in bytes
    pub size_bytes: u64,
    /// Format of the artifact
    pub format: TargetFormat,
}

/// Immutable outcome record of one successful conversion
///
/// The original failure cases carry their classification in
/// [`Error`](crate::error::Error) instead, so this record is only built once
/// an artifact has actually been published.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ConversionResult {
    /// Whether the conversion and publication succeeded
    pub success: bool,
    /// Human-readable outcome message
    pub message: String,
    /// Published artifact filename
    pub output_file: String,
    /// Artifact size in bytes
    pub file_size: u64,
    /// Artifact identifier for download
    pub file_id: String,
}

impl ConversionResult {
    /// Build the success record for a freshly published artifact
    pub fn published(artifact: &Artifact) -> Self {
        Self {
            success: true,
            message: "Conversion successful".to_string(),
            output_file: artifact.file_name.clone(),
            file_size: artifact.size_bytes,
            file_id: artifact.file_id.clone(),
        }
    }
}

/// Service capabilities, reported by the `/info` endpoint
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Capabilities {
    /// Whether the external conversion tool answered the availability probe
    pub tool_available: bool,
    /// Name of the configured tool implementation, if any
    pub tool_name: Option<&'static str>,
    /// Retention window applied to every published artifact, in minutes
    pub retention_minutes: u64,
    /// Target format used when a submission names none
    pub default_target: TargetFormat,
}

/// Events emitted by the service
///
/// Consumers subscribe via
/// [`DocumentConverter::subscribe`](crate::converter::DocumentConverter::subscribe).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A conversion finished and its artifact was published
    ConversionComplete {
        /// Identifier of the published artifact
        file_id: String,
        /// Artifact size in bytes
        size_bytes: u64,
        /// When the artifact was published
        at: DateTime<Utc>,
    },
    /// A conversion failed before an artifact could be published
    ConversionFailed {
        /// Machine-readable failure classification
        code: String,
        /// Human-readable failure reason
        reason: String,
    },
    /// An expired artifact was deleted from the publish store
    ArtifactEvicted {
        /// Identifier of the evicted artifact
        file_id: String,
    },
}
