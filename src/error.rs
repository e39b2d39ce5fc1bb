//! Error types for convertd
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (conversion, publication, retrieval)
//! - HTTP status code mapping for API integration
//! - Structured error responses with machine-readable error codes

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type alias for convertd operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for convertd
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "publish_dir")
        key: Option<String>,
    },

    /// The external conversion tool cannot be executed.
    ///
    /// Fatal for the request, not for the process. Also produced when a stale
    /// availability probe is contradicted by the actual conversion attempt.
    #[error("conversion tool unavailable: {0}")]
    ToolUnavailable(String),

    /// The conversion ran but did not produce a usable artifact
    #[error("conversion failed: {0}")]
    Conversion(#[from] ConversionError),

    /// Copying the output file into the publish store failed
    #[error("failed to publish artifact: {0}")]
    Publish(String),

    /// Caller-supplied artifact identifier fails the `[a-zA-Z0-9_]+` syntax check
    #[error("invalid artifact identifier: {0:?}")]
    InvalidIdentifier(String),

    /// No artifact in the publish store matches the identifier
    #[error("artifact {0} not found")]
    ArtifactNotFound(String),

    /// The artifact aged past the retention window and has been evicted
    #[error("artifact {0} has expired")]
    ArtifactExpired(String),

    /// I/O failure while streaming artifact bytes to the client
    #[error("streaming failed: {0}")]
    Streaming(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// API server error
    #[error("API server error: {0}")]
    ApiServerError(String),
}

/// Conversion outcome classification for a launched tool process
///
/// A zero exit code alone never proves success: the expected output file must
/// exist as well, otherwise the outcome is [`ConversionError::OutputMissing`].
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The tool exited with a non-zero status
    #[error("conversion tool exited with code {code}")]
    NonZeroExit {
        /// The tool's exit code (-1 if terminated by a signal)
        code: i32,
    },

    /// The tool exited cleanly but the expected output file is absent
    #[error("conversion produced no output at {expected}")]
    OutputMissing {
        /// The deterministically derived output path that was expected
        expected: PathBuf,
    },

    /// The tool ran past the configured timeout and was killed
    #[error("conversion timed out after {timeout_secs}s")]
    TimedOut {
        /// The timeout that elapsed, in seconds
        timeout_secs: u64,
    },
}

/// API error response format
///
/// This structure is returned by API endpoints when an error occurs.
/// It follows a standard format with machine-readable error codes,
/// human-readable messages, and optional contextual details.
///
/// # Example JSON Response
///
/// ```json
/// {
///   "error": {
///     "code": "artifact_expired",
///     "message": "artifact conv_1712345678_ab12cd has expired",
///     "details": {
///       "file_id": "conv_1712345678_ab12cd"
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// The error details
    pub error: ErrorDetail,
}

/// Detailed error information for API responses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "artifact_not_found", "validation_error")
    ///
    /// Clients can use this for programmatic error handling.
    pub code: String,

    /// Human-readable error message
    ///
    /// This is suitable for displaying to end users.
    pub message: String,

    /// Optional additional context about the error
    ///
    /// This can include fields like file_id, expected paths, exit codes, etc.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error with code and message
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    /// Create a "validation error" error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new("validation_error", message)
    }
}

/// Convert errors to HTTP status codes for API responses
///
/// This trait maps domain errors to appropriate HTTP status codes.
pub trait ToHttpStatus {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> u16;

    /// Get the machine-readable error code
    fn error_code(&self) -> &str;
}

impl ToHttpStatus for Error {
    fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - Client error (invalid input)
            Error::Config { .. } => 400,
            Error::InvalidIdentifier(_) => 400,

            // 404 Not Found
            Error::ArtifactNotFound(_) => 404,

            // 410 Gone - Existed once, evicted after the retention window
            Error::ArtifactExpired(_) => 410,

            // 500 Internal Server Error - Server-side issues
            Error::Conversion(_) => 500,
            Error::Publish(_) => 500,
            Error::Streaming(_) => 500,
            Error::Io(_) => 500,
            Error::Serialization(_) => 500,
            Error::ApiServerError(_) => 500,

            // 503 Service Unavailable - External dependency missing
            Error::ToolUnavailable(_) => 503,
        }
    }

    fn error_code(&self) -> &str {
        match self {
            Error::Config { .. } => "config_error",
            Error::ToolUnavailable(_) => "tool_unavailable",
            Error::Conversion(e) => match e {
                ConversionError::NonZeroExit { .. } => "non_zero_exit",
                ConversionError::OutputMissing { .. } => "output_missing",
                ConversionError::TimedOut { .. } => "conversion_timeout",
            },
            Error::Publish(_) => "publish_failed",
            Error::InvalidIdentifier(_) => "invalid_identifier",
            Error::ArtifactNotFound(_) => "artifact_not_found",
            Error::ArtifactExpired(_) => "artifact_expired",
            Error::Streaming(_) => "streaming_failed",
            Error::Io(_) => "io_error",
            Error::Serialization(_) => "serialization_error",
            Error::ApiServerError(_) => "api_server_error",
        }
    }
}

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        let code = error.error_code().to_string();
        let message = error.to_string();

        // Add contextual details for specific error types
        let details = match &error {
            Error::Conversion(ConversionError::NonZeroExit { code }) => Some(serde_json::json!({
                "exit_code": code,
            })),
            Error::Conversion(ConversionError::OutputMissing { expected }) => {
                Some(serde_json::json!({
                    "expected": expected,
                }))
            }
            Error::Conversion(ConversionError::TimedOut { timeout_secs }) => {
                Some(serde_json::json!({
                    "timeout_secs": timeout_secs,
                }))
            }
            Error::ArtifactNotFound(file_id) | Error::ArtifactExpired(file_id) => {
                Some(serde_json::json!({
                    "file_id": file_id,
                }))
            }
            _ => None,
        };

        ApiError {
            error: ErrorDetail {
                code,
                message,
                details,
            },
        }
    }
}
