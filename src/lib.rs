//! # convertd
//!
//! Backend library for a document conversion service built around an external
//! LibreOffice-compatible tool.
//!
//! ## Design Philosophy
//!
//! convertd is designed to be:
//! - **Library-first** - The REST API is a thin layer over an embeddable service
//! - **Sensible defaults** - Works out of the box with zero configuration
//! - **Stateless on disk** - Published filenames are the entire artifact catalog
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use convertd::{Config, DocumentConverter, types::ConversionRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = DocumentConverter::new(Config::default()).await?;
//!
//!     let result = converter
//!         .convert_document(ConversionRequest {
//!             content: "Hello World!".to_string(),
//!             input_format: Default::default(),
//!             target_format: Default::default(),
//!         })
//!         .await?;
//!
//!     println!("published {} ({} bytes)", result.file_id, result.file_size);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Core conversion service
pub mod converter;
/// Error types
pub mod error;
/// Artifact identifier generation and validation
pub mod identifier;
/// Artifact publication into the download store
pub mod publisher;
/// Artifact retention and eviction
pub mod retention;
/// External conversion tool invocation
pub mod tool;
/// Core types and events
pub mod types;
/// Per-request conversion workspaces
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use config::Config;
pub use converter::DocumentConverter;
pub use error::{ApiError, ConversionError, Error, ErrorDetail, Result, ToHttpStatus};
pub use retention::{Resolution, RetentionRegistry};
pub use tool::{CliConvertTool, ConvertTool};
pub use types::{
    Artifact, Capabilities, ConversionRequest, ConversionResult, Event, InputFormat, TargetFormat,
};
pub use workspace::Workspace;

use std::sync::Arc;

/// Helper function to run the service with graceful signal handling.
///
/// Waits for a termination signal and then calls the converter's `shutdown()` method.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use convertd::{Config, DocumentConverter, run_with_shutdown};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Arc::new(Config::default());
///     let converter = Arc::new(DocumentConverter::new((*config).clone()).await?);
///
///     tokio::spawn({
///         let converter = converter.clone();
///         let config = config.clone();
///         async move { convertd::api::start_api_server(converter, config).await }
///     });
///
///     run_with_shutdown(converter).await?;
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(converter: Arc<DocumentConverter>) -> Result<()> {
    wait_for_signal().await;
    converter.shutdown();
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Set up signal handlers - these may fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
