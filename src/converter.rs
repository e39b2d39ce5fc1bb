//! Core conversion service
//!
//! Shepherds one submission through the whole pipeline: workspace, tool
//! invocation, publication, and later identifier-gated retrieval. Requests
//! are fully independent of each other; the only shared resource is the
//! publish store, where distinct identifier-derived names keep concurrent
//! writes and evictions from racing.

use crate::config::Config;
use crate::error::{Error, Result, ToHttpStatus};
use crate::retention::{Resolution, RetentionRegistry};
use crate::tool::{CliConvertTool, ConvertTool};
use crate::types::{Capabilities, ConversionRequest, ConversionResult, Event};
use crate::workspace::Workspace;
use crate::{identifier, publisher};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// The document conversion service
///
/// Constructed once at startup and shared behind an [`Arc`]; all state the
/// hot path needs travels through this struct, never through globals.
pub struct DocumentConverter {
    /// Service configuration
    pub config: Arc<Config>,
    tool: Option<Arc<dyn ConvertTool>>,
    retention: RetentionRegistry,
    event_tx: broadcast::Sender<Event>,
    sweep_task: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for DocumentConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentConverter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl DocumentConverter {
    /// Create the service, preparing the publish store and workspace root
    ///
    /// The configuration is validated first; construction fails on settings
    /// that cannot work at runtime. The conversion tool is discovered from
    /// configuration; a missing tool is not fatal here, only for individual
    /// conversion requests.
    pub async fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);

        tokio::fs::create_dir_all(config.publish_dir()).await?;
        tokio::fs::create_dir_all(config.workspace_root()).await?;

        let tool = CliConvertTool::from_config(&config.conversion)
            .map(|tool| Arc::new(tool) as Arc<dyn ConvertTool>);
        match &tool {
            Some(tool) => info!(tool = tool.name(), "conversion tool configured"),
            None => warn!("no conversion tool found, conversion requests will fail"),
        }

        let retention =
            RetentionRegistry::new(config.publish_dir().clone(), config.retention_window());
        let sweep_task = config
            .retention
            .sweep_interval_secs
            .map(|secs| spawn_sweep(retention.clone(), Duration::from_secs(secs)));

        let (event_tx, _) = broadcast::channel(64);

        Ok(Self {
            config,
            tool,
            retention,
            event_tx,
            sweep_task,
        })
    }

    /// Replace the conversion tool implementation
    ///
    /// Used for embedding custom tools and for tests.
    pub fn with_tool(mut self, tool: Arc<dyn ConvertTool>) -> Self {
        self.tool = Some(tool);
        self
    }

    /// Subscribe to service events
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Probe whether the conversion tool is currently executable
    ///
    /// Advisory only: a conversion attempt right after a positive probe can
    /// still fail with `ToolUnavailable` if the tool disappeared in between.
    pub async fn tool_available(&self) -> bool {
        match &self.tool {
            Some(tool) => tool.available().await,
            None => false,
        }
    }

    /// Current service capabilities
    pub async fn capabilities(&self) -> Capabilities {
        Capabilities {
            tool_available: self.tool_available().await,
            tool_name: self.tool.as_ref().map(|tool| tool.name()),
            retention_minutes: self.config.retention.retention_minutes,
            default_target: self.config.conversion.default_target,
        }
    }

    /// Run one conversion end to end and publish the artifact
    ///
    /// The workspace is released on every exit path; the published artifact
    /// is the only thing that survives the call. Failures keep their
    /// classification (`ToolUnavailable`, `Conversion`, `Publish`) for the
    /// caller to map; none trigger an automatic retry here.
    pub async fn convert_document(&self, request: ConversionRequest) -> Result<ConversionResult> {
        let Some(tool) = self.tool.clone() else {
            return self.fail(Error::ToolUnavailable(
                "no conversion tool configured".to_string(),
            ));
        };

        let workspace = Workspace::create(self.config.workspace_root()).await?;
        let outcome = self.run_in_workspace(tool.as_ref(), &workspace, &request).await;
        workspace.release();

        match outcome {
            Ok(result) => {
                info!(
                    file_id = %result.file_id,
                    size_bytes = result.file_size,
                    target = ?request.target_format,
                    "conversion complete"
                );
                let _ = self.event_tx.send(Event::ConversionComplete {
                    file_id: result.file_id.clone(),
                    size_bytes: result.file_size,
                    at: Utc::now(),
                });
                Ok(result)
            }
            Err(e) => self.fail(e),
        }
    }

    /// Resolve an artifact identifier for download
    ///
    /// Validates the identifier syntax before any filesystem access, then
    /// delegates to the retention registry for the expiry decision.
    pub async fn resolve_artifact(&self, file_id: &str) -> Result<Resolution> {
        if !identifier::is_valid(file_id) {
            return Err(Error::InvalidIdentifier(file_id.to_string()));
        }

        let resolution = self.retention.resolve(file_id).await?;
        if matches!(resolution, Resolution::Expired) {
            let _ = self.event_tx.send(Event::ArtifactEvicted {
                file_id: file_id.to_string(),
            });
        }
        Ok(resolution)
    }

    /// Stop background work
    pub fn shutdown(&self) {
        if let Some(task) = &self.sweep_task {
            task.abort();
        }
        info!("conversion service shut down");
    }

    async fn run_in_workspace(
        &self,
        tool: &dyn ConvertTool,
        workspace: &Workspace,
        request: &ConversionRequest,
    ) -> Result<ConversionResult> {
        let input = workspace
            .write_input(&request.content, request.input_format)
            .await?;
        let output = tool
            .convert(&input, workspace.path(), request.target_format)
            .await?;
        let artifact =
            publisher::publish(&output, self.config.publish_dir(), request.target_format).await?;
        Ok(ConversionResult::published(&artifact))
    }

    fn fail(&self, error: Error) -> Result<ConversionResult> {
        warn!(code = error.error_code(), error = %error, "conversion failed");
        let _ = self.event_tx.send(Event::ConversionFailed {
            code: error.error_code().to_string(),
            reason: error.to_string(),
        });
        Err(error)
    }
}

/// Periodic retention sweep loop
fn spawn_sweep(registry: RetentionRegistry, interval: Duration) -> JoinHandle<()> {
    info!(interval_secs = interval.as_secs(), "starting retention sweep task");
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so startup stays quiet
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match registry.sweep().await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "retention sweep removed expired artifacts"),
                Err(e) => warn!(error = %e, "retention sweep failed"),
            }
        }
    })
}

/// Built-in sample document used when a submission carries no content
pub fn generate_sample_content() -> String {
    format!(
        "convertd conversion test document\n\n\
         Generated: {}\n\
         Host: {} / {}\n\n\
         Latin test: Hello World!\n\
         CJK test: \u{4f60}\u{597d}\u{4e16}\u{754c}\n\
         Digits: 1234567890\n",
        Utc::now().to_rfc3339(),
        std::env::consts::OS,
        std::env::consts::ARCH,
    )
}
