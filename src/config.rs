//! Configuration types for convertd

use crate::error::{Error, Result};
use crate::types::TargetFormat;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// Conversion behavior configuration (directories, tool discovery, timeout)
///
/// Groups settings related to how conversions are executed and where their
/// artifacts land. Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversionConfig {
    /// Publish store for downloadable artifacts (default: "./conversions")
    ///
    /// A single flat directory; the filenames are the entire catalog.
    #[serde(default = "default_publish_dir")]
    pub publish_dir: PathBuf,

    /// Root under which per-request workspaces are created (default: "./temp")
    #[serde(default = "default_workspace_root")]
    pub workspace_root: PathBuf,

    /// Path to the conversion tool executable (auto-detected if None)
    #[serde(default)]
    pub tool_path: Option<PathBuf>,

    /// Whether to search PATH for the tool if no explicit path is set (default: true)
    #[serde(default = "default_true")]
    pub search_path: bool,

    /// Maximum seconds a single tool invocation may run (default: 120)
    ///
    /// The child process is killed when the timeout elapses, so a stalled
    /// tool cannot pin a worker indefinitely.
    #[serde(default = "default_tool_timeout_secs")]
    pub tool_timeout_secs: u64,

    /// Target format used when a submission names none (default: pdf)
    #[serde(default)]
    pub default_target: TargetFormat,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            publish_dir: default_publish_dir(),
            workspace_root: default_workspace_root(),
            tool_path: None,
            search_path: true,
            tool_timeout_secs: default_tool_timeout_secs(),
            default_target: TargetFormat::default(),
        }
    }
}

/// Artifact retention configuration
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RetentionConfig {
    /// Minutes an artifact stays downloadable after publication (default: 30)
    ///
    /// Applied uniformly to every artifact; there is no per-artifact override.
    #[serde(default = "default_retention_minutes")]
    pub retention_minutes: u64,

    /// Interval in seconds for the background retention sweep (default: None)
    ///
    /// When unset, eviction happens only lazily on download access, matching
    /// the original behavior; storage then grows until an expired artifact is
    /// requested. Setting an interval bounds disk usage.
    #[serde(default)]
    pub sweep_interval_secs: Option<u64>,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            retention_minutes: default_retention_minutes(),
            sweep_interval_secs: None,
        }
    }
}

impl RetentionConfig {
    /// The retention window as a [`Duration`]
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.retention_minutes * 60)
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:8080)
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,

    /// Optional API key for authentication
    #[serde(default)]
    pub api_key: Option<String>,

    /// Enable CORS (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            api_key: None,
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// API and external server integration
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// Main configuration for the conversion service
///
/// Fields are organized into logical sub-configs:
/// - [`conversion`](ConversionConfig) — directories, tool discovery, timeout
/// - [`retention`](RetentionConfig) — artifact retention window and sweeping
/// - [`server`](ServerIntegrationConfig) — REST API integration
///
/// Sub-config fields are flattened so the JSON/TOML format stays flat.
/// The structure is built once at startup and passed by reference into each
/// component; nothing reads ambient global state on the hot path.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Conversion behavior settings
    #[serde(flatten)]
    pub conversion: ConversionConfig,

    /// Artifact retention settings
    #[serde(flatten)]
    pub retention: RetentionConfig,

    /// API and external server integration
    #[serde(flatten)]
    pub server: ServerIntegrationConfig,
}

// Convenience accessors — allow call sites to use `config.publish_dir()` etc.
// without reaching through the sub-config structs.
impl Config {
    /// Publish store directory
    pub fn publish_dir(&self) -> &PathBuf {
        &self.conversion.publish_dir
    }

    /// Workspace root directory
    pub fn workspace_root(&self) -> &PathBuf {
        &self.conversion.workspace_root
    }

    /// Retention window applied to published artifacts
    pub fn retention_window(&self) -> Duration {
        self.retention.window()
    }

    /// Tool invocation timeout
    pub fn tool_timeout(&self) -> Duration {
        Duration::from_secs(self.conversion.tool_timeout_secs)
    }

    /// Reject settings that cannot work at runtime
    ///
    /// Checked once at service construction; later reads assume a valid
    /// configuration.
    pub fn validate(&self) -> Result<()> {
        if self.conversion.tool_timeout_secs == 0 {
            return Err(Error::Config {
                message: "tool_timeout_secs must be greater than zero".into(),
                key: Some("tool_timeout_secs".into()),
            });
        }
        if self.server.api.cors_enabled
            && self
                .server
                .api
                .cors_origins
                .iter()
                .any(|origin| origin.trim().is_empty())
        {
            return Err(Error::Config {
                message: "cors_origins entries must not be empty".into(),
                key: Some("cors_origins".into()),
            });
        }
        Ok(())
    }
}

fn default_publish_dir() -> PathBuf {
    PathBuf::from("./conversions")
}

fn default_workspace_root() -> PathBuf {
    PathBuf::from("./temp")
}

fn default_tool_timeout_secs() -> u64 {
    120
}

fn default_retention_minutes() -> u64 {
    30
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8080))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_true() -> bool {
    true
}
