//! External conversion tool invocation
//!
//! The conversion tool is a black-box executable driven through a
//! LibreOffice-compatible command line contract:
//! `--headless --convert-to {fmt} --outdir {dir} {input}`.

use crate::config::ConversionConfig;
use crate::error::{ConversionError, Error, Result};
use crate::types::TargetFormat;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Abstraction over the external document conversion tool
#[async_trait]
pub trait ConvertTool: Send + Sync {
    /// Advisory probe of whether the tool can be executed at all
    ///
    /// Any launch failure, timeout, or non-zero exit counts as unavailable.
    /// The probe can go stale between check and use; [`ConvertTool::convert`]
    /// re-reports `ToolUnavailable` itself rather than trusting the probe.
    async fn available(&self) -> bool;

    /// Convert `input` into `out_dir`, producing `{input stem}.{target ext}`
    ///
    /// Blocks until the tool exits or the bounded timeout elapses. No retry
    /// is attempted here; retries are a policy decision of the caller.
    async fn convert(&self, input: &Path, out_dir: &Path, target: TargetFormat)
    -> Result<PathBuf>;

    /// Short name of the tool implementation
    fn name(&self) -> &'static str;
}

/// CLI-based tool driving a LibreOffice-compatible binary
///
/// # Examples
///
/// ```no_run
/// use convertd::tool::CliConvertTool;
/// use std::path::PathBuf;
/// use std::time::Duration;
///
/// // Create with explicit path
/// let tool = CliConvertTool::new(PathBuf::from("/usr/bin/soffice"), Duration::from_secs(120));
///
/// // Or auto-discover from PATH
/// let tool = CliConvertTool::from_path(Duration::from_secs(120))
///     .expect("soffice not found in PATH");
/// ```
pub struct CliConvertTool {
    binary_path: PathBuf,
    timeout: Duration,
}

/// Binary names probed in PATH, in order of preference
const BINARY_NAMES: [&str; 2] = ["soffice", "libreoffice"];

impl CliConvertTool {
    /// Create a new CLI tool with an explicit binary path
    pub fn new(binary_path: PathBuf, timeout: Duration) -> Self {
        Self {
            binary_path,
            timeout,
        }
    }

    /// Attempt to find a conversion binary in PATH
    ///
    /// Returns `Some(CliConvertTool)` for the first of `soffice`/`libreoffice`
    /// found, `None` otherwise.
    pub fn from_path(timeout: Duration) -> Option<Self> {
        BINARY_NAMES
            .iter()
            .find_map(|name| which::which(name).ok())
            .map(|path| Self::new(path, timeout))
    }

    /// Build a tool from configuration: explicit path first, then PATH search
    pub fn from_config(config: &ConversionConfig) -> Option<Self> {
        let timeout = Duration::from_secs(config.tool_timeout_secs);
        if let Some(path) = &config.tool_path {
            return Some(Self::new(path.clone(), timeout));
        }
        if config.search_path {
            Self::from_path(timeout)
        } else {
            None
        }
    }

    /// Expected output path for an input file and target format
    ///
    /// Same base name as the input, new extension, in the output directory.
    fn expected_output(input: &Path, out_dir: &Path, target: TargetFormat) -> PathBuf {
        let stem = input.file_stem().unwrap_or(input.as_os_str());
        let mut expected = out_dir.join(stem);
        expected.set_extension(target.extension());
        expected
    }
}

#[async_trait]
impl ConvertTool for CliConvertTool {
    async fn available(&self) -> bool {
        let probe = Command::new(&self.binary_path)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status();

        match tokio::time::timeout(self.timeout, probe).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(e)) => {
                debug!(binary = ?self.binary_path, error = %e, "tool probe failed to launch");
                false
            }
            Err(_) => {
                warn!(binary = ?self.binary_path, "tool probe timed out");
                false
            }
        }
    }

    async fn convert(
        &self,
        input: &Path,
        out_dir: &Path,
        target: TargetFormat,
    ) -> Result<PathBuf> {
        let expected = Self::expected_output(input, out_dir, target);

        let mut child = Command::new(&self.binary_path)
            .arg("--headless")
            .arg("--convert-to")
            .arg(target.extension())
            .arg("--outdir")
            .arg(out_dir)
            .arg(input)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                Error::ToolUnavailable(format!(
                    "failed to launch {}: {e}",
                    self.binary_path.display()
                ))
            })?;

        let status = match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(status) => status?,
            Err(_) => {
                warn!(
                    ?input,
                    timeout_secs = self.timeout.as_secs(),
                    "conversion timed out, killing tool process"
                );
                child.kill().await.ok();
                return Err(ConversionError::TimedOut {
                    timeout_secs: self.timeout.as_secs(),
                }
                .into());
            }
        };

        if !status.success() {
            return Err(ConversionError::NonZeroExit {
                code: status.code().unwrap_or(-1),
            }
            .into());
        }

        // A zero exit code is necessary but not sufficient; the tool may
        // still have produced nothing usable.
        match tokio::fs::metadata(&expected).await {
            Ok(meta) if meta.is_file() => {
                debug!(output = ?expected, size_bytes = meta.len(), "conversion produced output");
                Ok(expected)
            }
            _ => Err(ConversionError::OutputMissing { expected }.into()),
        }
    }

    fn name(&self) -> &'static str {
        "cli-soffice"
    }
}
