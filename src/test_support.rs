//! Test doubles shared by module and API tests

use crate::config::Config;
use crate::error::{ConversionError, Error, Result};
use crate::tool::ConvertTool;
use crate::types::TargetFormat;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Config rooted under a test-owned directory, with tool discovery disabled
///
/// Discovery is off so tests control the tool through
/// [`DocumentConverter::with_tool`](crate::converter::DocumentConverter::with_tool)
/// instead of whatever happens to be installed on the host.
pub(crate) fn test_config(base: &Path) -> Config {
    let mut config = Config::default();
    config.conversion.publish_dir = base.join("store");
    config.conversion.workspace_root = base.join("temp");
    config.conversion.search_path = false;
    config
}

/// Scripted outcome for a [`FakeTool`] conversion call
pub(crate) enum FakeBehavior {
    /// Write `payload` to the expected output path and succeed
    Succeed {
        /// Bytes written as the conversion output
        payload: Vec<u8>,
    },
    /// Fail as if the tool exited with this code
    ExitCode(i32),
    /// Report success without producing the output file
    ProduceNothing,
    /// Fail as if the binary could not be launched
    Unavailable,
}

/// In-process [`ConvertTool`] with scripted behavior
pub(crate) struct FakeTool {
    /// Answer of the availability probe
    pub probe_available: bool,
    /// What `convert` does
    pub behavior: FakeBehavior,
}

impl FakeTool {
    /// A tool that always succeeds with a small fake PDF payload
    pub fn succeeding() -> Self {
        Self {
            probe_available: true,
            behavior: FakeBehavior::Succeed {
                payload: b"%PDF-1.4 fake artifact".to_vec(),
            },
        }
    }
}

#[async_trait]
impl ConvertTool for FakeTool {
    async fn available(&self) -> bool {
        self.probe_available
    }

    async fn convert(
        &self,
        input: &Path,
        out_dir: &Path,
        target: TargetFormat,
    ) -> Result<PathBuf> {
        let stem = input.file_stem().unwrap_or_default();
        let expected = out_dir.join(stem).with_extension(target.extension());

        match &self.behavior {
            FakeBehavior::Succeed { payload } => {
                tokio::fs::write(&expected, payload).await?;
                Ok(expected)
            }
            FakeBehavior::ExitCode(code) => {
                Err(ConversionError::NonZeroExit { code: *code }.into())
            }
            FakeBehavior::ProduceNothing => {
                Err(ConversionError::OutputMissing { expected }.into())
            }
            FakeBehavior::Unavailable => {
                Err(Error::ToolUnavailable("fake tool offline".to_string()))
            }
        }
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}
