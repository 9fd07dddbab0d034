//! Configuration for pdfdrop.
//!
//! [`WorkspaceOptions`] holds the tunables of a workspace (file limit, how
//! long errors stay visible, the merged download's name). They can be read
//! from a JSON file; command-line flags override file values.
//! [`Config`] is the validated, normalized form of a command-line run.

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PdfDropError, Result};
use crate::intake::DEFAULT_MAX_FILES;
use crate::merge::DEFAULT_DOWNLOAD_NAME;
use crate::notice::DEFAULT_DISPLAY;
use crate::operation::Operation;

/// Tunables of a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkspaceOptions {
    /// Maximum number of staged files.
    pub max_files: usize,
    /// How long an error stays visible, in milliseconds.
    pub error_display_ms: u64,
    /// Name of the merged download.
    pub download_name: String,
}

impl Default for WorkspaceOptions {
    fn default() -> Self {
        Self {
            max_files: DEFAULT_MAX_FILES,
            error_display_ms: DEFAULT_DISPLAY.as_millis() as u64,
            download_name: DEFAULT_DOWNLOAD_NAME.to_string(),
        }
    }
}

impl WorkspaceOptions {
    /// Error display duration.
    pub fn error_display(&self) -> Duration {
        Duration::from_millis(self.error_display_ms)
    }

    /// Parse options from JSON. Missing fields take their defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use pdfdrop::config::WorkspaceOptions;
    ///
    /// let options = WorkspaceOptions::from_json(r#"{ "max_files": 4 }"#).unwrap();
    /// assert_eq!(options.max_files, 4);
    /// assert_eq!(options.download_name, "merged.pdf");
    /// ```
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let options: Self = serde_json::from_str(json).context("Malformed options file")?;
        options.check()?;
        Ok(options)
    }

    /// Read options from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDropError::InvalidConfig`] if the file cannot be read,
    /// is not valid JSON, or holds out-of-range values.
    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Cannot read options file {}", path.display()))?;

        let options = Self::from_json(&json)
            .with_context(|| format!("Invalid options file {}", path.display()))?;
        Ok(options)
    }

    /// Validate value ranges.
    pub fn validate(&self) -> Result<()> {
        self.check().map_err(PdfDropError::from)
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.max_files == 0 {
            bail!("max_files must be at least 1");
        }

        if self.error_display_ms == 0 {
            bail!("error_display_ms must be at least 1");
        }

        let name = self.download_name.trim();
        if name.is_empty() {
            bail!("download_name cannot be empty");
        }

        if name.contains(['/', '\\']) {
            bail!("download_name must be a plain file name: {name}");
        }

        Ok(())
    }
}

/// Validated configuration of a command-line run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input files or glob patterns, in order.
    pub inputs: Vec<PathBuf>,
    /// Directory receiving downloads.
    pub output_dir: PathBuf,
    /// Operation to run.
    pub operation: Option<Operation>,
    /// Workspace tunables.
    pub options: WorkspaceOptions,
    /// Show verbose output.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Print the final workspace state as JSON.
    pub json: bool,
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// - no inputs
    /// - `verbose` and `quiet` both set
    /// - out-of-range workspace options
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(PdfDropError::NoInputs);
        }

        if self.verbose && self.quiet {
            return Err(PdfDropError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        self.options.validate()
    }
}
