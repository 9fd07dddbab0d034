//! Error types for pdfdrop.
//!
//! Errors fall into two groups:
//!
//! - **Validation errors**: detected before any processing (too many files,
//!   wrong file count for an operation, no operation selected). Their
//!   `Display` text is the exact banner message shown to the user.
//! - **Processing errors**: anything that goes wrong while merging. These are
//!   collapsed into one generic banner message; the underlying
//!   [`MergeError`] stays reachable through `source()` for logging.

use std::io;
use std::path::PathBuf;

use crate::merge::MergeError;

/// Result type alias for pdfdrop operations.
pub type Result<T> = std::result::Result<T, PdfDropError>;

/// Main error type for pdfdrop.
#[derive(Debug, thiserror::Error)]
pub enum PdfDropError {
    /// A batch would push the working set past its limit.
    #[error("You can only add up to {limit} files")]
    TooManyFiles {
        /// Maximum number of staged files.
        limit: usize,
    },

    /// Continue was requested without an operation.
    #[error("Please select a PDF operation first")]
    NoOperationSelected,

    /// Merge needs at least two staged files.
    #[error("Please add at least 2 PDFs to merge")]
    NotEnoughToMerge,

    /// Split accepts a single file.
    #[error("Split operation only accepts one PDF file")]
    SplitTakesOne,

    /// Compress accepts a single file.
    #[error("Compress operation only accepts one PDF file")]
    CompressTakesOne,

    /// The merge failed; the cause is diagnostic only.
    #[error("Error merging PDFs. Please try again.")]
    MergeFailed(#[source] MergeError),

    /// An operation is already running on this workspace.
    #[error("An operation is already in progress")]
    Busy,

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// An input file could not be read from disk.
    #[error("Failed to read input file: {}\n  Reason: {source}", path.display())]
    FailedToReadInput {
        /// Path of the input file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// No input files matched the given arguments.
    #[error("No input files specified")]
    NoInputs,

    #[error("Failed to process glob entry: {0}")]
    GlobEntry(#[from] glob::GlobError),

    #[error("Invalid glob pattern: {0}")]
    GlobPattern(#[from] glob::PatternError),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<anyhow::Error> for PdfDropError {
    fn from(err: anyhow::Error) -> Self {
        Self::invalid_config(format!("{err:#}"))
    }
}

impl From<MergeError> for PdfDropError {
    fn from(err: MergeError) -> Self {
        Self::MergeFailed(err)
    }
}

impl PdfDropError {
    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Whether this error was raised before any processing started.
    ///
    /// Validation errors leave the workspace untouched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::TooManyFiles { .. }
                | Self::NoOperationSelected
                | Self::NotEnoughToMerge
                | Self::SplitTakesOne
                | Self::CompressTakesOne
        )
    }

    /// Whether this error is meant for the workspace's error banner.
    pub fn is_user_facing(&self) -> bool {
        self.is_validation() || matches!(self, Self::MergeFailed(_))
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::TooManyFiles { .. } => 1,
            Self::NoOperationSelected => 1,
            Self::NotEnoughToMerge => 1,
            Self::SplitTakesOne => 1,
            Self::CompressTakesOne => 1,
            Self::MergeFailed(_) => 6,
            Self::Busy => 1,
            Self::InvalidConfig { .. } => 1,
            Self::FailedToReadInput { .. } => 2,
            Self::NoInputs => 1,
            Self::GlobEntry(_) => 2,
            Self::GlobPattern(_) => 1,
            Self::Io(_) => 5,
        }
    }
}
