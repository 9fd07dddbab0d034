//! The PDF operations a workspace can be asked to perform.
//!
//! The selected operation is supplied by whoever hosts the workspace (a page
//! shell, the CLI) as one of the literals `merge-pdf`, `split-pdf`,
//! `compress-pdf` or `convert-pdf`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{PdfDropError, Result};

/// Prompt shown on the drop zone when no operation is selected.
pub const DEFAULT_PROMPT: &str = "Select a PDF operation above";

/// A PDF operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Concatenate all staged files into one document.
    #[serde(rename = "merge-pdf")]
    Merge,
    /// Split a single document.
    #[serde(rename = "split-pdf")]
    Split,
    /// Compress a single document.
    #[serde(rename = "compress-pdf")]
    Compress,
    /// Convert staged files to PDF.
    #[serde(rename = "convert-pdf")]
    Convert,
}

impl Operation {
    /// All operations, in display order.
    pub const ALL: [Operation; 4] = [
        Operation::Merge,
        Operation::Split,
        Operation::Compress,
        Operation::Convert,
    ];

    /// The literal used by the hosting page for this operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Merge => "merge-pdf",
            Self::Split => "split-pdf",
            Self::Compress => "compress-pdf",
            Self::Convert => "convert-pdf",
        }
    }

    /// Drop-zone prompt for this operation.
    pub fn prompt(&self) -> &'static str {
        match self {
            Self::Merge => "Drag and drop your PDFs to merge them",
            Self::Split => "Drag and drop your PDF to split it",
            Self::Compress => "Drag and drop your PDF to compress it",
            Self::Convert => "Drag and drop your files to convert them to PDF",
        }
    }

    /// Drop-zone prompt for an optional selection.
    pub fn drop_prompt(selected: Option<Operation>) -> &'static str {
        selected.map_or(DEFAULT_PROMPT, |op| op.prompt())
    }

    /// Check the operation's constraint on the number of staged files.
    ///
    /// # Errors
    ///
    /// - merge with fewer than two files
    /// - split or compress with more than one file
    pub fn check_file_count(&self, count: usize) -> Result<()> {
        match self {
            Self::Merge if count < 2 => Err(PdfDropError::NotEnoughToMerge),
            Self::Split if count > 1 => Err(PdfDropError::SplitTakesOne),
            Self::Compress if count > 1 => Err(PdfDropError::CompressTakesOne),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = PdfDropError;

    /// Parse an operation from its page literal (`merge-pdf`) or short
    /// form (`merge`).
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        let short = normalized.strip_suffix("-pdf").unwrap_or(&normalized);

        match short {
            "merge" => Ok(Self::Merge),
            "split" => Ok(Self::Split),
            "compress" => Ok(Self::Compress),
            "convert" => Ok(Self::Convert),
            _ => Err(PdfDropError::invalid_config(format!(
                "Unknown operation: {s}. Must be one of: merge-pdf, split-pdf, compress-pdf, convert-pdf"
            ))),
        }
    }
}
