//! Merge orchestration.
//!
//! Loads each staged file in working-set order, copies all of its pages into
//! an accumulator document, serializes the result and hands it to a
//! [`DownloadSink`]. Nothing is delivered unless every step succeeds.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdrop::download::MemorySink;
//! use pdfdrop::intake::{IntakeController, RawFile};
//! use pdfdrop::merge::MergeOrchestrator;
//!
//! # async fn example(a: Vec<u8>, b: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut intake = IntakeController::default();
//! intake.pick_files(vec![RawFile::pdf("a.pdf", a), RawFile::pdf("b.pdf", b)])?;
//!
//! let mut sink = MemorySink::new();
//! let report = MergeOrchestrator::default()
//!     .run(intake.files(), &mut sink)
//!     .await?;
//! println!("{} pages in {}", report.total_pages, report.download_name);
//! # Ok(())
//! # }
//! ```

pub mod pages;

pub use pages::TargetDocument;

use lopdf::Document;
use serde::Serialize;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::{self, JoinError};

use crate::download::{self, Artifact, DownloadSink};
use crate::intake::{FileId, StagedFile};

/// Default name of the merged download.
pub const DEFAULT_DOWNLOAD_NAME: &str = "merged.pdf";

/// What went wrong inside a merge.
///
/// Never shown to the user; logged for diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// A staged file could not be parsed.
    #[error("failed to load {name}: {source}")]
    Load {
        /// Display name of the staged file.
        name: String,
        /// Parser error.
        source: lopdf::Error,
    },

    /// A staged file is encrypted and does not open with an empty password.
    #[error("{name} is encrypted and needs a password")]
    Encrypted {
        /// Display name of the staged file.
        name: String,
    },

    /// Pages of a staged file could not be copied.
    #[error("failed to copy pages of {name}: {source}")]
    CopyPages {
        /// Display name of the staged file.
        name: String,
        /// Page tree error.
        source: lopdf::Error,
    },

    /// The merged document could not be serialized.
    #[error("failed to serialize merged document: {reason}")]
    Serialize {
        /// Serializer message.
        reason: String,
    },

    /// The download could not be handed over.
    #[error("failed to deliver download: {0}")]
    Delivery(#[source] io::Error),

    /// A blocking worker panicked or was cancelled.
    #[error("merge worker failed: {0}")]
    Task(#[from] JoinError),
}

/// Page count contributed by one staged file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilePages {
    /// Staged file id.
    pub id: FileId,
    /// Display name.
    pub name: String,
    /// Pages copied from this file.
    pub pages: usize,
}

/// Summary of a completed merge.
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    /// Per-file page counts, in merge order.
    pub files: Vec<FilePages>,
    /// Pages in the merged document.
    pub total_pages: usize,
    /// Size of the merged document in bytes.
    pub output_bytes: usize,
    /// Name the download was triggered with.
    pub download_name: String,
    /// Time spent loading, copying and serializing.
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

/// Concatenates staged PDFs.
#[derive(Debug, Clone)]
pub struct MergeOrchestrator {
    download_name: String,
}

impl MergeOrchestrator {
    /// Create an orchestrator that names its output `download_name`.
    pub fn new(download_name: impl Into<String>) -> Self {
        Self {
            download_name: download_name.into(),
        }
    }

    /// Name given to the merged download.
    pub fn download_name(&self) -> &str {
        &self.download_name
    }

    /// Merge `files` and trigger the download on `sink`.
    ///
    /// # Errors
    ///
    /// Any load, copy, serialize or delivery failure. No download is
    /// triggered in that case.
    pub async fn run<S>(&self, files: &[StagedFile], sink: &mut S) -> Result<MergeReport, MergeError>
    where
        S: DownloadSink + ?Sized,
    {
        let (artifact, report) = self.merge(files).await?;

        download::deliver(sink, &artifact).map_err(MergeError::Delivery)?;

        tracing::info!(
            files = report.files.len(),
            pages = report.total_pages,
            bytes = report.output_bytes,
            "PDFs merged successfully"
        );
        Ok(report)
    }

    /// Merge `files` into a PDF artifact without delivering it.
    ///
    /// Files are processed strictly in order; each load runs on the blocking
    /// pool so the caller's task yields between files.
    pub async fn merge(&self, files: &[StagedFile]) -> Result<(Artifact, MergeReport), MergeError> {
        let start = Instant::now();
        let mut target = TargetDocument::new();
        let mut per_file = Vec::with_capacity(files.len());

        for (idx, file) in files.iter().enumerate() {
            tracing::debug!(
                "[{}/{}] loading {} ({} bytes)",
                idx + 1,
                files.len(),
                file.name,
                file.size()
            );

            let content = Arc::clone(&file.content);
            let source = task::spawn_blocking(move || Document::load_mem(&content))
                .await?
                .map_err(|source| MergeError::Load {
                    name: file.name.clone(),
                    source,
                })?;

            // Files that open with an empty password were decrypted on load.
            if source.is_encrypted() && source.encryption_state.is_none() {
                return Err(MergeError::Encrypted {
                    name: file.name.clone(),
                });
            }

            let pages = target.append(source).map_err(|source| MergeError::CopyPages {
                name: file.name.clone(),
                source,
            })?;
            tracing::debug!("    → {pages} pages added");

            per_file.push(FilePages {
                id: file.id,
                name: file.name.clone(),
                pages,
            });
        }

        let total_pages = target.page_count();
        let mut merged = target.finish();

        let bytes = task::spawn_blocking(move || {
            let mut buffer = Vec::new();
            merged
                .save_to(&mut buffer)
                .map(|_| buffer)
                .map_err(|err| MergeError::Serialize {
                    reason: err.to_string(),
                })
        })
        .await??;

        let report = MergeReport {
            files: per_file,
            total_pages,
            output_bytes: bytes.len(),
            download_name: self.download_name.clone(),
            elapsed: start.elapsed(),
        };

        Ok((Artifact::pdf(self.download_name.clone(), bytes), report))
    }
}

impl Default for MergeOrchestrator {
    fn default() -> Self {
        Self::new(DEFAULT_DOWNLOAD_NAME)
    }
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }
}
