//! Turning command-line inputs into candidate files.

use futures::stream::{self, StreamExt, TryStreamExt};
use std::path::{Path, PathBuf};

use crate::error::{PdfDropError, Result};
use crate::intake::{FilePicker, RawFile};

/// Number of files read concurrently.
const READ_CONCURRENCY: usize = 4;

/// Expand glob patterns in order.
///
/// A pattern that matches nothing is kept as a literal path so that a
/// missing file surfaces as a read error instead of disappearing.
pub fn resolve_pdf_paths<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let before = resolved_paths.len();

        for entry in glob::glob(pattern)? {
            resolved_paths.push(entry?);
        }

        if resolved_paths.len() == before {
            resolved_paths.push(PathBuf::from(pattern));
        }
    }

    Ok(resolved_paths)
}

/// Split paths into those the file picker accepts and those it skips.
pub fn partition_by_picker(paths: Vec<PathBuf>) -> (Vec<PathBuf>, Vec<PathBuf>) {
    paths
        .into_iter()
        .partition(|path| FilePicker::accepts(&display_name(path)))
}

/// Read files into candidates, preserving order.
pub async fn read_candidates(paths: &[PathBuf]) -> Result<Vec<RawFile>> {
    stream::iter(paths)
        .map(|path| read_candidate(path))
        .buffered(READ_CONCURRENCY)
        .try_collect()
        .await
}

async fn read_candidate(path: &Path) -> Result<RawFile> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|source| PdfDropError::FailedToReadInput {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "read input");
    Ok(RawFile::from_name(display_name(path), content))
}

/// The name a file would carry in a browser: its final path component.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
