use std::collections::HashMap;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::{Artifact, DownloadSink, ObjectUrl};

/// Numbered names tried after the requested one is taken.
const MAX_RENAME_ATTEMPTS: u32 = 999;

/// Sink that saves downloads into a directory.
///
/// Staging writes the artifact to a hidden temporary file inside the target
/// directory; triggering renames it into place, so a download either
/// appears complete or not at all. Existing files are never replaced: when
/// `merged.pdf` is taken the download lands in `merged (1).pdf`, then
/// `merged (2).pdf`, and so on. Revoking a URL that was never triggered
/// deletes its temporary file.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    staged: HashMap<ObjectUrl, NamedTempFile>,
    saved: Vec<PathBuf>,
    next_url: u64,
}

impl DirectorySink {
    /// Create a sink saving into `dir`. The directory is created on first
    /// use.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            staged: HashMap::new(),
            saved: Vec::new(),
            next_url: 0,
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Paths of files saved so far.
    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }

    /// Number of staged URLs still holding a temporary file.
    pub fn live_urls(&self) -> usize {
        self.staged.len()
    }

    fn destination(&self, file_name: &str) -> io::Result<PathBuf> {
        // Only the final component is honored.
        let name = Path::new(file_name).file_name().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid download name: {file_name:?}"),
            )
        })?;
        Ok(self.dir.join(name))
    }
}

/// `merged.pdf` becomes `merged (n).pdf`; names without an extension get
/// the counter appended.
fn numbered(destination: &Path, n: u32) -> PathBuf {
    let stem = destination
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match destination.extension() {
        Some(ext) => format!("{stem} ({n}).{}", ext.to_string_lossy()),
        None => format!("{stem} ({n})"),
    };
    destination.with_file_name(name)
}

impl DownloadSink for DirectorySink {
    fn stage(&mut self, artifact: &Artifact) -> io::Result<ObjectUrl> {
        std::fs::create_dir_all(&self.dir)?;

        let mut file = tempfile::Builder::new()
            .prefix(".pdfdrop-")
            .suffix(".part")
            .tempfile_in(&self.dir)?;

        {
            let mut writer = BufWriter::new(file.as_file_mut());
            writer.write_all(&artifact.bytes)?;
            writer.flush()?;
        }

        self.next_url += 1;
        let url = ObjectUrl::new(format!("file-blob:{}", self.next_url));
        self.staged.insert(url.clone(), file);
        Ok(url)
    }

    fn trigger(&mut self, url: &ObjectUrl, file_name: &str) -> io::Result<()> {
        let destination = self.destination(file_name)?;
        let mut file = self
            .staged
            .remove(url)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{url} is not staged")))?;

        let mut path = destination.clone();
        for attempt in 1..=MAX_RENAME_ATTEMPTS + 1 {
            match file.persist_noclobber(&path) {
                Ok(_) => {
                    tracing::info!(path = %path.display(), "saved download");
                    self.saved.push(path);
                    return Ok(());
                }
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::debug!(path = %path.display(), "download name taken");
                    file = err.file;
                    path = numbered(&destination, attempt);
                }
                Err(err) => return Err(err.error),
            }
        }

        Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free name for {}", destination.display()),
        ))
    }

    fn revoke(&mut self, url: &ObjectUrl) {
        // Dropping the temp file deletes it.
        self.staged.remove(url);
    }
}
