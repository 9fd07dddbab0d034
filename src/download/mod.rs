//! Handing finished artifacts to the user as downloads.
//!
//! A [`DownloadSink`] mirrors the browser's download flow: the artifact is
//! staged behind an object URL, a link pointing at that URL is activated,
//! and the URL is revoked. [`deliver`] runs that sequence through a
//! [`ScopedUrl`] guard so the URL is revoked on every path, including a
//! failed activation.

mod directory;
mod memory;

pub use directory::DirectorySink;
pub use memory::{DeliveredDownload, MemorySink};

use std::fmt;
use std::io;

use crate::intake::PDF_MEDIA_TYPE;

/// A file produced by an operation, ready to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Suggested download name.
    pub file_name: String,
    /// Media type of the content.
    pub media_type: String,
    /// Serialized content.
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Create a PDF artifact.
    pub fn pdf(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: PDF_MEDIA_TYPE.essence_str().to_owned(),
            bytes,
        }
    }

    /// Content size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the artifact has no content.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A revocable handle to a staged artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    /// Wrap a URL string.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// The URL string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Destination for finished artifacts.
pub trait DownloadSink {
    /// Stage an artifact and return a URL referencing it.
    fn stage(&mut self, artifact: &Artifact) -> io::Result<ObjectUrl>;

    /// Activate a download link for a staged URL.
    fn trigger(&mut self, url: &ObjectUrl, file_name: &str) -> io::Result<()>;

    /// Release a staged URL. Must tolerate URLs already consumed by
    /// [`DownloadSink::trigger`].
    fn revoke(&mut self, url: &ObjectUrl);
}

/// An object URL that is revoked when dropped.
pub struct ScopedUrl<'a, S: DownloadSink + ?Sized> {
    sink: &'a mut S,
    url: ObjectUrl,
}

impl<'a, S: DownloadSink + ?Sized> ScopedUrl<'a, S> {
    /// Stage `artifact` on `sink`.
    pub fn acquire(sink: &'a mut S, artifact: &Artifact) -> io::Result<Self> {
        let url = sink.stage(artifact)?;
        Ok(Self { sink, url })
    }

    /// The staged URL.
    pub fn url(&self) -> &ObjectUrl {
        &self.url
    }

    /// Activate a download link for this URL.
    pub fn trigger(&mut self, file_name: &str) -> io::Result<()> {
        self.sink.trigger(&self.url, file_name)
    }
}

impl<S: DownloadSink + ?Sized> Drop for ScopedUrl<'_, S> {
    fn drop(&mut self) {
        self.sink.revoke(&self.url);
    }
}

/// Stage `artifact`, trigger its download under its own name, and release
/// the URL.
pub fn deliver<S: DownloadSink + ?Sized>(sink: &mut S, artifact: &Artifact) -> io::Result<()> {
    let mut url = ScopedUrl::acquire(sink, artifact)?;
    url.trigger(&artifact.file_name)?;
    tracing::debug!(url = %url.url(), name = %artifact.file_name, "download triggered");
    Ok(())
}
