use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use super::{Artifact, DownloadSink, ObjectUrl};

/// A download recorded by [`MemorySink`].
#[derive(Debug, Clone)]
pub struct DeliveredDownload {
    /// Name the download was triggered with.
    pub file_name: String,
    /// Media type of the artifact.
    pub media_type: String,
    /// Downloaded content.
    pub bytes: Arc<[u8]>,
}

/// In-memory sink that records downloads instead of saving them.
#[derive(Debug, Default)]
pub struct MemorySink {
    staged: HashMap<ObjectUrl, (String, Arc<[u8]>)>,
    downloads: Vec<DeliveredDownload>,
    next_url: u64,
    revoked: usize,
    fail_trigger: bool,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose link activation always fails.
    pub fn failing_trigger() -> Self {
        Self {
            fail_trigger: true,
            ..Self::default()
        }
    }

    /// Downloads triggered so far.
    pub fn downloads(&self) -> &[DeliveredDownload] {
        &self.downloads
    }

    /// Number of staged URLs not yet revoked.
    pub fn live_urls(&self) -> usize {
        self.staged.len()
    }

    /// Number of revocations.
    pub fn revoked(&self) -> usize {
        self.revoked
    }
}

impl DownloadSink for MemorySink {
    fn stage(&mut self, artifact: &Artifact) -> io::Result<ObjectUrl> {
        self.next_url += 1;
        let url = ObjectUrl::new(format!("blob:pdfdrop/{}", self.next_url));
        self.staged.insert(
            url.clone(),
            (artifact.media_type.clone(), Arc::from(artifact.bytes.as_slice())),
        );
        Ok(url)
    }

    fn trigger(&mut self, url: &ObjectUrl, file_name: &str) -> io::Result<()> {
        if self.fail_trigger {
            return Err(io::Error::other("download link could not be activated"));
        }

        let (media_type, bytes) = self
            .staged
            .get(url)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{url} is not staged")))?;

        self.downloads.push(DeliveredDownload {
            file_name: file_name.to_string(),
            media_type,
            bytes,
        });
        Ok(())
    }

    fn revoke(&mut self, url: &ObjectUrl) {
        if self.staged.remove(url).is_some() {
            self.revoked += 1;
        }
    }
}
