//! File handles as delivered by an input surface, and staged entries.

use mime::Mime;
use serde::Serialize;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Media type every staged file must report.
pub const PDF_MEDIA_TYPE: Mime = mime::APPLICATION_PDF;

/// Extension filter of the file picker.
pub const PICKER_ACCEPT: &str = ".pdf";

/// A candidate file handed over by the drop zone or the file picker.
///
/// `media_type` is whatever the surface reported. Nothing here inspects
/// the content, so a renamed file with a spoofed type is accepted as-is.
#[derive(Debug, Clone)]
pub struct RawFile {
    /// Display name.
    pub name: String,
    /// Reported media type.
    pub media_type: String,
    /// File content.
    pub content: Arc<[u8]>,
}

impl RawFile {
    /// Create a raw file handle.
    pub fn new(
        name: impl Into<String>,
        media_type: impl Into<String>,
        content: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            content: content.into(),
        }
    }

    /// Create a handle reporting `application/pdf`.
    pub fn pdf(name: impl Into<String>, content: impl Into<Arc<[u8]>>) -> Self {
        Self::new(name, PDF_MEDIA_TYPE.essence_str(), content)
    }

    /// Create a handle whose reported type is derived from the name's
    /// extension, the way a browser fills in `File.type`.
    pub fn from_name(name: impl Into<String>, content: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let media_type = media_type_for_name(&name)
            .map(|mime| mime.essence_str().to_owned())
            .unwrap_or_default();
        Self::new(name, media_type, content)
    }

    /// Whether the reported type is `application/pdf`.
    pub fn is_pdf(&self) -> bool {
        self.media_type == PDF_MEDIA_TYPE.essence_str()
    }
}

/// Guess a media type from a file name's extension.
///
/// Unknown extensions map to `None`; browsers report an empty string then.
pub fn media_type_for_name(name: &str) -> Option<Mime> {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => Some(mime::APPLICATION_PDF),
        Some("txt") => Some(mime::TEXT_PLAIN),
        Some("png") => Some(mime::IMAGE_PNG),
        Some("jpg" | "jpeg") => Some(mime::IMAGE_JPEG),
        Some("doc") => "application/msword".parse().ok(),
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            .parse()
            .ok(),
        _ => None,
    }
}

/// The file picker's `accept` filter.
pub struct FilePicker;

impl FilePicker {
    /// Whether the picker would offer a file with this name.
    pub fn accepts(name: &str) -> bool {
        name.to_ascii_lowercase().ends_with(PICKER_ACCEPT)
    }
}

/// Identifier of a staged file, unique within one workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FileId(u64);

impl FileId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw counter value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FileId {
    /// Short base-36 token.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

        let mut n = self.0;
        let mut buf = Vec::new();
        loop {
            buf.push(DIGITS[(n % 36) as usize]);
            n /= 36;
            if n == 0 {
                break;
            }
        }
        buf.reverse();

        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

/// A file accepted into the working set.
#[derive(Debug, Clone)]
pub struct StagedFile {
    /// Identifier assigned on intake.
    pub id: FileId,
    /// Display name, verbatim from the raw file.
    pub name: String,
    /// File content.
    pub content: Arc<[u8]>,
}

impl StagedFile {
    pub(crate) fn from_raw(id: FileId, raw: RawFile) -> Self {
        Self {
            id,
            name: raw.name,
            content: raw.content,
        }
    }

    /// Content size in bytes.
    pub fn size(&self) -> usize {
        self.content.len()
    }
}
