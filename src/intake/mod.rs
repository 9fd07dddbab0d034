//! File intake: the working set of staged PDFs.
//!
//! Both input surfaces (the drop zone and the file picker) funnel into
//! [`IntakeController::add_files`], which filters candidates to
//! `application/pdf`, enforces the count limit for the whole batch, and
//! assigns each admitted file a fresh [`FileId`].
//!
//! # Examples
//!
//! ```
//! use pdfdrop::intake::{IntakeController, RawFile};
//!
//! let mut intake = IntakeController::new(10);
//! let ids = intake
//!     .pick_files(vec![
//!         RawFile::pdf("a.pdf", b"%PDF-1.5".to_vec()),
//!         RawFile::from_name("notes.txt", b"hello".to_vec()),
//!     ])
//!     .unwrap();
//!
//! assert_eq!(ids.len(), 1);
//! assert_eq!(intake.len(), 1);
//! ```

mod file;

pub use file::{
    FileId, FilePicker, PDF_MEDIA_TYPE, PICKER_ACCEPT, RawFile, StagedFile, media_type_for_name,
};

use crate::error::{PdfDropError, Result};

/// Default cap on the number of staged files.
pub const DEFAULT_MAX_FILES: usize = 10;

/// Owns the working set and the drop-zone hover state.
#[derive(Debug)]
pub struct IntakeController {
    files: Vec<StagedFile>,
    max_files: usize,
    next_id: u64,
    dragging: bool,
}

impl IntakeController {
    /// Create an empty controller with the given limit.
    pub fn new(max_files: usize) -> Self {
        Self {
            files: Vec::new(),
            max_files,
            next_id: 1,
            dragging: false,
        }
    }

    /// Stage a batch of candidates.
    ///
    /// Non-PDF candidates are dropped silently and do not count toward the
    /// limit. If the remaining candidates would push the working set past
    /// the limit, the whole batch is rejected and nothing changes.
    ///
    /// Returns the ids assigned to admitted files, in arrival order.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDropError::TooManyFiles`] when the batch does not fit.
    pub fn add_files<I>(&mut self, candidates: I) -> Result<Vec<FileId>>
    where
        I: IntoIterator<Item = RawFile>,
    {
        let accepted: Vec<RawFile> = candidates
            .into_iter()
            .filter(|candidate| {
                let keep = candidate.is_pdf();
                if !keep {
                    tracing::debug!(
                        name = %candidate.name,
                        media_type = %candidate.media_type,
                        "ignoring non-PDF file"
                    );
                }
                keep
            })
            .collect();

        self.check_capacity(accepted.len())?;

        let mut ids = Vec::with_capacity(accepted.len());
        for raw in accepted {
            let id = self.allocate_id();
            tracing::debug!(%id, name = %raw.name, "staged file");
            self.files.push(StagedFile::from_raw(id, raw));
            ids.push(id);
        }

        Ok(ids)
    }

    /// Check that `incoming` more PDFs fit into the working set.
    ///
    /// # Errors
    ///
    /// Returns [`PdfDropError::TooManyFiles`] when they do not.
    pub fn check_capacity(&self, incoming: usize) -> Result<()> {
        if self.files.len() + incoming > self.max_files {
            tracing::debug!(
                staged = self.files.len(),
                incoming,
                limit = self.max_files,
                "rejecting batch over file limit"
            );
            return Err(PdfDropError::TooManyFiles {
                limit: self.max_files,
            });
        }
        Ok(())
    }

    /// Stage files dropped onto the drop zone.
    pub fn drop_files<I>(&mut self, candidates: I) -> Result<Vec<FileId>>
    where
        I: IntoIterator<Item = RawFile>,
    {
        self.dragging = false;
        self.add_files(candidates)
    }

    /// Stage files chosen through the file picker.
    ///
    /// The picker is cleared after every selection, so choosing the same
    /// file again stages a second entry.
    pub fn pick_files<I>(&mut self, candidates: I) -> Result<Vec<FileId>>
    where
        I: IntoIterator<Item = RawFile>,
    {
        self.add_files(candidates)
    }

    /// Remove a staged file. Unknown ids are ignored.
    ///
    /// Returns whether an entry was removed.
    pub fn remove_file(&mut self, id: FileId) -> bool {
        let before = self.files.len();
        self.files.retain(|file| file.id != id);
        self.files.len() != before
    }

    /// Something is being dragged over the drop zone.
    pub fn drag_over(&mut self) {
        self.dragging = true;
    }

    /// The drag left the drop zone.
    pub fn drag_leave(&mut self) {
        self.dragging = false;
    }

    /// Whether a drag is hovering over the drop zone.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Staged files in arrival order.
    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    /// Look up a staged file.
    pub fn get(&self, id: FileId) -> Option<&StagedFile> {
        self.files.iter().find(|file| file.id == id)
    }

    /// Number of staged files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing is staged.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The configured limit.
    pub fn max_files(&self) -> usize {
        self.max_files
    }

    /// Remaining capacity.
    pub fn remaining(&self) -> usize {
        self.max_files.saturating_sub(self.files.len())
    }

    fn allocate_id(&mut self) -> FileId {
        let id = FileId::new(self.next_id);
        self.next_id += 1;
        id
    }
}

impl Default for IntakeController {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_FILES)
    }
}
