//! The intake workspace: everything behind the PDF drop widget.
//!
//! A [`Workspace`] owns the working set, the error banner, the selected
//! operation and the processing flag. Its methods are the widget's event
//! handlers; [`Workspace::view`] is what a renderer draws.
//!
//! Every user-facing error raised by a handler is shown on the banner and
//! also returned to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdrop::Operation;
//! use pdfdrop::download::MemorySink;
//! use pdfdrop::intake::RawFile;
//! use pdfdrop::workspace::Workspace;
//!
//! # async fn example(a: Vec<u8>, b: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut workspace = Workspace::default();
//! workspace.set_selected_operation(Some(Operation::Merge));
//! workspace.drop_files(vec![RawFile::pdf("a.pdf", a), RawFile::pdf("b.pdf", b)])?;
//!
//! let mut sink = MemorySink::new();
//! workspace.continue_with(&mut sink).await?;
//! assert_eq!(sink.downloads()[0].file_name, "merged.pdf");
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::WorkspaceOptions;
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::download::DownloadSink;
use crate::error::{PdfDropError, Result};
use crate::intake::{FileId, IntakeController, RawFile, StagedFile};
use crate::merge::MergeOrchestrator;
use crate::notice::ErrorBanner;
use crate::operation::Operation;

/// Shared view of a workspace's processing flag.
///
/// Outside the crate the flag can only be observed:
///
/// ```
/// let workspace = pdfdrop::Workspace::default();
/// assert!(!workspace.processing_flag().is_set());
/// ```
///
/// ```compile_fail
/// let workspace = pdfdrop::Workspace::default();
/// let _guard = workspace.processing_flag().try_begin();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProcessingFlag(Arc<AtomicBool>);

impl ProcessingFlag {
    /// Whether an operation is running.
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Raise the flag unless it is already raised.
    ///
    /// The flag drops again when the returned guard goes out of scope.
    pub(crate) fn try_begin(&self) -> Option<ProcessingGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| ProcessingGuard(Arc::clone(&self.0)))
    }
}

/// Keeps the processing flag raised while alive.
#[derive(Debug)]
pub struct ProcessingGuard(Arc<AtomicBool>);

impl Drop for ProcessingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A staged file as rendered in the file list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRow {
    /// Identifier used by the remove button.
    pub id: String,
    /// Display name.
    pub name: String,
}

/// Render snapshot of a workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspaceView {
    /// Drop-zone prompt.
    pub prompt: String,
    /// Limit hint under the browse button.
    pub limit_hint: String,
    /// Selected operation.
    pub selected_operation: Option<Operation>,
    /// Whether a drag hovers over the drop zone.
    pub dragging: bool,
    /// Visible error message.
    pub error: Option<String>,
    /// Staged files.
    pub files: Vec<FileRow>,
    /// Whether the file list and Continue button are shown.
    pub show_file_list: bool,
    /// Continue button label.
    pub continue_label: String,
    /// Whether the Continue button accepts clicks.
    pub continue_enabled: bool,
}

/// The intake workspace.
#[derive(Debug)]
pub struct Workspace {
    intake: IntakeController,
    banner: ErrorBanner,
    selected: Option<Operation>,
    processing: ProcessingFlag,
    dispatcher: Dispatcher,
    options: WorkspaceOptions,
}

impl Workspace {
    /// Create an empty workspace.
    pub fn new(options: WorkspaceOptions) -> Self {
        Self {
            intake: IntakeController::new(options.max_files),
            banner: ErrorBanner::new(options.error_display()),
            selected: None,
            processing: ProcessingFlag::default(),
            dispatcher: Dispatcher::new(MergeOrchestrator::new(options.download_name.clone())),
            options,
        }
    }

    /// Options the workspace was created with.
    pub fn options(&self) -> &WorkspaceOptions {
        &self.options
    }

    /// Set the operation chosen by the hosting page.
    pub fn set_selected_operation(&mut self, operation: Option<Operation>) {
        self.selected = operation;
    }

    /// The selected operation.
    pub fn selected_operation(&self) -> Option<Operation> {
        self.selected
    }

    /// A drag entered or moved over the drop zone.
    pub fn drag_over(&mut self) {
        self.intake.drag_over();
    }

    /// A drag left the drop zone.
    pub fn drag_leave(&mut self) {
        self.intake.drag_leave();
    }

    /// Files were dropped onto the drop zone.
    pub fn drop_files<I>(&mut self, candidates: I) -> Result<Vec<FileId>>
    where
        I: IntoIterator<Item = RawFile>,
    {
        let result = self.intake.drop_files(candidates);
        self.surface(result)
    }

    /// Files were chosen in the file picker.
    pub fn pick_files<I>(&mut self, candidates: I) -> Result<Vec<FileId>>
    where
        I: IntoIterator<Item = RawFile>,
    {
        let result = self.intake.pick_files(candidates);
        self.surface(result)
    }

    /// Reject a batch of `incoming` PDFs up front when it cannot fit.
    ///
    /// Lets callers skip reading files that would be refused anyway. The
    /// error is shown on the banner as a drop would show it.
    pub fn check_capacity(&mut self, incoming: usize) -> Result<()> {
        let result = self.intake.check_capacity(incoming);
        self.surface(result)
    }

    /// The remove button of a staged file was clicked.
    pub fn remove_file(&mut self, id: FileId) -> bool {
        self.intake.remove_file(id)
    }

    /// Continue was clicked: run the selected operation on the working set.
    ///
    /// # Errors
    ///
    /// - [`PdfDropError::Busy`] while another operation is running; the
    ///   banner is left alone since the button is disabled then
    /// - validation errors from the dispatcher
    /// - [`PdfDropError::MergeFailed`] with the cause logged
    pub async fn continue_with<S>(&mut self, sink: &mut S) -> Result<DispatchOutcome>
    where
        S: DownloadSink + ?Sized,
    {
        let Some(guard) = self.processing.try_begin() else {
            tracing::debug!("continue ignored while processing");
            return Err(PdfDropError::Busy);
        };

        let result = self
            .dispatcher
            .dispatch(self.selected, self.intake.files(), sink)
            .await;
        drop(guard);

        self.surface(result)
    }

    /// The visible error message.
    pub fn error(&self) -> Option<String> {
        self.banner.current()
    }

    /// Dismiss the visible error.
    pub fn dismiss_error(&mut self) {
        self.banner.clear();
    }

    /// Staged files in order.
    pub fn files(&self) -> &[StagedFile] {
        self.intake.files()
    }

    /// Whether an operation is running.
    pub fn is_processing(&self) -> bool {
        self.processing.is_set()
    }

    /// A handle observing the processing flag.
    pub fn processing_flag(&self) -> ProcessingFlag {
        self.processing.clone()
    }

    /// Build the render snapshot.
    pub fn view(&self) -> WorkspaceView {
        let processing = self.is_processing();

        WorkspaceView {
            prompt: Operation::drop_prompt(self.selected).to_string(),
            limit_hint: format!("Maximum {} files", self.intake.max_files()),
            selected_operation: self.selected,
            dragging: self.intake.is_dragging(),
            error: self.error(),
            files: self
                .intake
                .files()
                .iter()
                .map(|file| FileRow {
                    id: file.id.to_string(),
                    name: file.name.clone(),
                })
                .collect(),
            show_file_list: !self.intake.is_empty(),
            continue_label: if processing { "Processing..." } else { "Continue" }.to_string(),
            continue_enabled: !processing,
        }
    }

    /// Route user-facing errors to the banner.
    fn surface<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result
            && err.is_user_facing()
        {
            if let PdfDropError::MergeFailed(cause) = err {
                tracing::error!(error = %cause, "Error merging PDFs");
            }
            self.banner.show(err.to_string());
        }
        result
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(WorkspaceOptions::default())
    }
}
