//! Routing a Continue request to the selected operation.

use serde::Serialize;

use crate::download::DownloadSink;
use crate::error::{PdfDropError, Result};
use crate::intake::StagedFile;
use crate::merge::{MergeOrchestrator, MergeReport};
use crate::operation::Operation;

/// Result of a dispatched operation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The merge ran and its download was triggered.
    Merged(MergeReport),
    /// The operation passed validation but has no handler yet.
    NotImplemented {
        /// The operation that was requested.
        operation: Operation,
    },
}

impl DispatchOutcome {
    /// Whether the operation actually produced something.
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Merged(_))
    }
}

/// Validates operation constraints and invokes handlers.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    merger: MergeOrchestrator,
}

impl Dispatcher {
    /// Create a dispatcher merging through `merger`.
    pub fn new(merger: MergeOrchestrator) -> Self {
        Self { merger }
    }

    /// The merge handler.
    pub fn merger(&self) -> &MergeOrchestrator {
        &self.merger
    }

    /// Check that an operation is selected and that it accepts `count`
    /// files.
    ///
    /// # Errors
    ///
    /// [`PdfDropError::NoOperationSelected`] or the operation's cardinality
    /// error.
    pub fn validate(selected: Option<Operation>, count: usize) -> Result<Operation> {
        let operation = selected.ok_or(PdfDropError::NoOperationSelected)?;
        operation.check_file_count(count)?;
        Ok(operation)
    }

    /// Validate and run the selected operation on `files`.
    ///
    /// No handler is invoked when validation fails.
    pub async fn dispatch<S>(
        &self,
        selected: Option<Operation>,
        files: &[StagedFile],
        sink: &mut S,
    ) -> Result<DispatchOutcome>
    where
        S: DownloadSink + ?Sized,
    {
        let operation = Self::validate(selected, files.len())?;
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();

        match operation {
            Operation::Merge => {
                tracing::info!(files = ?names, "Merging PDFs");
                let report = self.merger.run(files, sink).await?;
                Ok(DispatchOutcome::Merged(report))
            }
            Operation::Split | Operation::Compress | Operation::Convert => {
                tracing::info!(%operation, files = ?names, "operation not implemented yet");
                Ok(DispatchOutcome::NotImplemented { operation })
            }
        }
    }
}
