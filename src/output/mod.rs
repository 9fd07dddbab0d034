//! Output formatting and display for pdfdrop.
//!
//! Terminal rendering of a workspace: its staged files, the outcome of
//! Continue, and the banner message. With `--json` the same information is
//! printed as one JSON document instead.

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use serde::Serialize;

use crate::dispatch::DispatchOutcome;
use crate::merge::MergeReport;
use crate::workspace::WorkspaceView;

/// Everything a run produced, as printed by `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Outcome of Continue, if it got that far.
    pub outcome: Option<DispatchOutcome>,
    /// Workspace state after the run.
    pub workspace: WorkspaceView,
}

impl RunReport {
    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Show the staged files.
pub fn display_workspace(formatter: &OutputFormatter, view: &WorkspaceView) {
    formatter.debug(&view.prompt);

    if !view.show_file_list {
        formatter.info("No PDF files staged");
        return;
    }

    formatter.info(&format!(
        "Staged {} file(s) ({})",
        view.files.len(),
        view.limit_hint
    ));
    for (idx, file) in view.files.iter().enumerate() {
        formatter.list_item(idx + 1, &file.name);
        formatter.detail("id", &file.id);
    }
}

/// Show the outcome of Continue.
pub fn display_outcome(formatter: &OutputFormatter, outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::Merged(report) => display_merge_report(formatter, report),
        DispatchOutcome::NotImplemented { operation } => {
            formatter.warning(&format!("{operation} is not available yet; nothing was done"));
        }
    }
}

fn display_merge_report(formatter: &OutputFormatter, report: &MergeReport) {
    formatter.success(&format!(
        "Downloaded {} ({} pages, {})",
        report.download_name,
        report.total_pages,
        format_size(report.output_bytes)
    ));

    if formatter.is_verbose() {
        formatter.section("Statistics");
        for file in &report.files {
            formatter.detail(&file.name, &format!("{} page(s)", file.pages));
        }
        formatter.detail(
            "Merge time",
            &format!("{:.2}s", report.elapsed.as_secs_f64()),
        );
    }
}

/// Human-readable byte count.
pub fn format_size(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.2} {}", UNITS[unit])
    }
}
