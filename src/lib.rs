//! pdfdrop - stage PDF files and run an operation on them.
//!
//! The library models the intake side of a PDF tool page: a drop zone and
//! file picker feeding a bounded working set ([`intake`]), a transient
//! error banner ([`notice`]), the operation chosen by the hosting page
//! ([`operation`]), dispatch on Continue ([`dispatch`]) and the one
//! operation with a real handler, merging ([`merge`]). The merged document
//! is handed to a [`download::DownloadSink`].
//!
//! [`workspace::Workspace`] ties these together behind event handlers.

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod download;
pub mod error;
pub mod intake;
pub mod merge;
pub mod notice;
pub mod operation;
pub mod output;
pub mod walker;
pub mod workspace;

pub use error::{PdfDropError, Result};
pub use operation::Operation;
pub use workspace::Workspace;

use crate::config::Config;
use crate::dispatch::DispatchOutcome;
use crate::download::DirectorySink;
use crate::output::{OutputFormatter, RunReport};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Stage the configured inputs and press Continue.
///
/// Downloads land in `config.output_dir`. With `config.json` the final
/// workspace state is printed as JSON, also when the run fails.
pub async fn run(config: &Config) -> Result<RunReport> {
    let formatter = OutputFormatter::from_config(config);

    if formatter.should_print() {
        formatter.section(&format!("{NAME} v{VERSION}"));
        formatter.blank_line();
    }

    let mut workspace = Workspace::new(config.options.clone());
    workspace.set_selected_operation(config.operation);

    let result = stage_and_continue(&mut workspace, config, &formatter).await;

    let report = RunReport {
        outcome: result.as_ref().ok().cloned(),
        workspace: workspace.view(),
    };

    if config.json {
        let json = report.to_json().map_err(std::io::Error::other)?;
        println!("{json}");
    }

    result.map(|_| report)
}

async fn stage_and_continue(
    workspace: &mut Workspace,
    config: &Config,
    formatter: &OutputFormatter,
) -> Result<DispatchOutcome> {
    let paths = walker::resolve_pdf_paths(config.inputs.iter().map(|p| p.to_string_lossy()))?;
    let (accepted, skipped) = walker::partition_by_picker(paths);

    for path in &skipped {
        formatter.warning(&format!("Skipping {}: not a PDF", path.display()));
    }

    workspace.check_capacity(accepted.len())?;
    let candidates = walker::read_candidates(&accepted).await?;

    workspace.drag_over();
    workspace.drop_files(candidates)?;
    output::display_workspace(formatter, &workspace.view());

    let mut sink = DirectorySink::new(&config.output_dir);

    formatter.blank_line();
    let outcome = workspace.continue_with(&mut sink).await?;
    output::display_outcome(formatter, &outcome);

    Ok(outcome)
}
