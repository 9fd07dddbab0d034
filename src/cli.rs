//! CLI argument parsing for pdfdrop.
//!
//! The command line stands in for the drop zone: the inputs are the files
//! dropped on it, `--operation` is the selection made by the hosting page,
//! and running the command is the click on Continue.
//!
//! # Examples
//!
//! ```no_run
//! use pdfdrop::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! println!("Staging {} inputs", cli.inputs.len());
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, WorkspaceOptions};
use crate::error::{PdfDropError, Result};
use crate::operation::Operation;

/// Stage PDF files and run an operation on them.
///
/// Inputs are staged the way a drop zone stages them: only PDFs are kept,
/// and the whole batch is refused if it exceeds the file limit. Merge
/// writes the combined document into the output directory.
#[derive(Parser, Debug)]
#[command(name = "pdfdrop")]
#[command(version)]
#[command(about = "Stage PDF files and merge, split, compress or convert them", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files or glob patterns (in order)
    ///
    /// Files whose names do not end in .pdf are skipped.
    ///
    /// Examples:
    ///   pdfdrop -p merge-pdf a.pdf b.pdf
    ///   pdfdrop -p merge-pdf 'chapter*.pdf' -o out/
    #[arg(required = true, value_name = "FILE|GLOB")]
    pub inputs: Vec<PathBuf>,

    /// Operation to run
    ///
    /// One of merge-pdf, split-pdf, compress-pdf, convert-pdf.
    /// The -pdf suffix may be omitted.
    #[arg(short = 'p', long, env = "PDFDROP_OPERATION", value_name = "OP")]
    #[arg(value_parser = parse_operation)]
    pub operation: Option<Operation>,

    /// Directory receiving the download
    #[arg(
        short,
        long,
        env = "PDFDROP_OUTPUT_DIR",
        value_name = "DIR",
        default_value = "."
    )]
    pub output_dir: PathBuf,

    /// JSON file with workspace options
    ///
    /// Recognized keys: max_files, error_display_ms, download_name.
    /// Command-line flags take precedence.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Maximum number of staged files
    #[arg(long, value_name = "N")]
    pub max_files: Option<usize>,

    /// Print the outcome and final workspace state as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbose output - list staged files and merge statistics
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

fn parse_operation(value: &str) -> std::result::Result<Operation, String> {
    value.parse().map_err(|e: PdfDropError| e.to_string())
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// Options are read from `--config` when given, then overridden by
    /// flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the options file is unreadable or invalid, or
    /// if the resulting configuration fails validation.
    pub async fn to_config(&self) -> Result<Config> {
        let mut options = match &self.config {
            Some(path) => WorkspaceOptions::load(path).await?,
            None => WorkspaceOptions::default(),
        };

        if let Some(max_files) = self.max_files {
            options.max_files = max_files;
        }

        let config = Config {
            inputs: self.inputs.clone(),
            output_dir: self.output_dir.clone(),
            operation: self.operation,
            options,
            verbose: self.verbose,
            quiet: self.quiet,
            json: self.json,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate CLI arguments before any file I/O.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            return Err(PdfDropError::NoInputs);
        }

        if self.max_files == Some(0) {
            return Err(PdfDropError::invalid_config(
                "Maximum number of files must be at least 1",
            ));
        }

        Ok(())
    }
}
