//! pdfdrop - stage PDF files and run an operation on them.

use clap::Parser;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdfdrop::PdfDropError;
use pdfdrop::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "pdfdrop=debug" } else { "pdfdrop=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), PdfDropError> {
    cli.validate()?;
    let config = cli.to_config().await?;

    pdfdrop::run(&config).await?;
    Ok(())
}
