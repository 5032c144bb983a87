//! update-formula
//!
//! Release-pipeline step that regenerates `Formula/neokikoeru.rb` from the
//! GitHub release named by `$NEOKIKOERU_VERSION`.

// The rendered formula goes to stdout on --dry-run; startup failures happen
// before tracing exists.
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod tracing;

use crate::cli::Cli;
use neokikoeru_formula::{ReleaseClient, Version, generate, render_formula};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::parse();

    if let Err(e) = crate::tracing::init_tracing(cli.tracing_config()) {
        eprintln!("Fatal error: {e}");
        return ExitCode::FAILURE;
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            ::tracing::error!("Failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            ::tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> miette::Result<()> {
    // Validate before any network traffic.
    let version = Version::from_env()?;
    let client = ReleaseClient::new(cli.release_client_config())?;

    ::tracing::info!(
        %version,
        repository = %cli.repository,
        template = %cli.template.display(),
        "Generating formula"
    );

    if cli.dry_run {
        let rendered = render_formula(&client, &version, &cli.template).await?;
        print!("{rendered}");
        return Ok(());
    }

    generate(&client, &version, &cli.template, &cli.output).await?;
    Ok(())
}
