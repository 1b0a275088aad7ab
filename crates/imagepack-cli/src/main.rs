//! Imagepack CLI - packages a built image directory into a checksummed
//! archive.

mod cli;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;
use imagepack_core::PackageOutput;
use imagepack_core::creation::progress::EntryListing;
use imagepack_core::creation::progress::NoopProgress;
use imagepack_core::package;
use std::io;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let formatter = output::create_formatter(cli.json);

    let result = run(&cli);
    let output = match result {
        Ok(output) => output,
        Err(err) => {
            let code = err.code();
            let err = error::convert_pack_error(err, &cli.archive, &cli.image);
            formatter.format_error(code, &err);
            return Err(err);
        }
    };

    for warning in &output.report.warnings {
        formatter.format_warning(warning);
    }
    formatter.format_package_result(&output)
}

fn run(cli: &cli::Cli) -> imagepack_core::Result<PackageOutput> {
    let config = cli.pack_config();
    tracing::debug!(
        image = %cli.image.display(),
        archive = %cli.archive.display(),
        prefix = config.prefix(),
        "packaging image"
    );

    if cli.verbose {
        let mut listing = EntryListing::new(io::stdout());
        package(&cli.image, &cli.archive, &config, &mut listing)
    } else {
        package(&cli.image, &cli.archive, &config, &mut NoopProgress)
    }
}
