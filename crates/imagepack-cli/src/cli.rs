//! CLI argument parsing using clap.

use clap::Parser;
use imagepack_core::PackConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "imagepack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory name every archive entry is placed under
    #[arg(value_name = "PREFIX")]
    pub prefix: String,

    /// Output archive path (.zip, .tar, .tgz or .tar.gz)
    #[arg(value_name = "ARCHIVE")]
    pub archive: PathBuf,

    /// Image directory to package
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// List each archived file with its size
    #[arg(short, long)]
    pub verbose: bool,

    /// Output results in JSON format
    #[arg(short, long, conflicts_with = "verbose")]
    pub json: bool,

    /// Compression level (1-9) for zip and tar.gz
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=9))]
    pub compression_level: Option<u8>,

    /// Leave source file permissions untouched
    #[arg(long)]
    pub no_normalize_permissions: bool,
}

impl Cli {
    /// Builds the packaging configuration from the parsed flags.
    pub fn pack_config(&self) -> PackConfig {
        let mut config = PackConfig::default()
            .with_prefix(&self.prefix)
            .with_normalize_permissions(!self.no_normalize_permissions);
        if let Some(level) = self.compression_level {
            config = config.with_compression_level(level);
        }
        config
    }
}
