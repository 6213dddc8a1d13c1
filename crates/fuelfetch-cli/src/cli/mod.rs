//! CLI for fuelfetch.

mod download;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use download::run_download;

/// Downloads the yearly fuel price archives listed by a YAML config.
#[derive(Debug, Parser)]
#[command(name = "fuelfetch", version)]
#[command(about = "Download yearly fuel price archives in parallel", long_about = None)]
pub struct Cli {
    /// The path to the config file.
    #[arg(short, long, value_name = "PATH")]
    pub config: PathBuf,
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        run_download(&cli.config).await
    }
}
