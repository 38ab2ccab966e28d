//! CLI for drivegrab.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use drivegrab_core::config;
use std::path::PathBuf;

use commands::{run_download, run_normalize, run_scan};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "drivegrab")]
#[command(about = "drivegrab: pick Drive/Docs files off a course page and download them", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List the Drive/Docs links found on a saved page.
    Scan {
        /// Saved page: HTML, or a JSON page snapshot (`.json`).
        page: PathBuf,
        /// URL the page was saved from (required for HTML).
        #[arg(long)]
        location: Option<String>,
        /// Print the raw scan response as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the direct download URL for each given link.
    Normalize {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Scan a saved page and download the selected links.
    Download {
        /// Saved page: HTML, or a JSON page snapshot (`.json`).
        page: PathBuf,
        /// URL the page was saved from (required for HTML).
        #[arg(long)]
        location: Option<String>,
        /// Item numbers as listed by `scan` (e.g. 1,3). Default: all.
        #[arg(long, value_delimiter = ',', value_name = "N,...")]
        select: Vec<usize>,
        /// Directory to save into (default: config download_dir, else current directory).
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Scan {
                page,
                location,
                json,
            } => run_scan(&cfg, &page, location.as_deref(), json)?,
            CliCommand::Normalize { urls } => run_normalize(&cfg, &urls),
            CliCommand::Download {
                page,
                location,
                select,
                dir,
            } => {
                let dir = match dir.or_else(|| cfg.download_dir.clone()) {
                    Some(d) => d,
                    None => std::env::current_dir()?,
                };
                run_download(&cfg, &page, location.as_deref(), &select, &dir).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
