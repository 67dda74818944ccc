//! CLI for pagedump.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pagedump_core::{config, logging};
use std::path::PathBuf;

use commands::{run_config, run_scrape, ScrapeArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pagedump")]
#[command(about = "pagedump: stream a paginated JSON API into one JSON document", long_about = None)]
pub struct Cli {
    /// Log to stderr instead of the XDG state log file.
    #[arg(long, global = true)]
    pub log_stderr: bool,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch every page and write `<source>-<YYYYMMDD>.json`.
    Scrape {
        /// Directory for the output document (default: config, then current dir).
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Source identifier written to the document and file name.
        #[arg(long, value_name = "ID")]
        source: Option<String>,

        /// Page URL template; `{page}` is replaced by the page number.
        #[arg(long, value_name = "TEMPLATE")]
        url: Option<String>,

        /// Stop after N pages.
        #[arg(long, value_name = "N")]
        max_pages: Option<u32>,
    },

    /// Print the config file path and its effective contents.
    Config,
}

impl Cli {
    /// Returns the process exit code.
    pub async fn run_from_args() -> Result<i32> {
        let cli = Cli::parse();

        if cli.log_stderr {
            logging::init_logging_stderr();
        } else if let Err(e) = logging::init_logging() {
            logging::init_logging_stderr();
            tracing::warn!("file logging unavailable, using stderr: {:#}", e);
        }

        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Scrape {
                output_dir,
                source,
                url,
                max_pages,
            } => {
                let args = ScrapeArgs {
                    output_dir,
                    source,
                    url,
                    max_pages,
                };
                run_scrape(cfg, args).await
            }
            CliCommand::Config => {
                run_config(&cfg)?;
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests;
