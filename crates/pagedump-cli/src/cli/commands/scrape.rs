//! `pagedump scrape` – run the pipeline on a blocking thread, Ctrl-C aborts.

use anyhow::{Context, Result};
use pagedump_core::config::PagedumpConfig;
use pagedump_core::control::AbortToken;
use pagedump_core::driver::Termination;
use pagedump_core::scrape;
use std::future::Future;
use std::io;
use std::path::PathBuf;

/// Exit code after Ctrl-C (128 + SIGINT).
const EXIT_ABORTED: i32 = 130;
const EXIT_FETCH_FAILED: i32 = 1;

/// Command-line overrides for the loaded config.
#[derive(Debug, Default)]
pub struct ScrapeArgs {
    pub output_dir: Option<PathBuf>,
    pub source: Option<String>,
    pub url: Option<String>,
    pub max_pages: Option<u32>,
}

impl ScrapeArgs {
    /// Apply overrides; returns the effective config and output directory.
    pub fn resolve(self, mut cfg: PagedumpConfig) -> Result<(PagedumpConfig, PathBuf)> {
        if let Some(source) = self.source {
            cfg.source = source;
        }
        if let Some(url) = self.url {
            cfg.url_template = url;
        }
        if self.max_pages.is_some() {
            cfg.max_pages = self.max_pages;
        }
        let dir = match self.output_dir.or_else(|| cfg.output_dir.clone()) {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        Ok((cfg, dir))
    }
}

/// Exit code for how the run ended.
pub fn exit_code(termination: &Termination) -> i32 {
    match termination {
        Termination::LastPage { .. } | Termination::PageLimit { .. } => 0,
        Termination::FetchFailed { .. } => EXIT_FETCH_FAILED,
        Termination::Aborted { .. } => EXIT_ABORTED,
    }
}

/// First interrupt sets `abort` so the run stops cleanly. Returns true once a
/// second interrupt arrives, false if the signal source fails first.
async fn watch_interrupts<F, Fut>(mut next_signal: F, abort: AbortToken) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if next_signal().await.is_err() {
        return false;
    }
    tracing::warn!("interrupt received, stopping");
    abort.abort();
    next_signal().await.is_ok()
}

pub async fn run_scrape(cfg: PagedumpConfig, args: ScrapeArgs) -> Result<i32> {
    let (cfg, output_dir) = args.resolve(cfg)?;

    let abort = AbortToken::new();
    let on_signal = abort.clone();
    tokio::spawn(async move {
        if watch_interrupts(tokio::signal::ctrl_c, on_signal).await {
            tracing::warn!("second interrupt received, exiting without sealing the document");
            eprintln!("pagedump: interrupted");
            std::process::exit(EXIT_ABORTED);
        }
    });

    let report = tokio::task::spawn_blocking(move || scrape::run_scrape(&cfg, &output_dir, abort))
        .await
        .context("scrape task join")??;

    let summary = &report.summary;
    println!(
        "{}: {} items from {} pages ({})",
        report.path.display(),
        summary.items_written,
        summary.pages_scraped,
        summary.termination
    );
    Ok(exit_code(&summary.termination))
}
