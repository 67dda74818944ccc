//! One scrape run end to end: create the output file, open the document,
//! walk pages, seal the document.

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

use crate::config::PagedumpConfig;
use crate::control::AbortToken;
use crate::driver::{Driver, RunSummary};
use crate::fetch::HttpPageFetcherBuilder;
use crate::output::{self, DocumentHeader, DocumentWriter};

/// Where the document went and how the run ended.
#[derive(Debug)]
pub struct ScrapeReport {
    pub path: PathBuf,
    pub summary: RunSummary,
}

/// Scrape `cfg.source` into `<output_dir>/<source>-<YYYYMMDD>.json`.
///
/// Fetch failures end the walk but still produce a sealed document and an
/// `Ok` report; only failures to create, open or seal the document are `Err`.
/// Runs in the current thread; call from `spawn_blocking` if used from async code.
pub fn run_scrape(cfg: &PagedumpConfig, output_dir: &Path, abort: AbortToken) -> Result<ScrapeReport> {
    let fetcher = HttpPageFetcherBuilder::from_config(cfg)
        .abort_token(abort.clone())
        .build()?;

    let started = Utc::now();
    let (path, sink) = output::create_output(output_dir, &cfg.source, started)?;
    let header = DocumentHeader::new(
        cfg.source.clone(),
        started.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    );

    let mut writer = DocumentWriter::new(sink);
    writer
        .open(&header)
        .with_context(|| format!("write header to {}", path.display()))?;
    tracing::info!(source = %cfg.source, "scraping into {}", path.display());

    let summary = Driver::new(fetcher, &mut writer)
        .with_abort(abort)
        .with_max_pages(cfg.max_pages)
        .run();

    writer
        .finish()
        .with_context(|| format!("write footer to {}", path.display()))?;
    debug_assert!(writer.is_finished());

    tracing::info!("scraping completed ({}). Result written to {}", summary.termination, path.display());
    tracing::info!(
        pages = summary.pages_scraped,
        fetched = summary.items_fetched,
        skipped = summary.items_skipped,
        "actually written={}",
        writer.written()
    );

    Ok(ScrapeReport { path, summary })
}
