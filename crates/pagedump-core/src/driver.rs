//! Pagination driver: walks pages 1, 2, 3, ... until the source runs out,
//! forwarding every item to the document writer.
//!
//! Nothing escapes `run` as an error. End of data stops the walk normally; any
//! other fetch failure stops it early; an item that fails to serialize or
//! write is skipped. The caller seals the document afterwards either way.

use std::fmt;
use std::io::Write;

use crate::control::AbortToken;
use crate::fetch::{FetchError, PageFetcher};
use crate::output::DocumentWriter;

/// Why the page walk stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// `page` reported end of data; pages before it were all scraped.
    LastPage { page: u32 },
    /// Fetching `page` failed for good (retries spent or not retryable).
    FetchFailed { page: u32, error: String },
    /// Abort was requested before or while fetching `page`.
    Aborted { page: u32 },
    /// The configured page cap was reached; `page` was not fetched.
    PageLimit { page: u32 },
}

impl Termination {
    /// True when the run stopped for a reason other than running out of pages
    /// or hitting the configured cap.
    pub fn is_failure(&self) -> bool {
        matches!(self, Termination::FetchFailed { .. } | Termination::Aborted { .. })
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::LastPage { page } => write!(f, "reached last page at {}", page),
            Termination::FetchFailed { page, error } => write!(f, "fetch page {} failed: {}", page, error),
            Termination::Aborted { page } => write!(f, "aborted at page {}", page),
            Termination::PageLimit { page } => write!(f, "page limit reached before page {}", page),
        }
    }
}

/// Counters for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub pages_scraped: u32,
    pub items_fetched: u64,
    pub items_written: u64,
    /// Items dropped because they failed to serialize or to write.
    pub items_skipped: u64,
    pub termination: Termination,
}

pub struct Driver<'w, F, W: Write> {
    fetcher: F,
    writer: &'w mut DocumentWriter<W>,
    abort: AbortToken,
    max_pages: Option<u32>,
}

impl<'w, F: PageFetcher, W: Write> Driver<'w, F, W> {
    /// `writer` must already be open; sealing it stays with the caller.
    pub fn new(fetcher: F, writer: &'w mut DocumentWriter<W>) -> Self {
        Self {
            fetcher,
            writer,
            abort: AbortToken::new(),
            max_pages: None,
        }
    }

    pub fn with_abort(mut self, abort: AbortToken) -> Self {
        self.abort = abort;
        self
    }

    /// Stop after `max` pages (None = until end of data).
    pub fn with_max_pages(mut self, max: Option<u32>) -> Self {
        self.max_pages = max;
        self
    }

    pub fn run(&mut self) -> RunSummary {
        let mut pages_scraped = 0u32;
        let mut items_fetched = 0u64;
        let mut items_written = 0u64;
        let mut items_skipped = 0u64;
        let mut page = 1u32;

        let termination = loop {
            if self.abort.is_aborted() {
                tracing::warn!("abort requested, stopping before page {}", page);
                break Termination::Aborted { page };
            }
            if self.max_pages.is_some_and(|max| page > max) {
                tracing::info!("page limit reached, stopping before page {}", page);
                break Termination::PageLimit { page };
            }

            let items = match self.fetcher.fetch(page) {
                Ok(items) => items,
                Err(FetchError::EndOfData) => {
                    tracing::info!("reached last page at {}", page);
                    break Termination::LastPage { page };
                }
                Err(FetchError::Aborted) => {
                    tracing::warn!("fetch page {} aborted", page);
                    break Termination::Aborted { page };
                }
                Err(e) => {
                    tracing::error!("fetch page {} error: {}", page, e);
                    break Termination::FetchFailed {
                        page,
                        error: e.to_string(),
                    };
                }
            };

            let count = items.len();
            for item in items {
                items_fetched += 1;
                let bytes = match serde_json::to_vec(&item) {
                    Ok(b) => b,
                    Err(e) => {
                        tracing::warn!(page, "serialize item error: {}", e);
                        items_skipped += 1;
                        continue;
                    }
                };
                if self.writer.write_item(&bytes) {
                    items_written += 1;
                } else {
                    items_skipped += 1;
                }
            }

            tracing::info!(items = count, "page {} scraped", page);
            pages_scraped += 1;
            page = match page.checked_add(1) {
                Some(next) => next,
                None => break Termination::PageLimit { page },
            };
        };

        RunSummary {
            pages_scraped,
            items_fetched,
            items_written,
            items_skipped,
            termination,
        }
    }
}
