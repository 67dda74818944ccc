//! Blocking HTTP page fetcher on a reused libcurl easy handle.

use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Duration;

use super::{decode_page, FetchError, PageFetcher};
use crate::config::PagedumpConfig;
use crate::control::AbortToken;
use crate::retry::{run_with_retry, RetryPolicy};

/// Placeholder in the URL template replaced by the page index.
pub const PAGE_PLACEHOLDER: &str = "{page}";

/// Builder for `HttpPageFetcher`. Validates the URL template on `build`.
pub struct HttpPageFetcherBuilder {
    url_template: String,
    user_agent: String,
    connect_timeout: Duration,
    request_timeout: Duration,
    policy: RetryPolicy,
    abort: AbortToken,
}

impl HttpPageFetcherBuilder {
    pub fn new(url_template: impl Into<String>) -> Self {
        let defaults = PagedumpConfig::default();
        Self {
            url_template: url_template.into(),
            user_agent: defaults.user_agent,
            connect_timeout: Duration::from_secs(defaults.connect_timeout_secs),
            request_timeout: Duration::from_secs(defaults.request_timeout_secs),
            policy: RetryPolicy::default(),
            abort: AbortToken::new(),
        }
    }

    /// Builder preloaded with everything `cfg` says about HTTP.
    pub fn from_config(cfg: &PagedumpConfig) -> Self {
        Self::new(cfg.url_template.clone())
            .user_agent(cfg.user_agent.clone())
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
            .request_timeout(Duration::from_secs(cfg.request_timeout_secs))
            .retry_policy(cfg.retry_policy())
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn connect_timeout(mut self, d: Duration) -> Self {
        self.connect_timeout = d;
        self
    }

    pub fn request_timeout(mut self, d: Duration) -> Self {
        self.request_timeout = d;
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Token checked during retry backoff.
    pub fn abort_token(mut self, abort: AbortToken) -> Self {
        self.abort = abort;
        self
    }

    pub fn build(self) -> Result<HttpPageFetcher> {
        if !self.url_template.contains(PAGE_PLACEHOLDER) {
            anyhow::bail!(
                "url template {:?} has no {} placeholder",
                self.url_template,
                PAGE_PLACEHOLDER
            );
        }
        let sample = render_url(&self.url_template, 1);
        url::Url::parse(&sample).with_context(|| format!("invalid page URL: {}", sample))?;

        let mut easy = curl::easy::Easy::new();
        easy.useragent(&self.user_agent)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.request_timeout)?;
        // Enables the progress callback, which cancels an in-flight request on abort.
        easy.progress(true)?;

        Ok(HttpPageFetcher {
            easy,
            url_template: self.url_template,
            policy: self.policy,
            abort: self.abort,
        })
    }
}

/// Substitute `page` into every `{page}` of `template`.
pub fn render_url(template: &str, page: u32) -> String {
    template.replace(PAGE_PLACEHOLDER, &page.to_string())
}

/// Fetches one page per call with GET, retrying per `RetryPolicy`.
/// A final HTTP 500 is reported as `FetchError::EndOfData`.
pub struct HttpPageFetcher {
    easy: curl::easy::Easy,
    url_template: String,
    policy: RetryPolicy,
    abort: AbortToken,
}

impl HttpPageFetcher {
    pub fn page_url(&self, page: u32) -> String {
        render_url(&self.url_template, page)
    }

    /// One GET. Returns the body for statuses in [200, 400).
    fn attempt(&mut self, url: &str) -> Result<Vec<u8>, FetchError> {
        if self.abort.is_aborted() {
            return Err(FetchError::Aborted);
        }
        let mut body = Vec::new();
        self.easy.url(url)?;
        self.easy.get(true)?;
        let abort = &self.abort;
        let performed = {
            let mut transfer = self.easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.progress_function(|_, _, _, _| !abort.is_aborted())?;
            transfer.perform()
        };
        if let Err(e) = performed {
            if abort.is_aborted() {
                return Err(FetchError::Aborted);
            }
            return Err(e.into());
        }

        let code = self.easy.response_code()?;
        if !(200..400).contains(&code) {
            return Err(FetchError::Http(code));
        }
        Ok(body)
    }
}

impl PageFetcher for HttpPageFetcher {
    type Item = Value;

    fn fetch(&mut self, page: u32) -> Result<Vec<Value>, FetchError> {
        let url = self.page_url(page);
        let policy = self.policy;
        let abort = self.abort.clone();

        let body = run_with_retry(&policy, &abort, |attempt| {
            let r = self.attempt(&url);
            if let Err(e) = &r {
                tracing::debug!(page, attempt, "GET {} failed: {}", url, e);
            }
            r
        });

        match body {
            Ok(body) => {
                tracing::debug!(page, bytes = body.len(), "page body received");
                decode_page(&body)
            }
            Err(FetchError::Http(500)) => Err(FetchError::EndOfData),
            Err(e) => Err(e),
        }
    }
}
