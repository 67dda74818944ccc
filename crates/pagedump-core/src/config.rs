use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry policy parameters (optional `[retry]` section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per page (including the first).
    pub max_attempts: u32,
    /// Wait in seconds before the first retry (e.g. 0.5 = 500ms).
    pub min_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            min_delay_secs: 1.0,
            max_delay_secs: 10,
        }
    }
}

impl RetryConfig {
    /// Reject delays that cannot be represented as a `Duration`.
    pub fn validate(&self) -> Result<()> {
        if !self.min_delay_secs.is_finite() || self.min_delay_secs < 0.0 {
            anyhow::bail!(
                "retry.min_delay_secs must be finite and non-negative, got {}",
                self.min_delay_secs
            );
        }
        if Duration::try_from_secs_f64(self.min_delay_secs).is_err() {
            anyhow::bail!("retry.min_delay_secs is out of range: {}", self.min_delay_secs);
        }
        Ok(())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    /// Out-of-range `min_delay_secs` (inf, NaN, huge) is clamped to `max_delay`.
    fn from(c: &RetryConfig) -> Self {
        let max_delay = Duration::from_secs(c.max_delay_secs);
        let min_delay = Duration::try_from_secs_f64(c.min_delay_secs.max(0.0))
            .unwrap_or(max_delay)
            .min(max_delay);
        RetryPolicy {
            max_attempts: c.max_attempts.max(1),
            min_delay,
            max_delay,
        }
    }
}

/// Global configuration loaded from `~/.config/pagedump/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedumpConfig {
    /// Source identifier; written to the document and used in the file name.
    pub source: String,
    /// Page URL; `{page}` is replaced with the 1-based page index.
    pub url_template: String,
    /// Directory the output document is created in (None = current dir).
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Stop after this many pages even if the source has more (None = no cap).
    #[serde(default)]
    pub max_pages: Option<u32>,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    pub connect_timeout_secs: u64,
    /// Whole-request timeout, body included.
    pub request_timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for PagedumpConfig {
    fn default() -> Self {
        Self {
            source: "steam-spy".to_string(),
            url_template: "https://steamspy.com/api.php?request=all&page={page}".to_string(),
            output_dir: None,
            max_pages: None,
            user_agent: concat!("pagedump/", env!("CARGO_PKG_VERSION")).to_string(),
            connect_timeout_secs: 15,
            request_timeout_secs: 120,
            retry: None,
        }
    }
}

impl PagedumpConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryPolicy::from)
            .unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pagedump")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Serialize a config the way it is stored on disk.
pub fn render(cfg: &PagedumpConfig) -> Result<String> {
    Ok(toml::to_string_pretty(cfg)?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PagedumpConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PagedumpConfig::default();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, render(&default_cfg)?)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    parse(&data).with_context(|| format!("invalid config {}", path.display()))
}

/// Parse and validate config.toml contents.
pub fn parse(data: &str) -> Result<PagedumpConfig> {
    let cfg: PagedumpConfig = toml::from_str(data)?;
    if let Some(retry) = &cfg.retry {
        retry.validate()?;
    }
    Ok(cfg)
}
