//! `pagedump config` – show where the config lives and what it says.

use anyhow::Result;
use pagedump_core::config::{self, PagedumpConfig};

pub fn run_config(cfg: &PagedumpConfig) -> Result<()> {
    println!("# {}", config::config_path()?.display());
    print!("{}", config::render(cfg)?);
    Ok(())
}
