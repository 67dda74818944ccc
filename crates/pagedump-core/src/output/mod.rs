//! Output document lifecycle.
//!
//! The document is created fresh (truncated) at `<dir>/<source>-<YYYYMMDD>.json`
//! and written front to back in one pass. A run that dies before `finish`
//! leaves a truncated, invalid file behind.

mod writer;

pub use writer::{DocumentHeader, DocumentWriter, SinkError, SCHEMA_VERSION};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// `<source>-<YYYYMMDD>.json` for the UTC date of `at`.
pub fn output_file_name(source: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}.json", source, at.format("%Y%m%d"))
}

/// Create (or truncate) the output file for `source` under `dir`.
pub fn create_output(dir: &Path, source: &str, at: DateTime<Utc>) -> Result<(PathBuf, BufWriter<File>)> {
    let path = dir.join(output_file_name(source, at));
    let file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
        .with_context(|| format!("failed to create output file: {}", path.display()))?;
    Ok((path, BufWriter::new(file)))
}
