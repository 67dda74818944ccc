//! Append-only JSON document writer: header, comma-separated items, footer.

use serde::Serialize;
use std::io::{self, Write};
use thiserror::Error;

/// Document format version written to `schema_version`.
pub const SCHEMA_VERSION: u32 = 1;

const DATA_OPEN: &[u8] = br#","data":["#;
const FOOTER: &[u8] = b"]}";

/// Failure writing the document framing.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("sink write failed: {0}")]
    Io(#[from] io::Error),
    #[error("document already opened")]
    AlreadyOpen,
    #[error("document not opened")]
    NotOpen,
    #[error("document already finished")]
    AlreadyFinished,
}

/// Fixed top-level fields written before `data`. Field order is the
/// on-disk key order.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentHeader {
    pub schema_version: u32,
    pub scraped_at: String,
    pub source: String,
}

impl DocumentHeader {
    pub fn new(source: impl Into<String>, scraped_at: impl Into<String>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            scraped_at: scraped_at.into(),
            source: source.into(),
        }
    }

    /// Header stamped with the current UTC time (RFC 3339, seconds, `Z`).
    pub fn now(source: impl Into<String>) -> Self {
        let at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
        Self::new(source, at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    New,
    Open,
    Finished,
}

/// Streams `{"schema_version":..,"scraped_at":..,"source":..,"data":[...]}`
/// to `W` one item at a time. Bytes already written are never revisited.
pub struct DocumentWriter<W: Write> {
    sink: W,
    state: State,
    wrote_first: bool,
    written: u64,
}

impl<W: Write> DocumentWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            sink,
            state: State::New,
            wrote_first: false,
            written: 0,
        }
    }

    /// Write the header up to and including `"data":[`.
    pub fn open(&mut self, header: &DocumentHeader) -> Result<(), SinkError> {
        match self.state {
            State::New => {}
            State::Open => return Err(SinkError::AlreadyOpen),
            State::Finished => return Err(SinkError::AlreadyFinished),
        }
        let mut head = serde_json::to_vec(header).map_err(io::Error::from)?;
        // Drop the closing brace so `data` lands inside the same object.
        head.pop();
        self.sink.write_all(&head)?;
        self.sink.write_all(DATA_OPEN)?;
        self.state = State::Open;
        Ok(())
    }

    /// Append one serialized JSON value to `data`.
    ///
    /// A sink failure is logged and the item dropped (the count is not
    /// incremented); returns whether the item was written.
    pub fn write_item(&mut self, bytes: &[u8]) -> bool {
        if self.state != State::Open {
            tracing::warn!(state = ?self.state, "write_item outside an open document; item dropped");
            return false;
        }
        // Separator and item go out in one write so a failed item cannot
        // leave a dangling comma behind.
        let res = if self.wrote_first {
            let mut framed = Vec::with_capacity(bytes.len() + 1);
            framed.push(b',');
            framed.extend_from_slice(bytes);
            self.sink.write_all(&framed)
        } else {
            self.sink.write_all(bytes)
        };
        if let Err(e) = res {
            tracing::warn!(written = self.written, "write item error: {}", e);
            return false;
        }
        self.wrote_first = true;
        self.written += 1;
        true
    }

    /// Close `data` and the object, then flush. The document is valid JSON
    /// once this returns Ok.
    pub fn finish(&mut self) -> Result<(), SinkError> {
        match self.state {
            State::Open => {}
            State::New => return Err(SinkError::NotOpen),
            State::Finished => return Err(SinkError::AlreadyFinished),
        }
        self.sink.write_all(FOOTER)?;
        self.sink.flush()?;
        self.state = State::Finished;
        Ok(())
    }

    /// Items actually written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
