//! Page fetch error type for retry classification.

use thiserror::Error;

/// Error returned by a single page fetch attempt (curl failure, HTTP status,
/// undecodable body) or by the fetch as a whole once retries are spent.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source has no further pages. Normal termination, not a failure.
    #[error("no more pages")]
    EndOfData,
    /// Curl reported an error (timeout, connection reset, DNS, etc.).
    #[error("transport: {0}")]
    Transport(#[from] curl::Error),
    /// Response status outside [200, 400).
    #[error("HTTP {0}")]
    Http(u32),
    /// Response body was not a JSON object or array.
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
    /// Stopped by an external shutdown request.
    #[error("aborted")]
    Aborted,
}
