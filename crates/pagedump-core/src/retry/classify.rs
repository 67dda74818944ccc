//! Classify HTTP status and curl errors into retry policy error kinds.

use super::error::FetchError;
use super::policy::ErrorKind;

/// Whether an HTTP status should be retried.
///
/// Rules are checked in order: [200, 400) succeeds, 500 is the source's
/// "no more pages" answer and is final, anything else below 200 or at/above
/// 400 is retried.
pub fn is_retryable_status(code: u32) -> bool {
    if (200..400).contains(&code) {
        return false;
    }
    if code == 500 {
        return false;
    }
    true
}

/// Classify an HTTP status code for retry decisions.
pub fn classify_http_status(code: u32) -> ErrorKind {
    if is_retryable_status(code) {
        ErrorKind::Http(code)
    } else {
        ErrorKind::Terminal
    }
}

/// Classify a curl error for retry decisions. Every transport failure is
/// retried; the split only matters for logging.
pub fn classify_curl_error(e: &curl::Error) -> ErrorKind {
    if e.is_operation_timedout() {
        ErrorKind::Timeout
    } else {
        ErrorKind::Connection
    }
}

/// Classify a fetch error into an ErrorKind.
pub fn classify(e: &FetchError) -> ErrorKind {
    match e {
        FetchError::Transport(ce) => classify_curl_error(ce),
        FetchError::Http(code) => classify_http_status(*code),
        FetchError::EndOfData | FetchError::Decode(_) | FetchError::Aborted => ErrorKind::Terminal,
    }
}
