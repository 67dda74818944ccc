//! Retry and backoff policy.
//!
//! Classifies each failed HTTP attempt (status code or curl error) and
//! decides whether to try the same page again and how long to wait first.
//! Status 500 is never retried: the source uses it to say there are no more
//! pages.

mod classify;
mod error;
mod policy;
mod run;

pub use classify::{classify, classify_curl_error, classify_http_status, is_retryable_status};
pub use error::FetchError;
pub use policy::{ErrorKind, RetryDecision, RetryPolicy};
pub use run::run_with_retry;
