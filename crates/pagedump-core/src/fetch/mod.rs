//! Page fetching: the `PageFetcher` seam the driver pulls from, and the
//! response-body decoding shared by fetcher implementations.

mod http;

pub use crate::retry::FetchError;
pub use http::{HttpPageFetcher, HttpPageFetcherBuilder};

use serde::Serialize;
use serde_json::Value;

/// Source of pages. `fetch` applies the retry policy internally; whatever it
/// returns is final for that page.
pub trait PageFetcher {
    /// Opaque record forwarded to the writer as serialized JSON.
    type Item: Serialize;

    /// Fetch page `page` (1-based). `Err(FetchError::EndOfData)` means the
    /// source has no page at this index or beyond.
    fn fetch(&mut self, page: u32) -> Result<Vec<Self::Item>, FetchError>;
}

impl<F: PageFetcher + ?Sized> PageFetcher for &mut F {
    type Item = F::Item;

    fn fetch(&mut self, page: u32) -> Result<Vec<Self::Item>, FetchError> {
        (**self).fetch(page)
    }
}

/// Split a page body into items.
///
/// An object yields its values in document order (SteamSpy keys every app by
/// its appid); an array yields its elements. Anything else is a decode error.
pub fn decode_page(body: &[u8]) -> Result<Vec<Value>, FetchError> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(map.into_iter().map(|(_, v)| v).collect()),
        Value::Array(items) => Ok(items),
        other => Err(FetchError::Decode(serde::de::Error::custom(format!(
            "expected object or array, got {}",
            kind_name(&other)
        )))),
    }
}

fn kind_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_body_yields_values_in_document_order() {
        let body = br#"{"730":{"appid":730,"name":"b"},"10":{"appid":10,"name":"a"}}"#;
        let items = decode_page(body).unwrap();
        assert_eq!(items, vec![json!({"appid":730,"name":"b"}), json!({"appid":10,"name":"a"})]);
    }

    #[test]
    fn array_body_yields_elements() {
        let items = decode_page(br#"[{"id":1},{"id":2},3]"#).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[2], json!(3));
    }

    #[test]
    fn empty_object_is_an_empty_page() {
        assert!(decode_page(b"{}").unwrap().is_empty());
    }

    #[test]
    fn scalar_or_garbage_is_decode_error() {
        assert!(matches!(decode_page(b"42"), Err(FetchError::Decode(_))));
        assert!(matches!(decode_page(b"<html>"), Err(FetchError::Decode(_))));
    }
}
