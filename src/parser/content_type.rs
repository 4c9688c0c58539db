//! Best-effort `Content-Type` guessing for request bodies.

use std::sync::LazyLock;

use regex::Regex;
use serde::de::IgnoredAny;
use tracing::debug;

/// MIME type reported for bodies that parse as JSON.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// MIME type reported for `key=value&key=value` bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// One or more `key=value` pairs joined by `&`. Keys are non-empty, values may be empty.
#[allow(clippy::expect_used)]
static FORM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^=&]+=[^&]*(?:&[^=&]+=[^&]*)*$").expect("form regex is valid") // Static pattern, safe to panic
});

/// Guesses the content type of a request body.
///
/// JSON is tried first (any single value: object, array, string, number or
/// literal, with surrounding whitespace). Bodies that are not JSON but look
/// like `key=value` pairs are classified as form data. Anything else yields
/// `None` and the caller sends no `Content-Type` header.
///
/// # Examples
///
/// ```
/// use hfetch_core::parser::infer_content_type;
///
/// assert_eq!(infer_content_type(r#"{"a":1}"#), Some("application/json"));
/// assert_eq!(infer_content_type("a=1&b=2"), Some("application/x-www-form-urlencoded"));
/// assert_eq!(infer_content_type("hello"), None);
/// ```
#[must_use]
pub fn infer_content_type(body: &str) -> Option<&'static str> {
    if serde_json::from_str::<IgnoredAny>(body).is_ok() {
        debug!("body looks like JSON");
        return Some(JSON_CONTENT_TYPE);
    }

    if FORM_PATTERN.is_match(body) {
        debug!("body looks like form data");
        return Some(FORM_CONTENT_TYPE);
    }

    debug!("no content type inferred for body");
    None
}

/// Like [`infer_content_type`], for raw bytes. Non-UTF-8 bodies get no type.
#[must_use]
pub fn infer_content_type_bytes(body: &[u8]) -> Option<&'static str> {
    std::str::from_utf8(body).ok().and_then(infer_content_type)
}
