//! Target URL normalization.

use tracing::debug;
use url::Url;

use super::error::ParseError;

/// Scheme assumed when the user omits one.
const DEFAULT_SCHEME_PREFIX: &str = "http://";

/// Parses the target URL, prepending `http://` when no `scheme://` is present.
///
/// # Errors
///
/// Returns [`ParseError::InvalidUrl`] when the (possibly prefixed) URL cannot
/// be parsed.
///
/// # Examples
///
/// ```
/// use hfetch_core::parser::normalize_url;
///
/// let url = normalize_url("example.com/data").unwrap();
/// assert_eq!(url.as_str(), "http://example.com/data");
/// ```
pub fn normalize_url(raw: &str) -> Result<Url, ParseError> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        debug!(url = raw, "no scheme given, assuming http");
        format!("{DEFAULT_SCHEME_PREFIX}{raw}")
    };

    Url::parse(&candidate).map_err(|e| ParseError::invalid_url(&candidate, &e.to_string()))
}
