//! `-H "Name: value"` header lines.

use reqwest::header::{HeaderName, HeaderValue};

use super::error::ParseError;

/// Splits a header line at its first `:` into a validated name and value.
///
/// Surrounding whitespace is trimmed from both parts. The value may be empty.
///
/// # Errors
///
/// Returns [`ParseError::InvalidHeader`] when the line has no `:`, the name
/// is empty, or either part contains bytes not allowed in an HTTP header.
pub fn parse_header_line(line: &str) -> Result<(HeaderName, HeaderValue), ParseError> {
    let Some((raw_name, raw_value)) = line.split_once(':') else {
        return Err(ParseError::invalid_header(line));
    };

    let name = raw_name.trim();
    if name.is_empty() {
        return Err(ParseError::invalid_header(line));
    }

    let name =
        HeaderName::from_bytes(name.as_bytes()).map_err(|_| ParseError::invalid_header(line))?;
    let value =
        HeaderValue::from_str(raw_value.trim()).map_err(|_| ParseError::invalid_header(line))?;
    Ok((name, value))
}
