//! Error types for command-line value parsing.

use thiserror::Error;

/// Errors that can occur while parsing user-supplied values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A size string was empty.
    #[error("empty size value\n  Suggestion: Use a byte count such as 500, 11K, 5M or 2G")]
    EmptySize,

    /// A size string did not contain a valid base-10 integer.
    #[error("invalid size '{value}': {reason}\n  Suggestion: Use a byte count such as 500, 11K, 5M or 2G")]
    InvalidSize {
        /// The rejected input.
        value: String,
        /// Why the number failed to parse.
        reason: String,
    },

    /// A size string describes more bytes than fit in 64 bits.
    #[error("size '{value}' is too large")]
    SizeOverflow {
        /// The rejected input.
        value: String,
    },

    /// A header line had no `:` separator or an empty name.
    #[error("invalid header '{line}'\n  Suggestion: Use the form \"Name: value\"")]
    InvalidHeader {
        /// The rejected header line.
        line: String,
    },

    /// No target URL was given.
    #[error("no URL specified")]
    MissingUrl,

    /// The target URL could not be parsed.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL that failed to parse (after scheme defaulting).
        url: String,
        /// Why the URL is invalid.
        reason: String,
    },
}

impl ParseError {
    /// Creates an `InvalidSize` error.
    #[must_use]
    pub fn invalid_size(value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSize {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Creates a `SizeOverflow` error.
    #[must_use]
    pub fn size_overflow(value: &str) -> Self {
        Self::SizeOverflow {
            value: value.to_string(),
        }
    }

    /// Creates an `InvalidHeader` error.
    #[must_use]
    pub fn invalid_header(line: &str) -> Self {
        Self::InvalidHeader {
            line: line.to_string(),
        }
    }

    /// Creates an `InvalidUrl` error.
    #[must_use]
    pub fn invalid_url(url: &str, reason: &str) -> Self {
        Self::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_invalid_size_display() {
        let msg = ParseError::invalid_size("abcK", "invalid digit found in string").to_string();
        assert!(msg.contains("abcK"), "Expected input in: {msg}");
        assert!(msg.contains("Suggestion"), "Expected suggestion in: {msg}");
    }

    #[test]
    fn test_parse_error_invalid_header_display() {
        let msg = ParseError::invalid_header("NoColonHere").to_string();
        assert!(msg.contains("NoColonHere"));
        assert!(msg.contains("Name: value"));
    }

    #[test]
    fn test_parse_error_missing_url_display() {
        assert_eq!(ParseError::MissingUrl.to_string(), "no URL specified");
    }
}
