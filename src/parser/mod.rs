//! Parsing of command-line values.
//!
//! Everything the user types that needs more than a string:
//!
//! - Size strings with an optional `K`/`M`/`G` suffix ([`parse_size`])
//! - `Name: value` header lines ([`parse_header_line`])
//! - The target URL, with `http://` assumed when no scheme is given ([`normalize_url`])
//! - Content-type guessing for request bodies ([`infer_content_type`])
//!
//! # Example
//!
//! ```
//! use hfetch_core::parser::{infer_content_type, parse_size};
//!
//! assert_eq!(parse_size("5M").unwrap(), 5 * 1024 * 1024);
//! assert_eq!(infer_content_type("a=1"), Some("application/x-www-form-urlencoded"));
//! ```

mod content_type;
mod error;
mod header;
mod size;
mod url;

pub use content_type::{
    FORM_CONTENT_TYPE, JSON_CONTENT_TYPE, infer_content_type, infer_content_type_bytes,
};
pub use error::ParseError;
pub use header::parse_header_line;
pub use size::parse_size;
pub use url::normalize_url;
