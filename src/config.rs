//! Resolved request configuration.
//!
//! [`RequestOptions`] holds the values as the user supplied them;
//! [`RequestConfig::resolve`] turns them into the immutable settings for the
//! single request this process sends: final URL, method, headers and body.

use std::path::PathBuf;

use reqwest::Method;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::parser::{ParseError, infer_content_type_bytes, normalize_url};

/// Errors raised while resolving the request configuration.
///
/// All of these happen before any network activity.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A user-supplied value failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The file named by `-d @FILE` could not be read.
    #[error("failed to read request body from '{path}': {source}")]
    DataFile {
        /// Path given after `@`.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// `-X` named something that is not a valid HTTP method token.
    #[error("invalid request method '{method}'")]
    InvalidMethod {
        /// The rejected method.
        method: String,
    },
}

impl ConfigError {
    /// Creates a `DataFile` error.
    pub fn data_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DataFile {
            path: path.into(),
            source,
        }
    }
}

/// Where the response body goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Standard output.
    Stdout,
    /// An explicit file (`-o FILE`).
    File(PathBuf),
    /// A file named after the response or URL (`-O`), decided once headers arrive.
    RemoteName,
}

/// Raw request settings, one field per command-line flag.
///
/// Sizes and header lines arrive already parsed; everything else is resolved
/// by [`RequestConfig::resolve`].
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Target URL, possibly without a scheme.
    pub url: Option<String>,
    /// Request body, or `@FILE` to read it from a file.
    pub data: Option<String>,
    /// Send the body with GET instead of POST.
    pub data_with_get: bool,
    /// Explicit output file.
    pub output: Option<PathBuf>,
    /// Name the output file after the remote resource.
    pub remote_name: bool,
    /// Explicit request method.
    pub method: Option<String>,
    /// Custom headers, in the order given.
    pub headers: Vec<(HeaderName, HeaderValue)>,
    /// HEAD request; show document info only.
    pub info_only: bool,
    /// Upload rate cap in bytes per second.
    pub limit_rate: Option<u64>,
    /// Maximum number of response bytes to write.
    pub max_filesize: Option<u64>,
    /// Verbosity count.
    pub verbose: u8,
}

/// Immutable settings for the one request this process sends.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Normalized target URL.
    pub url: Url,
    /// Request method.
    pub method: Method,
    /// Outgoing headers, including inferred `Content-Type` and `Content-Length`.
    pub headers: HeaderMap,
    /// Request body.
    pub body: Option<Vec<u8>>,
    /// Upload rate cap in bytes per second. Never zero.
    pub limit_rate: Option<u64>,
    /// Maximum number of response bytes to write.
    pub max_filesize: Option<u64>,
    /// Verbosity count.
    pub verbose: u8,
    /// Response destination.
    pub output: OutputTarget,
    /// HEAD request whose response head is written to the output.
    pub info_only: bool,
}

impl RequestConfig {
    /// Resolves raw options into the final request settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the URL is missing or malformed, the
    /// `@FILE` body cannot be read, or the method is not a valid token.
    #[instrument(skip(options), fields(url = ?options.url))]
    pub fn resolve(options: RequestOptions) -> Result<Self, ConfigError> {
        let raw_url = options.url.as_deref().ok_or(ParseError::MissingUrl)?;
        let url = normalize_url(raw_url)?;

        let body = options.data.as_deref().map(load_body).transpose()?;

        let method = resolve_method(
            options.method.as_deref(),
            options.info_only,
            body.is_some(),
            options.data_with_get,
        )?;

        let headers = build_headers(options.headers, body.as_deref());

        let limit_rate = options.limit_rate.filter(|&rate| rate > 0);
        if options.limit_rate == Some(0) {
            debug!("limit-rate of 0 disables throttling");
        }

        let output = match (options.output, options.remote_name) {
            (Some(path), _) => OutputTarget::File(path),
            (None, true) => OutputTarget::RemoteName,
            (None, false) => OutputTarget::Stdout,
        };

        debug!(%method, %url, headers = headers.len(), has_body = body.is_some(), "request resolved");

        Ok(Self {
            url,
            method,
            headers,
            body,
            limit_rate,
            max_filesize: options.max_filesize,
            verbose: options.verbose,
            output,
            info_only: options.info_only,
        })
    }
}

/// Returns the body bytes for a `-d` argument, reading `@FILE` references.
fn load_body(data: &str) -> Result<Vec<u8>, ConfigError> {
    match data.strip_prefix('@') {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|e| ConfigError::data_file(path, e))?;
            debug!(path, bytes = bytes.len(), "request body loaded from file");
            Ok(bytes)
        }
        None => Ok(data.as_bytes().to_vec()),
    }
}

/// Picks the request method.
///
/// An explicit method always wins. Without one: HEAD for info-only requests,
/// POST when there is a body that is not forced onto GET, otherwise GET.
fn resolve_method(
    explicit: Option<&str>,
    info_only: bool,
    has_body: bool,
    data_with_get: bool,
) -> Result<Method, ConfigError> {
    if let Some(method) = explicit {
        return Method::from_bytes(method.as_bytes()).map_err(|_| ConfigError::InvalidMethod {
            method: method.to_string(),
        });
    }

    let method = if info_only {
        Method::HEAD
    } else if has_body && !data_with_get {
        Method::POST
    } else {
        Method::GET
    };
    Ok(method)
}

/// Builds the outgoing header map, filling in content headers the user left out.
fn build_headers(custom: Vec<(HeaderName, HeaderValue)>, body: Option<&[u8]>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for (name, value) in custom {
        headers.insert(name, value);
    }

    let Some(body) = body else {
        return headers;
    };

    if !headers.contains_key(CONTENT_TYPE)
        && let Some(content_type) = infer_content_type_bytes(body)
    {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    }

    if headers.contains_key(CONTENT_LENGTH) {
        // The user value is sent as given.
        if let Some(declared) = mismatched_content_length(&headers, body.len()) {
            warn!(
                declared = %declared,
                actual = body.len(),
                "Content-Length header does not match request body size"
            );
        }
    } else {
        headers.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
    }

    headers
}

/// Returns the user's `Content-Length` value when it differs from `body_len`.
fn mismatched_content_length(headers: &HeaderMap, body_len: usize) -> Option<String> {
    let value = headers.get(CONTENT_LENGTH)?;
    let declared = value.to_str().ok().map(str::trim);
    match declared.and_then(|v| v.parse::<u64>().ok()) {
        Some(n) if n == body_len as u64 => None,
        _ => Some(String::from_utf8_lossy(value.as_bytes()).into_owned()),
    }
}
