//! Error types for the transfer module.
//!
//! Each variant carries the URL or path it concerns so the single top-level
//! handler can print a useful diagnostic.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while sending the request or streaming the response.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// The request could not be assembled (bad header/body combination).
    #[error("failed to build request for {url}: {source}")]
    Request {
        /// The target URL.
        url: String,
        /// The underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The target URL.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The request timed out.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The target URL.
        url: String,
    },

    /// Reading the response body failed.
    #[error("error reading response from {url}: {source}")]
    ResponseRead {
        /// The target URL.
        url: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be opened.
    #[error("cannot open output file {path}: {source}")]
    OutputOpen {
        /// The output path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Writing to the output destination failed.
    #[error("error writing to {destination}: {source}")]
    OutputWrite {
        /// Display name of the destination (`stdout` or a path).
        destination: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl TransferError {
    /// Creates a network or timeout error from a reqwest error.
    pub fn from_send(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates a request-build error.
    pub fn request(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Request {
            url: url.into(),
            source,
        }
    }

    /// Creates a response read error.
    pub fn response_read(url: impl Into<String>, source: std::io::Error) -> Self {
        Self::ResponseRead {
            url: url.into(),
            source,
        }
    }

    /// Creates an output-open error.
    pub fn output_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputOpen {
            path: path.into(),
            source,
        }
    }

    /// Creates an output write error.
    pub fn output_write(destination: impl Into<String>, source: std::io::Error) -> Self {
        Self::OutputWrite {
            destination: destination.into(),
            source,
        }
    }
}
