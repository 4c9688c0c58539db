//! hfetch Core Library
//!
//! This library provides the core of the `hfetch` command-line HTTP client:
//! turning command-line style options into a single request, sending it, and
//! streaming the response to stdout or a file.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`parser`] - Size strings, header lines, URLs and body content-type inference
//! - [`config`] - Resolution of raw options into an immutable [`RequestConfig`]
//! - [`transfer`] - HTTP client, throttled upload, limited download and output handling

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod parser;
pub mod transfer;
mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, OutputTarget, RequestConfig, RequestOptions};
pub use parser::{ParseError, infer_content_type, parse_header_line, parse_size};
pub use transfer::{ClientSettings, HttpClient, TransferError, TransferSummary, perform};
