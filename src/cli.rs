//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;
use hfetch_core::RequestOptions;
use hfetch_core::parser::{parse_header_line, parse_size};
use reqwest::header::{HeaderName, HeaderValue};

/// Transfer a URL.
///
/// hfetch sends one HTTP request and writes the response body to stdout or a
/// file, with optional upload throttling and a download size cap.
#[derive(Parser, Debug)]
#[command(name = "hfetch")]
#[command(author, version, about)]
pub struct Args {
    /// HTTP POST data; use @FILE to read the body from FILE
    #[arg(short = 'd', long, value_name = "DATA")]
    pub data: Option<String>,

    /// Put the post data in a GET request instead of POST
    #[arg(short = 'G', long)]
    pub get: bool,

    /// Write the response to FILE instead of stdout
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write output to a file named like the remote file
    #[arg(short = 'O', long)]
    pub remote_name: bool,

    /// Request method to use
    #[arg(short = 'X', long = "request", value_name = "COMMAND")]
    pub request: Option<String>,

    /// Pass a custom header to the server (repeatable)
    #[arg(short = 'H', long = "header", value_name = "LINE", value_parser = parse_header_line)]
    pub headers: Vec<(HeaderName, HeaderValue)>,

    /// Show document info only (HEAD request)
    #[arg(short = 'I', long)]
    pub head: bool,

    /// Limit upload speed to RATE bytes/second (K, M and G suffixes allowed)
    #[arg(long, value_name = "RATE", value_parser = parse_size)]
    pub limit_rate: Option<u64>,

    /// Maximum number of response bytes to write (K, M and G suffixes allowed)
    #[arg(long, value_name = "BYTES", value_parser = parse_size)]
    pub max_filesize: Option<u64>,

    /// Print the request line and headers; repeat to raise log detail
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Maximum time allowed for connection in seconds (1-3600)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: Option<u64>,

    /// Maximum time allowed for the whole transfer in seconds (1-86400)
    #[arg(short = 'm', long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..=86400))]
    pub max_time: Option<u64>,

    /// User-Agent to send to the server
    #[arg(short = 'A', long, value_name = "NAME")]
    pub user_agent: Option<String>,

    /// Skip loading the config file
    #[arg(long)]
    pub no_config: bool,

    /// URL to fetch; http:// is assumed when no scheme is given
    pub url: Option<String>,
}

impl Args {
    /// Converts the request-shaping flags into library options.
    ///
    /// `limit_rate` and `max_filesize` are passed through as given; config file
    /// defaults are merged by the caller.
    pub fn request_options(&self) -> RequestOptions {
        RequestOptions {
            url: self.url.clone(),
            data: self.data.clone(),
            data_with_get: self.get,
            output: self.output.clone(),
            remote_name: self.remote_name,
            method: self.request.clone(),
            headers: self.headers.clone(),
            info_only: self.head,
            limit_rate: self.limit_rate,
            max_filesize: self.max_filesize,
            verbose: self.verbose,
        }
    }
}
