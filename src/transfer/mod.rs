//! Request dispatch and response streaming.
//!
//! This module sends the one request described by a
//! [`RequestConfig`](crate::config::RequestConfig) and copies the response
//! body to its destination.
//!
//! # Features
//!
//! - Token-bucket throttling of the request body (`--limit-rate`)
//! - Fixed 1024-byte copy loop with an optional byte cap (`--max-filesize`)
//! - Output filename derivation from `Content-Disposition` or the URL (`-O`)
//! - Request head printing for `-v`, response head printing for `-I`
//!
//! # Example
//!
//! ```no_run
//! use hfetch_core::config::{RequestConfig, RequestOptions};
//! use hfetch_core::transfer::{ClientSettings, HttpClient, perform};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RequestConfig::resolve(RequestOptions {
//!     url: Some("https://example.com/data.json".to_string()),
//!     max_filesize: Some(4096),
//!     ..RequestOptions::default()
//! })?;
//! let client = HttpClient::new(&ClientSettings::default())?;
//! let summary = perform(&config, &client).await?;
//! eprintln!("wrote {} bytes", summary.bytes_written);
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
pub mod output;
pub mod rate_limiter;
mod stream;

use std::io::Write;

use futures_util::TryStreamExt;
use reqwest::{Request, StatusCode};
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;
use tracing::{info, instrument, warn};

pub use client::{ClientSettings, HttpClient, render_request_head, render_response_head};
pub use constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_REMOTE_NAME, TRANSFER_BUFFER_SIZE, UPLOAD_CHUNK_SIZE,
};
pub use error::TransferError;
pub use output::{Destination, OutputWriter, remote_name};
pub use rate_limiter::{TokenBucket, throttled_body};
pub use stream::{CopyError, CopyOutcome, copy_limited};

use crate::config::{OutputTarget, RequestConfig};

/// What a completed transfer did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSummary {
    /// Response status.
    pub status: StatusCode,
    /// Where the body was written.
    pub destination: Destination,
    /// Bytes of body written (excluding any `-I` response head).
    pub bytes_written: u64,
    /// Whether `--max-filesize` cut the body short.
    pub limit_reached: bool,
}

/// Sends the request described by `config` and streams the response.
///
/// Non-success statuses are logged and their bodies written like any other.
///
/// # Errors
///
/// Returns [`TransferError`] on the first failure: request build, network,
/// output open, response read, or output write. Nothing is retried.
#[instrument(skip_all, fields(method = %config.method, url = %config.url))]
pub async fn perform(
    config: &RequestConfig,
    client: &HttpClient,
) -> Result<TransferSummary, TransferError> {
    let request = client.build_request(config)?;

    if config.verbose > 0 {
        print_request_head(&request, config.output == OutputTarget::Stdout)?;
    }

    let response = client.execute(request).await?;
    let status = response.status();
    if status.is_success() {
        info!(%status, "response received");
    } else {
        warn!(%status, "server returned non-success status");
    }

    let destination = Destination::resolve(&config.output, response.headers(), &config.url);
    info!(%destination, "writing response");
    let mut writer = destination.open().await?;

    if config.info_only {
        writer
            .write_all(render_response_head(&response).as_bytes())
            .await
            .map_err(|e| TransferError::output_write(destination.to_string(), e))?;
    }

    let body = StreamReader::new(response.bytes_stream().map_err(std::io::Error::other));
    let mut body = std::pin::pin!(body);

    let outcome = copy_limited(&mut body, &mut writer, config.max_filesize)
        .await
        .map_err(|e| match e {
            CopyError::Read(source) => TransferError::response_read(config.url.as_str(), source),
            CopyError::Write(source) => {
                TransferError::output_write(destination.to_string(), source)
            }
        })?;

    Ok(TransferSummary {
        status,
        destination,
        bytes_written: outcome.bytes_written,
        limit_reached: outcome.limit_reached,
    })
}

/// Prints the request head to stdout, plus a separator line when the body follows on stdout.
fn print_request_head(request: &Request, body_on_stdout: bool) -> Result<(), TransferError> {
    let mut stdout = std::io::stdout().lock();
    let mut head = render_request_head(request);
    if body_on_stdout {
        head.push('\n');
    }
    stdout
        .write_all(head.as_bytes())
        .and_then(|()| stdout.flush())
        .map_err(|e| TransferError::output_write("stdout", e))
}
