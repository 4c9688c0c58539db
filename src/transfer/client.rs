//! HTTP client wrapper for the single outgoing request.
//!
//! This module provides [`HttpClient`], which builds the request described by
//! a [`RequestConfig`] (attaching a throttled body when a rate limit is set),
//! sends it, and renders request/response heads for display.

use std::fmt::Write as _;
use std::time::Duration;

use reqwest::{Body, Client, Request, Response};
use tracing::{debug, instrument};

use super::constants::CONNECT_TIMEOUT_SECS;
use super::error::TransferError;
use super::rate_limiter::{TokenBucket, throttled_body};
use crate::config::RequestConfig;
use crate::user_agent;

/// Connection settings for [`HttpClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    /// TCP/TLS connect timeout.
    pub connect_timeout: Duration,
    /// Whole-transfer timeout; `None` lets slow transfers run to completion.
    pub max_time: Option<Duration>,
    /// `User-Agent` sent unless the request sets its own.
    pub user_agent: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
            max_time: None,
            user_agent: user_agent::default_user_agent(),
        }
    }
}

/// HTTP client for sending one request and receiving its response.
///
/// # Example
///
/// ```no_run
/// use hfetch_core::config::{RequestConfig, RequestOptions};
/// use hfetch_core::transfer::{ClientSettings, HttpClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = RequestConfig::resolve(RequestOptions {
///     url: Some("example.com".to_string()),
///     ..RequestOptions::default()
/// })?;
/// let client = HttpClient::new(&ClientSettings::default())?;
/// let request = client.build_request(&config)?;
/// let response = client.execute(request).await?;
/// println!("{}", response.status());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client with the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::ClientBuild`] if the TLS backend or system
    /// configuration cannot be initialised.
    #[instrument(level = "debug")]
    pub fn new(settings: &ClientSettings) -> Result<Self, TransferError> {
        let mut builder = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.clone());
        if let Some(max_time) = settings.max_time {
            builder = builder.timeout(max_time);
        }
        let client = builder
            .build()
            .map_err(|source| TransferError::ClientBuild { source })?;
        Ok(Self { client })
    }

    /// Builds the outgoing request for `config`.
    ///
    /// With a rate limit configured the body is streamed through a
    /// [`TokenBucket`]; otherwise it is sent as one buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Request`] if reqwest rejects the request.
    #[instrument(skip(self, config), fields(method = %config.method, url = %config.url))]
    pub fn build_request(&self, config: &RequestConfig) -> Result<Request, TransferError> {
        let mut builder = self
            .client
            .request(config.method.clone(), config.url.clone())
            .headers(config.headers.clone());

        if let Some(body) = &config.body {
            builder = match config.limit_rate {
                Some(rate) => {
                    debug!(rate, bytes = body.len(), "throttling request body");
                    let stream = throttled_body(body.clone(), TokenBucket::new(rate));
                    builder.body(Body::wrap_stream(stream))
                }
                None => builder.body(body.clone()),
            };
        }

        builder
            .build()
            .map_err(|e| TransferError::request(config.url.as_str(), e))
    }

    /// Sends `request` and waits for the response head.
    ///
    /// Non-success statuses are returned as ordinary responses.
    ///
    /// # Errors
    ///
    /// Returns [`TransferError::Timeout`] or [`TransferError::Network`] when
    /// no response arrives.
    #[instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    pub async fn execute(&self, request: Request) -> Result<Response, TransferError> {
        let url = request.url().to_string();
        debug!("sending request");
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| TransferError::from_send(url, e))?;
        debug!(status = %response.status(), "response received");
        Ok(response)
    }
}

/// Renders the request line and headers as printed by `-v`.
///
/// ```text
/// HTTP/1.1 POST http://example.com/submit
/// Content-Type: application/json
/// Content-Length: 7
/// ```
#[must_use]
pub fn render_request_head(request: &Request) -> String {
    let mut out = format!(
        "{:?} {} {}\n",
        request.version(),
        request.method(),
        request.url()
    );
    for (name, value) in request.headers() {
        let _ = writeln!(
            out,
            "{}: {}",
            canonical_header_name(name.as_str()),
            String::from_utf8_lossy(value.as_bytes())
        );
    }
    out
}

/// Renders the status line and headers of a response, followed by a blank line.
#[must_use]
pub fn render_response_head(response: &Response) -> String {
    let mut out = format!("{:?} {}\n", response.version(), response.status());
    for (name, value) in response.headers() {
        let _ = writeln!(
            out,
            "{}: {}",
            canonical_header_name(name.as_str()),
            String::from_utf8_lossy(value.as_bytes())
        );
    }
    out.push('\n');
    out
}

/// Title-cases each dash-separated part of a header name (`content-type` → `Content-Type`).
fn canonical_header_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("-")
}
