//! Token-bucket throttling for request bodies.
//!
//! The bucket holds at most one second's worth of bytes and starts full, so
//! a body smaller than the rate goes out immediately. Each chunk handed to the
//! HTTP client consumes tokens; when the bucket runs dry the stream sleeps
//! until enough tokens have accumulated again.
//!
//! # Example
//!
//! ```
//! use hfetch_core::transfer::rate_limiter::TokenBucket;
//!
//! # async fn example() {
//! let mut bucket = TokenBucket::new(1024);
//!
//! // First second's worth proceeds immediately
//! bucket.take(1024).await;
//!
//! // The next 512 bytes wait roughly half a second
//! bucket.take(512).await;
//! # }
//! ```

use std::time::Duration;

use futures_util::Stream;
use futures_util::stream;
use tokio::time::Instant;
use tracing::{debug, instrument, trace};

use super::constants::UPLOAD_CHUNK_SIZE;

/// Rate limiter releasing bytes at a fixed rate.
///
/// Taking more tokens than are available drives the balance negative; the
/// caller then waits until the balance is back at zero. This lets chunks
/// larger than the bucket pass at the configured average rate.
#[derive(Debug)]
pub struct TokenBucket {
    /// Refill rate in bytes per second.
    rate: u64,

    /// Maximum token balance (one second's worth of bytes).
    capacity: f64,

    /// Current balance. Negative while a taker is waiting off a debt.
    tokens: f64,

    /// When `tokens` was last brought up to date.
    last_refill: Instant,
}

impl TokenBucket {
    /// Creates a full bucket releasing `bytes_per_sec` bytes per second.
    ///
    /// A rate of zero is treated as one byte per second.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    #[instrument]
    pub fn new(bytes_per_sec: u64) -> Self {
        let rate = bytes_per_sec.max(1);
        debug!(rate, "creating token bucket");
        Self {
            rate,
            capacity: rate as f64,
            tokens: rate as f64,
            last_refill: Instant::now(),
        }
    }

    /// Returns the refill rate in bytes per second.
    #[must_use]
    pub fn rate(&self) -> u64 {
        self.rate
    }

    /// Consumes `bytes` tokens and returns how long the caller must wait
    /// before the data may be released.
    #[allow(clippy::cast_precision_loss)]
    pub fn reserve(&mut self, bytes: u64) -> Duration {
        self.refill();
        self.tokens -= bytes as f64;

        if self.tokens >= 0.0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(-self.tokens / self.rate as f64)
        }
    }

    /// Consumes `bytes` tokens, sleeping until they are paid for.
    pub async fn take(&mut self, bytes: u64) {
        let delay = self.reserve(bytes);
        if !delay.is_zero() {
            trace!(bytes, delay_ms = delay.as_millis(), "throttling");
            tokio::time::sleep(delay).await;
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill);
        self.last_refill = now;
        self.tokens = (self.tokens + elapsed.as_secs_f64() * self.rate as f64).min(self.capacity);
    }
}

/// Splits `body` into chunks released through `bucket`.
///
/// The returned stream is suitable for `reqwest::Body::wrap_stream`.
pub fn throttled_body(
    body: Vec<u8>,
    bucket: TokenBucket,
) -> impl Stream<Item = Result<Vec<u8>, std::io::Error>> + Send + 'static {
    stream::unfold(
        (body, 0_usize, bucket),
        |(body, offset, mut bucket)| async move {
            if offset >= body.len() {
                return None;
            }
            let end = (offset + UPLOAD_CHUNK_SIZE).min(body.len());
            let chunk = body[offset..end].to_vec();
            bucket.take(chunk.len() as u64).await;
            Some((Ok::<_, std::io::Error>(chunk), (body, end, bucket)))
        },
    )
}
