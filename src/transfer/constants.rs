//! Constants for the transfer module (buffer sizes, timeouts, fallbacks).

/// Size of the buffer the response body is copied through.
pub const TRANSFER_BUFFER_SIZE: usize = 1024;

/// Size of each chunk handed to the HTTP client from a rate-limited body.
pub const UPLOAD_CHUNK_SIZE: usize = 1024;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Output filename for `-O` when neither the response nor the URL names one.
pub const DEFAULT_REMOTE_NAME: &str = "index.html";
