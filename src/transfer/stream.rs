//! Fixed-buffer copy of the response body, with an optional size cap.

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

use super::constants::TRANSFER_BUFFER_SIZE;

/// Which side of the copy failed.
#[derive(Debug, Error)]
pub enum CopyError {
    /// Reading from the source failed.
    #[error("read failed: {0}")]
    Read(#[source] std::io::Error),
    /// Writing to the destination failed.
    #[error("write failed: {0}")]
    Write(#[source] std::io::Error),
}

/// What a finished copy did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOutcome {
    /// Bytes written to the destination.
    pub bytes_written: u64,
    /// Whether the size cap ended the copy.
    pub limit_reached: bool,
}

/// Copies `reader` into `writer` through a [`TRANSFER_BUFFER_SIZE`]-byte buffer.
///
/// With `limit` set, the copy stops as soon as `limit` bytes have been
/// written: the read that reaches or crosses the cap is clamped to the
/// remaining allowance and treated as end of stream. The writer is flushed
/// before returning.
///
/// # Errors
///
/// Returns [`CopyError::Read`] or [`CopyError::Write`] on the first IO
/// failure; nothing is retried.
pub async fn copy_limited<R, W>(
    reader: &mut R,
    writer: &mut W,
    limit: Option<u64>,
) -> Result<CopyOutcome, CopyError>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buffer = [0_u8; TRANSFER_BUFFER_SIZE];
    let mut total: u64 = 0;
    let mut limit_reached = false;

    loop {
        let read = reader.read(&mut buffer).await.map_err(CopyError::Read)?;
        let mut n = read;
        let mut done = read == 0;

        if let Some(limit) = limit
            && total + n as u64 >= limit
        {
            let remaining = limit.saturating_sub(total);
            n = usize::try_from(remaining).unwrap_or(n).min(n);
            done = true;
            limit_reached = true;
            debug!(limit, read, kept = n, "max-filesize reached");
        }

        writer
            .write_all(&buffer[..n])
            .await
            .map_err(CopyError::Write)?;
        total += n as u64;
        trace!(chunk = n, total, "copied chunk");

        if done {
            break;
        }
    }

    writer.flush().await.map_err(CopyError::Write)?;

    Ok(CopyOutcome {
        bytes_written: total,
        limit_reached,
    })
}
