//! Line-oriented framing over a mail-protocol stream.
//!
//! All three protocols exchange CRLF-terminated ASCII lines, with two
//! exceptions that the dialog also covers: raw writes for message payloads
//! and exact-length reads for IMAP literals.

#![allow(clippy::missing_errors_doc)]

use std::io;
use std::time::Duration;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::{NetError, Result};

/// Default ceiling for a single received line, excluding the terminator.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 8192;

const READ_CHUNK: usize = 4096;

/// Buffered line-oriented reader/writer owning the protocol stream.
///
/// Every operation may be bounded by the configured timeout; on expiry the
/// in-flight I/O is cancelled and the operation fails with
/// [`NetError::Timeout`]. At most one timer exists per operation, and a
/// timer that would fire after completion never surfaces.
pub struct Dialog<S> {
    stream: S,
    buffer: BytesMut,
    max_line_length: usize,
    timeout: Option<Duration>,
}

impl<S> Dialog<S> {
    /// Creates a dialog with the default line ceiling and no timeout.
    pub fn new(stream: S) -> Self {
        Self::with_limits(stream, DEFAULT_MAX_LINE_LENGTH, None)
    }

    /// Creates a dialog with an explicit line ceiling and timeout.
    pub fn with_limits(stream: S, max_line_length: usize, timeout: Option<Duration>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            max_line_length,
            timeout,
        }
    }

    /// Returns the configured line-length ceiling.
    #[must_use]
    pub const fn max_line_length(&self) -> usize {
        self.max_line_length
    }

    /// Returns the per-operation timeout.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Gets a reference to the underlying stream.
    pub const fn get_ref(&self) -> &S {
        &self.stream
    }

    /// Consumes the dialog and returns the stream, dropping any buffered
    /// bytes. Used for the STARTTLS upgrade, which the protocols only
    /// permit at a point where no data may be in flight.
    pub fn into_stream(self) -> S {
        self.stream
    }
}

impl<S> Dialog<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Sends `line`, appending CRLF if it is not already terminated.
    ///
    /// See [`normalize_line`] for the exact normalization rule; sending an
    /// already-normalized line is byte-identical to sending the bare text.
    pub async fn write_line(&mut self, line: &str) -> Result<()> {
        let payload = normalize_line(line);
        self.write_raw(payload.as_bytes()).await
    }

    /// Sends exactly these bytes, unchanged.
    pub async fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        let io = async {
            self.stream.write_all(data).await?;
            self.stream.flush().await
        };
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, io)
                .await
                .map_err(|_| NetError::Timeout(limit))??,
            None => io.await?,
        }
        Ok(())
    }

    /// Returns the next line, with a single trailing CRLF or LF stripped.
    ///
    /// Bytes past the first LF stay buffered for the next call. A line
    /// longer than the ceiling fails with [`NetError::LineTooLong`]; it is
    /// never truncated.
    pub async fn read_line(&mut self) -> Result<String> {
        loop {
            if let Some(pos) = self.buffer.iter().position(|&b| b == b'\n') {
                let mut line = self.buffer.split_to(pos + 1);
                line.truncate(pos);
                if line.last() == Some(&b'\r') {
                    line.truncate(line.len() - 1);
                }
                if line.len() > self.max_line_length {
                    return Err(NetError::LineTooLong {
                        limit: self.max_line_length,
                    });
                }
                return Ok(String::from_utf8_lossy(&line).into_owned());
            }
            // No terminator in the buffer: anything longer than a maximal
            // line plus CRLF can no longer become a valid line.
            if self.buffer.len() > self.max_line_length + 2 {
                return Err(NetError::LineTooLong {
                    limit: self.max_line_length,
                });
            }
            self.fill().await?;
        }
    }

    /// Returns exactly `n` bytes, consuming buffered bytes first.
    ///
    /// A zero-length read completes without touching the stream.
    pub async fn read_exactly(&mut self, n: usize) -> Result<Vec<u8>> {
        if n == 0 {
            return Ok(Vec::new());
        }
        while self.buffer.len() < n {
            self.fill().await?;
        }
        Ok(self.buffer.split_to(n).to_vec())
    }

    async fn fill(&mut self) -> Result<()> {
        let read = self.stream.read_buf(&mut self.buffer);
        let n = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, read)
                .await
                .map_err(|_| NetError::Timeout(limit))??,
            None => read.await?,
        };
        if n == 0 {
            return Err(NetError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed",
            )));
        }
        Ok(())
    }
}

/// Normalizes a line terminator to CRLF.
///
/// A trailing CRLF is kept; a lone LF becomes CRLF; a lone CR gains the
/// missing LF; anything else gets CRLF appended. Idempotent.
#[must_use]
pub fn normalize_line(line: &str) -> String {
    if line.ends_with("\r\n") {
        line.to_string()
    } else if let Some(stripped) = line.strip_suffix('\n') {
        format!("{stripped}\r\n")
    } else if line.ends_with('\r') {
        format!("{line}\n")
    } else {
        format!("{line}\r\n")
    }
}
