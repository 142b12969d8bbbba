//! Stream type shared by the protocol clients.

#![allow(clippy::missing_errors_doc)]

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::client::TlsStream;
use tokio_rustls::TlsConnector;

use crate::{NetError, Result};

/// A connection that is either plaintext or TLS over the same socket.
///
/// The stream starts out plaintext and can be upgraded in place once the
/// protocol-level STARTTLS exchange has succeeded, so the dialog and the
/// client above it keep a single concrete stream type across the upgrade.
pub enum MailStream {
    /// Plaintext TCP stream.
    Plain(TcpStream),
    /// TLS-encrypted stream (boxed to reduce enum size).
    Tls(Box<TlsStream<TcpStream>>),
}

impl MailStream {
    /// Opens a plaintext TCP connection to `host:port`.
    ///
    /// Name resolution is handled by the runtime; the first reachable
    /// endpoint wins.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let tcp = TcpStream::connect((host, port)).await?;
        Ok(Self::Plain(tcp))
    }

    /// Wraps an already-established TCP stream.
    #[must_use]
    pub const fn plain(stream: TcpStream) -> Self {
        Self::Plain(stream)
    }

    /// Returns true if the stream is TLS-encrypted.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        matches!(self, Self::Tls(_))
    }

    /// Upgrades the stream to TLS, handshaking as a client.
    ///
    /// `sni` names the server for certificate verification and the TLS
    /// Server Name Indication extension. Calling this on a stream that is
    /// already TLS is a no-op and returns the stream unchanged.
    ///
    /// On handshake failure the underlying socket has already been consumed,
    /// so the connection cannot be recovered; callers must treat the session
    /// as unusable.
    pub async fn start_tls(self, connector: &TlsConnector, sni: &str) -> Result<Self> {
        match self {
            Self::Plain(tcp) => {
                let server_name = ServerName::try_from(sni.to_string())?;
                let tls = connector.connect(server_name, tcp).await.map_err(map_tls_io)?;
                tracing::debug!(server = sni, "TLS handshake complete");
                Ok(Self::Tls(Box::new(tls)))
            }
            Self::Tls(_) => Ok(self),
        }
    }
}

/// tokio-rustls surfaces handshake failures as `io::Error`; unwrap the
/// rustls error when one is inside so callers see the TLS taxonomy.
fn map_tls_io(err: io::Error) -> NetError {
    match err.downcast::<rustls::Error>() {
        Ok(tls) => NetError::Tls(tls),
        Err(io) => NetError::Io(io),
    }
}

impl std::fmt::Debug for MailStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("MailStream::Plain"),
            Self::Tls(_) => f.write_str("MailStream::Tls"),
        }
    }
}

impl AsyncRead for MailStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_read(cx, buf),
            Self::Tls(stream) => Pin::new(stream).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for MailStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_write(cx, buf),
            Self::Tls(stream) => Pin::new(stream).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_flush(cx),
            Self::Tls(stream) => Pin::new(stream).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Plain(stream) => Pin::new(stream).poll_shutdown(cx),
            Self::Tls(stream) => Pin::new(stream).poll_shutdown(cx),
        }
    }
}
