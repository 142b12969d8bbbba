//! Transport-level error types shared by the protocol engines.

use std::time::Duration;

use thiserror::Error;

/// Result type alias for transport operations.
pub type Result<T> = std::result::Result<T, NetError>;

/// Errors raised below the protocol layer.
#[derive(Debug, Error)]
pub enum NetError {
    /// I/O error during network operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TLS handshake or encryption error.
    #[error("TLS error: {0}")]
    Tls(#[from] rustls::Error),

    /// Host name is not usable as a TLS server name.
    #[error("invalid server name: {0}")]
    InvalidDnsName(#[from] rustls::pki_types::InvalidDnsNameError),

    /// A bounded operation exceeded its timer.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// A received line exceeded the configured ceiling.
    #[error("line exceeds maximum length of {limit} bytes")]
    LineTooLong {
        /// The configured line-length ceiling.
        limit: usize,
    },

    /// The auth policy refused a cleartext credential exchange.
    #[error("TLS required for authentication; upgrade with STARTTLS or connect with implicit TLS")]
    TlsRequired,

    /// A [`SessionMutex`](crate::SessionMutex) lock wait was cancelled.
    #[error("session lock cancelled")]
    LockCancelled,
}

impl NetError {
    /// Returns true if the session must be considered unusable.
    ///
    /// Everything at this layer poisons the session; the distinction only
    /// matters for protocol-level command failures, which the engines model
    /// themselves.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::TlsRequired | Self::LockCancelled)
    }
}
