//! Error types for POP3 operations.

use mailwire_net::NetError;
use thiserror::Error;

/// Result type alias for POP3 operations.
pub type Result<T> = std::result::Result<T, Error>;

/// POP3 client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (I/O, TLS, timeout, line ceiling, policy).
    #[error(transparent)]
    Net(#[from] NetError),

    /// The greeting was not `+OK`.
    #[error("connection rejected: {0}")]
    ConnectionRejected(String),

    /// USER or PASS was refused.
    #[error("authentication rejected: {0}")]
    AuthRejected(String),

    /// The server answered `-ERR`; carries the server's detail text.
    #[error("server returned -ERR: {0}")]
    Command(String),

    /// A status line or payload did not match the protocol grammar.
    #[error("malformed server response: {0}")]
    Parse(String),
}

impl Error {
    /// Returns true if the server processed the command and said no.
    ///
    /// For every other error the session must be considered unusable.
    #[must_use]
    pub const fn is_command_failure(&self) -> bool {
        matches!(self, Self::Command(_) | Self::AuthRejected(_))
    }
}
