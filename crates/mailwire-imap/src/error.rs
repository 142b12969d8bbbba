//! Error types for IMAP operations.

use mailwire_net::NetError;
use thiserror::Error;

use crate::types::Status;

/// Result type alias for IMAP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// IMAP client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (I/O, TLS, timeout, line ceiling, policy).
    #[error(transparent)]
    Net(#[from] NetError),

    /// The greeting was not OK, PREAUTH or BYE.
    #[error("connection rejected: {0}")]
    ConnectionRejected(String),

    /// LOGIN was refused.
    #[error("authentication rejected: {0}")]
    AuthRejected(String),

    /// The tagged completion carried NO or BAD.
    #[error("command failed with {status}: {text}")]
    Command {
        /// The terminal status.
        status: Status,
        /// Server-provided detail text.
        text: String,
    },

    /// A response line, literal size or status atom was malformed.
    #[error("malformed server response: {0}")]
    Parse(String),

    /// A completion line carried neither the request's tag nor an
    /// untagged/continuation marker.
    #[error("response tag mismatch: expected {expected}, got {line:?}")]
    InvalidTag {
        /// The tag the in-flight request was issued with.
        expected: String,
        /// The offending line.
        line: String,
    },
}

impl Error {
    /// Returns true if the server processed the command and said no.
    ///
    /// For every other error the session must be considered unusable.
    #[must_use]
    pub const fn is_command_failure(&self) -> bool {
        matches!(self, Self::Command { .. } | Self::AuthRejected(_))
    }
}
