//! Error types for SMTP operations.

use mailwire_net::NetError;
use thiserror::Error;

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport-level failure (I/O, TLS, timeout, line ceiling, policy).
    #[error(transparent)]
    Net(#[from] NetError),

    /// The initial greeting was not a 220 reply.
    #[error("connection rejected: {0}")]
    ConnectionRejected(String),

    /// Both EHLO and the HELO fallback were rejected.
    #[error("EHLO and HELO rejected: {0}")]
    InitialRejected(String),

    /// The server refused the credential exchange.
    #[error("authentication rejected: {0}")]
    AuthRejected(String),

    /// The server answered a command with a negative reply.
    #[error("server returned {code}: {message}")]
    Command {
        /// Numeric reply code (4xx or 5xx, or an unexpected positive code).
        code: u16,
        /// Server-provided detail text.
        message: String,
    },

    /// A reply line did not match the reply grammar.
    #[error("malformed server reply: {0}")]
    Parse(String),

    /// Neither the envelope nor the message names a sender.
    #[error("mail sender is missing")]
    MissingSender,

    /// The recipient set is empty after envelope derivation.
    #[error("message has no recipients")]
    NoRecipients,
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
