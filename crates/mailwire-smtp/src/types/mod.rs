//! Core SMTP types.

mod envelope;
mod reply;

pub use envelope::Envelope;
pub use reply::{Reply, ReplyCode};

/// Authentication mechanism for the AUTH command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    /// AUTH PLAIN: a single base64 blob of `\0user\0password`.
    Plain,
    /// AUTH LOGIN: username and password in separate 334 challenges.
    Login,
}
