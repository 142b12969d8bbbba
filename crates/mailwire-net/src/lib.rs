//! # mailwire-net
//!
//! Shared transport layer for the mailwire mail-protocol clients.
//!
//! The three protocol engines (SMTP, POP3, IMAP) all speak CRLF-terminated
//! lines over a TCP connection that may be upgraded to TLS mid-session.
//! This crate provides the pieces they have in common:
//!
//! - [`MailStream`]: a stream that is plaintext or TLS and can be upgraded
//!   in place via STARTTLS without changing its type
//! - [`Dialog`]: line-oriented framing with buffered reads, exact-length
//!   reads, CRLF normalization, per-operation timeouts and a line-length
//!   ceiling
//! - [`TlsOptions`] / [`TlsMode`]: TLS configuration and connector assembly
//! - [`AuthPolicy`]: the gate that refuses cleartext credential exchanges
//! - [`Capabilities`]: the case-insensitive capability set advertised by
//!   SMTP and IMAP servers
//! - [`SessionMutex`]: an optional FIFO-fair async mutex for callers that
//!   must share one session across tasks

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod capability;
mod dialog;
mod error;
mod policy;
mod stream;
mod sync;
mod tls;

pub use capability::Capabilities;
pub use dialog::{normalize_line, Dialog, DEFAULT_MAX_LINE_LENGTH};
pub use error::{NetError, Result};
pub use policy::{ensure_auth_allowed, AuthPolicy};
pub use stream::MailStream;
pub use sync::{SessionGuard, SessionMutex};
pub use tls::{TlsMode, TlsOptions};
