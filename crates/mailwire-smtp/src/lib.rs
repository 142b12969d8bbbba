//! # mailwire-smtp
//!
//! Async SMTP submission client implementing the client half of RFC 5321,
//! with STARTTLS (RFC 3207) and AUTH PLAIN / AUTH LOGIN (RFC 4954).
//!
//! ## Quick start
//!
//! ```ignore
//! use mailwire_net::TlsMode;
//! use mailwire_smtp::{AuthMethod, SmtpClient, SmtpOptions};
//!
//! #[tokio::main]
//! async fn main() -> mailwire_smtp::Result<()> {
//!     let options = SmtpOptions::new();
//!     // auto_starttls runs greeting, EHLO and the TLS upgrade in connect.
//!     let mut client =
//!         SmtpClient::connect("smtp.example.com", 587, TlsMode::StartTls, options).await?;
//!
//!     client
//!         .authenticate("user@example.com", "password", AuthMethod::Login)
//!         .await?;
//!     client.send(&message, None).await?;
//!     client.quit().await?;
//!     Ok(())
//! }
//! ```
//!
//! Message construction is out of scope; anything implementing the
//! [`Message`] collaborator trait can be submitted.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod message;
mod options;
pub mod parser;
pub mod types;

pub use client::SmtpClient;
pub use error::{Error, Result};
pub use message::{FormatOptions, Message};
pub use options::SmtpOptions;
pub use types::{AuthMethod, Envelope, Reply, ReplyCode};
