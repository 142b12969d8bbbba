//! # mailwire-pop3
//!
//! Async POP3 retrieval client implementing the client half of RFC 1939,
//! with STLS (RFC 2595) for opportunistic TLS.
//!
//! ## Quick start
//!
//! ```ignore
//! use mailwire_net::TlsMode;
//! use mailwire_pop3::{Pop3Client, Pop3Options};
//!
//! #[tokio::main]
//! async fn main() -> mailwire_pop3::Result<()> {
//!     let mut client =
//!         Pop3Client::connect("pop.example.com", 995, TlsMode::Implicit, Pop3Options::new())
//!             .await?;
//!     client.read_greeting().await?;
//!     client.login("user@example.com", "password").await?;
//!
//!     let stat = client.stat().await?;
//!     for n in 1..=stat.messages {
//!         let raw = client.retr(n).await?;
//!         // hand `raw` to the MIME parser
//!     }
//!     client.quit().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod options;
mod types;

pub use client::Pop3Client;
pub use error::{Error, Result};
pub use options::Pop3Options;
pub use types::{MailboxStat, MessageList, UidList};
