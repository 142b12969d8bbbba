//! # mailwire-imap
//!
//! Async IMAP client implementing the client half of RFC 3501
//! (`IMAP4rev1`): tagged request correlation, an incremental response
//! parser covering atoms, quoted strings, length-prefixed literals and
//! nested parenthesized lists, plus the mailbox operations built on top.
//!
//! ## Quick start
//!
//! ```ignore
//! use mailwire_imap::{ImapClient, ImapOptions, MessageRange, StoreAction};
//! use mailwire_net::TlsMode;
//!
//! #[tokio::main]
//! async fn main() -> mailwire_imap::Result<()> {
//!     let mut client =
//!         ImapClient::connect("imap.example.com", 993, TlsMode::Implicit, ImapOptions::new())
//!             .await?;
//!     client.read_greeting().await?;
//!     client.login("user@example.com", "password").await?;
//!
//!     let (_, stat) = client.select("INBOX").await?;
//!     println!("messages: {}", stat.messages);
//!
//!     client
//!         .store(
//!             &[MessageRange::single(1)],
//!             &StoreAction::AddFlags(vec!["\\Deleted".to_string()]),
//!         )
//!         .await?;
//!     client.expunge().await?;
//!     client.close().await?;
//!     client.logout().await?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod command;
mod error;
mod options;
pub mod parser;
mod search;
mod types;

pub use client::ImapClient;
pub use command::{to_astring, StoreAction};
pub use error::{Error, Result};
pub use options::ImapOptions;
pub use parser::{ResponseParser, ResponseToken};
pub use search::SearchCondition;
pub use types::{
    ranges_to_string, MailboxStat, MessageRange, Response, ResponseLine, Status,
};
