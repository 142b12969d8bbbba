//! Core POP3 types.

use std::collections::BTreeMap;

/// Result of the STAT command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MailboxStat {
    /// Number of messages in the maildrop.
    pub messages: u32,
    /// Total size of the maildrop in bytes.
    pub size: u64,
}

/// LIST result: 1-based message number to size in bytes.
pub type MessageList = BTreeMap<u32, u64>;

/// UIDL result: 1-based message number to unique id.
pub type UidList = BTreeMap<u32, String>;
