//! Collaborator contract for the message being submitted.
//!
//! MIME construction, header folding and address parsing live outside this
//! crate; the engine only needs the envelope addresses and a byte
//! serialization of the message.

/// Options controlling [`Message::format`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Double the leading `.` of every line so a bare `.` can terminate
    /// the DATA payload.
    pub dot_escape: bool,
    /// Include the Bcc header in the serialization. Submission suppresses
    /// it so blind recipients stay blind.
    pub add_bcc_header: bool,
}

/// A message that can be submitted over SMTP.
///
/// Addresses are bare `local@domain` strings; display names and groups are
/// the message implementation's concern.
pub trait Message {
    /// The Sender header address, when one is set.
    fn sender(&self) -> Option<String>;

    /// The From header addresses, in order.
    fn from_addresses(&self) -> Vec<String>;

    /// The To header addresses, in order.
    fn recipients(&self) -> Vec<String>;

    /// The Cc header addresses, in order.
    fn cc_recipients(&self) -> Vec<String>;

    /// The Bcc header addresses, in order.
    fn bcc_recipients(&self) -> Vec<String>;

    /// Serializes the message as RFC 5322 bytes with CRLF line endings.
    fn format(&self, out: &mut Vec<u8>, options: &FormatOptions);
}
