//! SMTP envelope overrides.

/// The (sender, recipients) tuple negotiated with MAIL FROM / RCPT TO,
/// independently of the message's header addresses.
///
/// Empty fields fall back to addresses derived from the message: the
/// Sender header (else the first From address) for the reverse path, and
/// the union of To, Cc and Bcc for the forward paths.
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    /// Reverse-path address for MAIL FROM; empty means derive.
    pub mail_from: String,
    /// Forward-path addresses for RCPT TO; empty means derive.
    pub rcpt_to: Vec<String>,
}

impl Envelope {
    /// Creates an empty envelope (everything derived from the message).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reverse path.
    #[must_use]
    pub fn mail_from(mut self, address: impl Into<String>) -> Self {
        self.mail_from = address.into();
        self
    }

    /// Adds a forward path.
    #[must_use]
    pub fn rcpt_to(mut self, address: impl Into<String>) -> Self {
        self.rcpt_to.push(address.into());
        self
    }
}
