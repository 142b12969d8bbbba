//! SMTP client configuration.

use std::time::Duration;

use mailwire_net::{AuthPolicy, TlsOptions, DEFAULT_MAX_LINE_LENGTH};

/// Configuration for an [`SmtpClient`](crate::SmtpClient).
#[derive(Debug, Clone)]
pub struct SmtpOptions {
    /// TLS trust configuration.
    pub tls: TlsOptions,
    /// Cleartext-authentication policy.
    pub auth: AuthPolicy,
    /// Per-operation timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Ceiling for a single received line.
    pub max_line_length: usize,
    /// When connecting in STARTTLS mode, run greeting, EHLO and the TLS
    /// upgrade inside `connect` whenever the server advertises STARTTLS.
    pub auto_starttls: bool,
}

impl Default for SmtpOptions {
    fn default() -> Self {
        Self {
            tls: TlsOptions::default(),
            auth: AuthPolicy::default(),
            timeout: None,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            auto_starttls: true,
        }
    }
}

impl SmtpOptions {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the TLS trust configuration.
    #[must_use]
    pub fn tls(mut self, tls: TlsOptions) -> Self {
        self.tls = tls;
        self
    }

    /// Sets the cleartext-authentication policy.
    #[must_use]
    pub const fn auth(mut self, auth: AuthPolicy) -> Self {
        self.auth = auth;
        self
    }

    /// Sets the per-operation timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the line-length ceiling.
    #[must_use]
    pub const fn max_line_length(mut self, limit: usize) -> Self {
        self.max_line_length = limit;
        self
    }

    /// Enables or disables the STARTTLS convenience handshake.
    #[must_use]
    pub const fn auto_starttls(mut self, enabled: bool) -> Self {
        self.auto_starttls = enabled;
        self
    }
}
