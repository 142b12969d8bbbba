//! Async SMTP client.

use std::collections::HashSet;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tokio::io::{AsyncRead, AsyncWrite};

use mailwire_net::{ensure_auth_allowed, Capabilities, Dialog, MailStream, NetError, TlsMode};

use crate::message::{FormatOptions, Message};
use crate::parser::{parse_capabilities, parse_reply_line};
use crate::types::{AuthMethod, Envelope, Reply, ReplyCode};
use crate::{Error, Result, SmtpOptions};

/// SMTP submission client.
///
/// The session follows the protocol's own state machine: greeting, EHLO,
/// optional STARTTLS (after which capabilities are stale until the next
/// EHLO), optional AUTH, then any number of mail transactions. Commands and
/// replies are strictly FIFO; the client is not safe for concurrent use.
pub struct SmtpClient<S = MailStream> {
    dialog: Dialog<S>,
    options: SmtpOptions,
    remote_host: String,
    capabilities: Capabilities,
    tls: bool,
}

impl SmtpClient<MailStream> {
    /// Connects to `host:port` in the given transport mode.
    ///
    /// `TlsMode::Implicit` performs the TLS handshake before any protocol
    /// byte is read. In `TlsMode::StartTls` with
    /// [`auto_starttls`](SmtpOptions::auto_starttls) enabled, the greeting,
    /// EHLO and (when advertised) the STARTTLS upgrade plus re-EHLO run
    /// inside this call, so the next step is `authenticate` or `send`;
    /// otherwise the caller drives `read_greeting` and `ehlo` itself.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection, handshake or any convenience
    /// exchange fails.
    pub async fn connect(
        host: &str,
        port: u16,
        mode: TlsMode,
        options: SmtpOptions,
    ) -> Result<Self> {
        let stream = match options.timeout {
            Some(limit) => tokio::time::timeout(limit, MailStream::connect(host, port))
                .await
                .map_err(|_| NetError::Timeout(limit))?,
            None => MailStream::connect(host, port).await,
        }?;

        let stream = if mode == TlsMode::Implicit {
            let connector = options.tls.connector()?;
            stream.start_tls(&connector, host).await?
        } else {
            stream
        };
        tracing::debug!(host, port, ?mode, "SMTP connection established");

        let tls = stream.is_tls();
        let mut client = Self::from_stream(stream, host, options);
        client.tls = tls;

        if mode == TlsMode::StartTls && client.options.auto_starttls {
            client.read_greeting().await?;
            client.ehlo(None).await?;
            if client.capabilities.supports("STARTTLS") {
                client = client.start_tls().await?;
                client.ehlo(None).await?;
            }
        }
        Ok(client)
    }

    /// Upgrades the connection with STARTTLS.
    ///
    /// Sends `STARTTLS`, requires a 220 reply, then handshakes over the
    /// same socket. The dialog's line ceiling and timeout carry over; the
    /// capability set is cleared and must be refreshed with a new `ehlo`.
    /// Consumes the client: on handshake failure the socket is gone and the
    /// session cannot be resumed.
    ///
    /// # Errors
    ///
    /// Returns a command failure when the server refuses, or a transport
    /// error when the handshake fails.
    pub async fn start_tls(mut self) -> Result<Self> {
        let reply = self.command("STARTTLS").await?;
        if reply.code != ReplyCode::SERVICE_READY {
            return Err(Error::Command {
                code: reply.code.as_u16(),
                message: reply.text(),
            });
        }

        let max_line_length = self.dialog.max_line_length();
        let timeout = self.dialog.timeout();
        let connector = self.options.tls.connector()?;
        let stream = self
            .dialog
            .into_stream()
            .start_tls(&connector, &self.remote_host)
            .await?;

        self.dialog = Dialog::with_limits(stream, max_line_length, timeout);
        self.tls = true;
        self.capabilities.clear();
        Ok(self)
    }
}

impl<S> SmtpClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an already-established stream.
    ///
    /// The stream is assumed plaintext; `host` is retained for the TLS
    /// server name on a later upgrade and as context in logs.
    pub fn from_stream(stream: S, host: impl Into<String>, options: SmtpOptions) -> Self {
        let dialog = Dialog::with_limits(stream, options.max_line_length, options.timeout);
        Self {
            dialog,
            options,
            remote_host: host.into(),
            capabilities: Capabilities::new(),
            tls: false,
        }
    }

    /// Returns true once the transport is TLS.
    #[must_use]
    pub const fn is_tls(&self) -> bool {
        self.tls
    }

    /// The host name this session was connected to.
    #[must_use]
    pub fn remote_host(&self) -> &str {
        &self.remote_host
    }

    /// Capabilities from the most recent EHLO exchange.
    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Reads the server greeting, requiring a 220 reply.
    ///
    /// # Errors
    ///
    /// Any other status is a connection rejection.
    pub async fn read_greeting(&mut self) -> Result<Reply> {
        let reply = self.read_reply().await?;
        if reply.code != ReplyCode::SERVICE_READY {
            return Err(Error::ConnectionRejected(reply.text()));
        }
        Ok(reply)
    }

    /// Sends EHLO (falling back to HELO) and refreshes the capability set.
    ///
    /// `domain` defaults to the local host name, or the literal
    /// `"localhost"` when it cannot be determined. The HELO fallback clears
    /// the capability set since HELO advertises nothing.
    ///
    /// # Errors
    ///
    /// Fails with `InitialRejected` when both forms are refused.
    pub async fn ehlo(&mut self, domain: Option<&str>) -> Result<Reply> {
        let name = domain.map_or_else(default_helo_domain, str::to_string);

        let reply = self.command(&format!("EHLO {name}")).await?;
        if reply.is_positive_completion() {
            self.capabilities = parse_capabilities(&reply);
            return Ok(reply);
        }

        let reply = self.command(&format!("HELO {name}")).await?;
        self.capabilities.clear();
        if !reply.is_positive_completion() {
            return Err(Error::InitialRejected(reply.text()));
        }
        Ok(reply)
    }

    /// Authenticates with AUTH PLAIN or AUTH LOGIN.
    ///
    /// The auth policy is consulted first; when it refuses, nothing is
    /// written to the wire.
    ///
    /// # Errors
    ///
    /// Fails with `Net(TlsRequired)` from the policy gate or
    /// `AuthRejected` when the server refuses the credentials.
    pub async fn authenticate(
        &mut self,
        username: &str,
        password: &str,
        method: AuthMethod,
    ) -> Result<()> {
        ensure_auth_allowed(self.tls, &self.options.auth)?;
        match method {
            AuthMethod::Plain => self.auth_plain(username, password).await,
            AuthMethod::Login => self.auth_login(username, password).await,
        }
    }

    async fn auth_plain(&mut self, username: &str, password: &str) -> Result<()> {
        let blob = format!("\0{username}\0{password}");
        let encoded = STANDARD.encode(blob.as_bytes());

        let mut reply = self.command(&format!("AUTH PLAIN {encoded}")).await?;
        // Some servers withhold the initial-response form and challenge
        // with 334; re-send the blob alone.
        if reply.code == ReplyCode::AUTH_CONTINUE {
            reply = self.command(&encoded).await?;
        }
        if !reply.is_positive_completion() {
            return Err(Error::AuthRejected(reply.text()));
        }
        Ok(())
    }

    async fn auth_login(&mut self, username: &str, password: &str) -> Result<()> {
        let reply = self.command("AUTH LOGIN").await?;
        if reply.code != ReplyCode::AUTH_CONTINUE {
            return Err(Error::AuthRejected(reply.text()));
        }
        let reply = self.command(&STANDARD.encode(username.as_bytes())).await?;
        if reply.code != ReplyCode::AUTH_CONTINUE {
            return Err(Error::AuthRejected(reply.text()));
        }
        let reply = self.command(&STANDARD.encode(password.as_bytes())).await?;
        if !reply.is_positive_completion() {
            return Err(Error::AuthRejected(reply.text()));
        }
        Ok(())
    }

    /// Runs a full mail transaction for `message`.
    ///
    /// The reverse path is the envelope's `mail_from` when set, else the
    /// message's Sender, else its first From address. The forward paths are
    /// the envelope's `rcpt_to` when non-empty, else the union of To, Cc
    /// and Bcc, deduplicated case-insensitively with first-seen casing
    /// preserved. The payload is serialized with dot-escaping on and the
    /// Bcc header suppressed, then terminated with `CRLF . CRLF`.
    ///
    /// A rejected MAIL FROM or RCPT TO is not rolled back; the caller
    /// decides between `rset`, `quit` or abandoning the session.
    ///
    /// # Errors
    ///
    /// `MissingSender` / `NoRecipients` before anything is sent; command
    /// failures carry the server's reply.
    pub async fn send<M>(&mut self, message: &M, envelope: Option<&Envelope>) -> Result<Reply>
    where
        M: Message + ?Sized,
    {
        let mail_from = envelope
            .map(|e| e.mail_from.clone())
            .filter(|a| !a.is_empty())
            .or_else(|| message.sender().filter(|a| !a.is_empty()))
            .or_else(|| {
                message
                    .from_addresses()
                    .into_iter()
                    .find(|a| !a.is_empty())
            })
            .ok_or(Error::MissingSender)?;

        let recipients = match envelope.filter(|e| !e.rcpt_to.is_empty()) {
            Some(e) => e.rcpt_to.clone(),
            None => {
                let mut all = message.recipients();
                all.extend(message.cc_recipients());
                all.extend(message.bcc_recipients());
                all
            }
        };
        let recipients = dedup_addresses(recipients);
        if recipients.is_empty() {
            return Err(Error::NoRecipients);
        }

        let reply = self.command(&format!("MAIL FROM:<{mail_from}>")).await?;
        if !reply.is_positive_completion() {
            return Err(Error::Command {
                code: reply.code.as_u16(),
                message: reply.text(),
            });
        }

        for recipient in &recipients {
            let reply = self.command(&format!("RCPT TO:<{recipient}>")).await?;
            if !reply.is_positive_completion() {
                return Err(Error::Command {
                    code: reply.code.as_u16(),
                    message: reply.text(),
                });
            }
        }

        let reply = self.command("DATA").await?;
        if !reply.is_positive_intermediate() {
            return Err(Error::Command {
                code: reply.code.as_u16(),
                message: reply.text(),
            });
        }

        let mut payload = Vec::new();
        message.format(
            &mut payload,
            &FormatOptions {
                dot_escape: true,
                add_bcc_header: false,
            },
        );
        payload.extend_from_slice(b"\r\n.\r\n");
        self.dialog.write_raw(&payload).await?;

        let reply = self.read_reply().await?;
        if !reply.is_positive_completion() {
            return Err(Error::Command {
                code: reply.code.as_u16(),
                message: reply.text(),
            });
        }
        Ok(reply)
    }

    /// Sends NOOP and returns the reply.
    ///
    /// # Errors
    ///
    /// Transport or parse failures only; the reply is returned as-is.
    pub async fn noop(&mut self) -> Result<Reply> {
        self.command("NOOP").await
    }

    /// Sends RSET, aborting any open mail transaction.
    ///
    /// # Errors
    ///
    /// Transport or parse failures only; the reply is returned as-is.
    pub async fn rset(&mut self) -> Result<Reply> {
        self.command("RSET").await
    }

    /// Sends QUIT and returns the reply; the session is finished after.
    ///
    /// # Errors
    ///
    /// Transport or parse failures only; the reply is returned as-is.
    pub async fn quit(&mut self) -> Result<Reply> {
        self.command("QUIT").await
    }

    async fn command(&mut self, line: &str) -> Result<Reply> {
        self.dialog.write_line(line).await?;
        self.read_reply().await
    }

    /// Reads one (possibly multi-line) reply.
    ///
    /// Every continuation line must carry the same code as the first;
    /// anything else is a parse failure.
    async fn read_reply(&mut self) -> Result<Reply> {
        let first = self.dialog.read_line().await?;
        let parsed = parse_reply_line(&first)?;
        let code = parsed.code;
        let mut lines = vec![parsed.text];
        let mut last = parsed.last;

        while !last {
            let line = self.dialog.read_line().await?;
            let parsed = parse_reply_line(&line)?;
            if parsed.code != code {
                return Err(Error::Parse(format!(
                    "continuation code {} does not match initial code {code}",
                    parsed.code
                )));
            }
            lines.push(parsed.text);
            last = parsed.last;
        }

        Ok(Reply::new(ReplyCode::new(code), lines))
    }
}

/// Case-insensitive dedup on the full address, preserving first-seen
/// casing and order; empty entries are dropped.
fn dedup_addresses(addresses: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for address in addresses {
        if address.is_empty() {
            continue;
        }
        if seen.insert(address.to_ascii_lowercase()) {
            out.push(address);
        }
    }
    out
}

fn default_helo_domain() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use mailwire_net::AuthPolicy;

    struct TestMessage {
        sender: Option<String>,
        from: Vec<String>,
        to: Vec<String>,
        cc: Vec<String>,
        bcc: Vec<String>,
        body: Vec<u8>,
    }

    impl TestMessage {
        fn new(body: &[u8]) -> Self {
            Self {
                sender: None,
                from: vec!["alice@example.com".to_string()],
                to: vec!["bob@example.com".to_string()],
                cc: Vec::new(),
                bcc: Vec::new(),
                body: body.to_vec(),
            }
        }
    }

    impl Message for TestMessage {
        fn sender(&self) -> Option<String> {
            self.sender.clone()
        }

        fn from_addresses(&self) -> Vec<String> {
            self.from.clone()
        }

        fn recipients(&self) -> Vec<String> {
            self.to.clone()
        }

        fn cc_recipients(&self) -> Vec<String> {
            self.cc.clone()
        }

        fn bcc_recipients(&self) -> Vec<String> {
            self.bcc.clone()
        }

        fn format(&self, out: &mut Vec<u8>, options: &FormatOptions) {
            // Collaborator behavior: double leading dots when asked.
            for line in self.body.split(|&b| b == b'\n') {
                let line = line.strip_suffix(b"\r").unwrap_or(line);
                if options.dot_escape && line.first() == Some(&b'.') {
                    out.push(b'.');
                }
                out.extend_from_slice(line);
                out.extend_from_slice(b"\r\n");
            }
            // Trailing CRLF from the split's empty tail is not wanted.
            if self.body.ends_with(b"\n") {
                out.truncate(out.len() - 2);
            }
        }
    }

    fn client_over(mock: tokio_test::io::Mock) -> SmtpClient<tokio_test::io::Mock> {
        SmtpClient::from_stream(mock, "smtp.example.com", SmtpOptions::new())
    }

    #[tokio::test]
    async fn greeting_is_accepted() {
        let mock = tokio_test::io::Builder::new()
            .read(b"220 smtp.example.com ESMTP\r\n")
            .build();
        let mut client = client_over(mock);
        let reply = client.read_greeting().await.unwrap();
        assert_eq!(reply.code.as_u16(), 220);
        assert_eq!(reply.lines, vec!["smtp.example.com ESMTP"]);
    }

    #[tokio::test]
    async fn greeting_rejection() {
        let mock = tokio_test::io::Builder::new()
            .read(b"554 no service\r\n")
            .build();
        let mut client = client_over(mock);
        assert!(matches!(
            client.read_greeting().await,
            Err(Error::ConnectionRejected(text)) if text == "no service"
        ));
    }

    #[tokio::test]
    async fn ehlo_parses_multi_line_capabilities() {
        let mock = tokio_test::io::Builder::new()
            .write(b"EHLO client.local\r\n")
            .read(b"250-smtp.example.com\r\n250-SIZE 35882577\r\n250-AUTH LOGIN PLAIN\r\n250 STARTTLS\r\n")
            .build();
        let mut client = client_over(mock);
        client.ehlo(Some("client.local")).await.unwrap();

        let caps = client.capabilities();
        assert_eq!(
            caps.parameters("SIZE"),
            Some(["35882577".to_string()].as_slice())
        );
        assert_eq!(
            caps.parameters("AUTH"),
            Some(["LOGIN".to_string(), "PLAIN".to_string()].as_slice())
        );
        assert_eq!(caps.parameters("STARTTLS"), Some([].as_slice()));
    }

    #[tokio::test]
    async fn ehlo_falls_back_to_helo() {
        let mock = tokio_test::io::Builder::new()
            .write(b"EHLO client.local\r\n")
            .read(b"502 not implemented\r\n")
            .write(b"HELO client.local\r\n")
            .read(b"250 smtp.example.com\r\n")
            .build();
        let mut client = client_over(mock);
        let reply = client.ehlo(Some("client.local")).await.unwrap();
        assert_eq!(reply.code, ReplyCode::OK);
        assert!(client.capabilities().is_empty());
    }

    #[tokio::test]
    async fn ehlo_and_helo_rejected() {
        let mock = tokio_test::io::Builder::new()
            .write(b"EHLO client.local\r\n")
            .read(b"502 nope\r\n")
            .write(b"HELO client.local\r\n")
            .read(b"550 still no\r\n")
            .build();
        let mut client = client_over(mock);
        assert!(matches!(
            client.ehlo(Some("client.local")).await,
            Err(Error::InitialRejected(_))
        ));
    }

    #[tokio::test]
    async fn reply_code_mismatch_is_parse_failure() {
        let mock = tokio_test::io::Builder::new()
            .write(b"EHLO client.local\r\n")
            .read(b"250-smtp.example.com\r\n251 oops\r\n")
            .build();
        let mut client = client_over(mock);
        assert!(matches!(
            client.ehlo(Some("client.local")).await,
            Err(Error::Parse(_))
        ));
    }

    #[tokio::test]
    async fn auth_login_sends_base64_lines() {
        let mock = tokio_test::io::Builder::new()
            .write(b"AUTH LOGIN\r\n")
            .read(b"334 VXNlcm5hbWU6\r\n")
            .write(b"dXNlcg==\r\n")
            .read(b"334 UGFzc3dvcmQ6\r\n")
            .write(b"cGFzcw==\r\n")
            .read(b"235 authenticated\r\n")
            .build();
        let mut client = client_over(mock);
        client.tls = true;
        client
            .authenticate("user", "pass", AuthMethod::Login)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn auth_plain_single_shot() {
        // base64("\0user\0pass")
        let mock = tokio_test::io::Builder::new()
            .write(b"AUTH PLAIN AHVzZXIAcGFzcw==\r\n")
            .read(b"235 authenticated\r\n")
            .build();
        let mut client = client_over(mock);
        client.tls = true;
        client
            .authenticate("user", "pass", AuthMethod::Plain)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn auth_plain_resends_blob_on_challenge() {
        let mock = tokio_test::io::Builder::new()
            .write(b"AUTH PLAIN AHVzZXIAcGFzcw==\r\n")
            .read(b"334 \r\n")
            .write(b"AHVzZXIAcGFzcw==\r\n")
            .read(b"235 authenticated\r\n")
            .build();
        let mut client = client_over(mock);
        client.tls = true;
        client
            .authenticate("user", "pass", AuthMethod::Plain)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn auth_rejection() {
        let mock = tokio_test::io::Builder::new()
            .write(b"AUTH LOGIN\r\n")
            .read(b"535 bad credentials\r\n")
            .build();
        let mut client = client_over(mock);
        client.tls = true;
        assert!(matches!(
            client.authenticate("user", "pass", AuthMethod::Login).await,
            Err(Error::AuthRejected(_))
        ));
    }

    #[tokio::test]
    async fn cleartext_auth_is_refused_before_any_io() {
        // No expectations on the mock: the policy must fail first.
        let mock = tokio_test::io::Builder::new().build();
        let mut client = SmtpClient::from_stream(
            mock,
            "smtp.example.com",
            SmtpOptions::new().auth(AuthPolicy {
                require_tls_for_auth: true,
                allow_cleartext_auth: false,
            }),
        );
        assert!(matches!(
            client.authenticate("user", "pass", AuthMethod::Plain).await,
            Err(Error::Net(NetError::TlsRequired))
        ));
    }

    #[tokio::test]
    async fn send_runs_full_transaction() {
        let mock = tokio_test::io::Builder::new()
            .write(b"MAIL FROM:<alice@example.com>\r\n")
            .read(b"250 sender ok\r\n")
            .write(b"RCPT TO:<bob@example.com>\r\n")
            .read(b"250 recipient ok\r\n")
            .write(b"DATA\r\n")
            .read(b"354 go ahead\r\n")
            .write(b"Subject: hi\r\n\r\n..dot\r\nbody\r\n\r\n.\r\n")
            .read(b"250 queued\r\n")
            .build();
        let mut client = client_over(mock);
        let message = TestMessage::new(b"Subject: hi\r\n\r\n.dot\r\nbody");
        let reply = client.send(&message, None).await.unwrap();
        assert_eq!(reply.code, ReplyCode::OK);
    }

    #[tokio::test]
    async fn send_uses_envelope_override() {
        let mock = tokio_test::io::Builder::new()
            .write(b"MAIL FROM:<return@example.com>\r\n")
            .read(b"250 ok\r\n")
            .write(b"RCPT TO:<list@example.com>\r\n")
            .read(b"250 ok\r\n")
            .write(b"DATA\r\n")
            .read(b"354 go\r\n")
            .write(b"x\r\n\r\n.\r\n")
            .read(b"250 queued\r\n")
            .build();
        let mut client = client_over(mock);
        let message = TestMessage::new(b"x");
        let envelope = Envelope::new()
            .mail_from("return@example.com")
            .rcpt_to("list@example.com");
        client.send(&message, Some(&envelope)).await.unwrap();
    }

    #[tokio::test]
    async fn send_unions_and_dedups_recipients() {
        let mock = tokio_test::io::Builder::new()
            .write(b"MAIL FROM:<alice@example.com>\r\n")
            .read(b"250 ok\r\n")
            .write(b"RCPT TO:<Bob@example.com>\r\n")
            .read(b"250 ok\r\n")
            .write(b"RCPT TO:<carol@example.com>\r\n")
            .read(b"250 ok\r\n")
            .write(b"DATA\r\n")
            .read(b"354 go\r\n")
            .write(b"x\r\n\r\n.\r\n")
            .read(b"250 queued\r\n")
            .build();
        let mut client = client_over(mock);
        let mut message = TestMessage::new(b"x");
        message.to = vec!["Bob@example.com".to_string()];
        message.cc = vec!["bob@example.com".to_string()];
        message.bcc = vec!["carol@example.com".to_string()];
        client.send(&message, None).await.unwrap();
    }

    #[tokio::test]
    async fn send_without_recipients_fails_before_io() {
        let mock = tokio_test::io::Builder::new().build();
        let mut client = client_over(mock);
        let mut message = TestMessage::new(b"x");
        message.to.clear();
        assert!(matches!(
            client.send(&message, None).await,
            Err(Error::NoRecipients)
        ));
    }

    #[tokio::test]
    async fn send_without_sender_fails_before_io() {
        let mock = tokio_test::io::Builder::new().build();
        let mut client = client_over(mock);
        let mut message = TestMessage::new(b"x");
        message.from.clear();
        assert!(matches!(
            client.send(&message, None).await,
            Err(Error::MissingSender)
        ));
    }

    #[tokio::test]
    async fn rejected_recipient_surfaces_server_detail() {
        let mock = tokio_test::io::Builder::new()
            .write(b"MAIL FROM:<alice@example.com>\r\n")
            .read(b"250 ok\r\n")
            .write(b"RCPT TO:<bob@example.com>\r\n")
            .read(b"550 mailbox unavailable\r\n")
            .build();
        let mut client = client_over(mock);
        let message = TestMessage::new(b"x");
        let err = client.send(&message, None).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Command { code: 550, ref message } if message == "mailbox unavailable"
        ));
        assert!(err.is_command_failure());
    }

    #[tokio::test]
    async fn quit_round_trip() {
        let mock = tokio_test::io::Builder::new()
            .write(b"QUIT\r\n")
            .read(b"221 bye\r\n")
            .build();
        let mut client = client_over(mock);
        let reply = client.quit().await.unwrap();
        assert_eq!(reply.code, ReplyCode::CLOSING);
    }

    #[test]
    fn dedup_preserves_first_seen_casing() {
        let out = dedup_addresses(vec![
            "Bob@Example.com".to_string(),
            "bob@example.com".to_string(),
            String::new(),
            "carol@example.com".to_string(),
        ]);
        assert_eq!(out, vec!["Bob@Example.com", "carol@example.com"]);
    }

    #[test]
    fn auth_plain_blob_round_trips() {
        let encoded = STANDARD.encode(b"\0user\0pass");
        assert_eq!(STANDARD.decode(encoded).unwrap(), b"\0user\0pass");
    }
}
