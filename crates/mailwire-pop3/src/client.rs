//! Async POP3 client.

use tokio::io::{AsyncRead, AsyncWrite};

use mailwire_net::{ensure_auth_allowed, Dialog, MailStream, NetError, TlsMode};

use crate::types::{MailboxStat, MessageList, UidList};
use crate::{Error, Pop3Options, Result};

const END_OF_DATA: &str = ".";
const OK_RESPONSE: &str = "+OK";
const ERR_RESPONSE: &str = "-ERR";

/// POP3 retrieval client.
///
/// Commands and replies are strictly FIFO; the client is not safe for
/// concurrent use.
pub struct Pop3Client<S = MailStream> {
    dialog: Dialog<S>,
    options: Pop3Options,
    remote_host: String,
    tls: bool,
}

impl Pop3Client<MailStream> {
    /// Connects to `host:port` in the given transport mode.
    ///
    /// `TlsMode::Implicit` performs the TLS handshake before any protocol
    /// byte is read; `TlsMode::StartTls` leaves the connection plaintext
    /// until [`start_tls`](Self::start_tls) is called after the greeting.
    ///
    /// # Errors
    ///
    /// Returns an error when the connection or handshake fails.
    pub async fn connect(
        host: &str,
        port: u16,
        mode: TlsMode,
        options: Pop3Options,
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
        tracing::debug!(host, port, ?mode, "POP3 connection established");

        let tls = stream.is_tls();
        let mut client = Self::from_stream(stream, host, options);
        client.tls = tls;
        Ok(client)
    }

    /// Upgrades the connection with STLS.
    ///
    /// Requires a `+OK` reply, then handshakes over the same socket. The
    /// dialog's line ceiling and timeout carry over. Consumes the client:
    /// on handshake failure the socket is gone and the session cannot be
    /// resumed.
    ///
    /// # Errors
    ///
    /// Returns a command failure when the server refuses, or a transport
    /// error when the handshake fails.
    pub async fn start_tls(mut self) -> Result<Self> {
        self.dialog.write_line("STLS").await?;
        let (ok, detail) = self.read_status().await?;
        if !ok {
            return Err(Error::Command(detail));
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
        Ok(self)
    }
}

impl<S> Pop3Client<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an already-established stream.
    ///
    /// The stream is assumed plaintext; `host` is retained for the TLS
    /// server name on a later upgrade.
    pub fn from_stream(stream: S, host: impl Into<String>, options: Pop3Options) -> Self {
        let dialog = Dialog::with_limits(stream, options.max_line_length, options.timeout);
        Self {
            dialog,
            options,
            remote_host: host.into(),
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

    /// Reads the server greeting, returning its text.
    ///
    /// # Errors
    ///
    /// A `-ERR` greeting is a connection rejection.
    pub async fn read_greeting(&mut self) -> Result<String> {
        let (ok, detail) = self.read_status().await?;
        if !ok {
            return Err(Error::ConnectionRejected(detail));
        }
        Ok(detail)
    }

    /// Returns the server's capability list (one entry per CAPA line).
    ///
    /// # Errors
    ///
    /// Returns a command failure when the server does not implement CAPA.
    pub async fn capa(&mut self) -> Result<Vec<String>> {
        self.command("CAPA").await?;
        let mut capabilities = Vec::new();
        loop {
            let line = self.dialog.read_line().await?;
            if line == END_OF_DATA {
                break;
            }
            capabilities.push(unstuff(&line).to_string());
        }
        Ok(capabilities)
    }

    /// Authenticates with USER and PASS.
    ///
    /// USER/PASS is inherently cleartext, so the auth policy is consulted
    /// first; when it refuses, nothing is written to the wire.
    ///
    /// # Errors
    ///
    /// Fails with `Net(TlsRequired)` from the policy gate or
    /// `AuthRejected` when either command is refused.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        ensure_auth_allowed(self.tls, &self.options.auth)?;

        self.dialog.write_line(&format!("USER {username}")).await?;
        let (ok, detail) = self.read_status().await?;
        if !ok {
            return Err(Error::AuthRejected(detail));
        }

        self.dialog.write_line(&format!("PASS {password}")).await?;
        let (ok, detail) = self.read_status().await?;
        if !ok {
            return Err(Error::AuthRejected(detail));
        }
        Ok(())
    }

    /// Returns the maildrop statistics.
    ///
    /// # Errors
    ///
    /// Fails with `Parse` when the STAT line is not `count size`.
    pub async fn stat(&mut self) -> Result<MailboxStat> {
        let detail = self.command("STAT").await?;
        let mut tokens = detail.split_whitespace();
        let stat = tokens
            .next()
            .and_then(|t| t.parse().ok())
            .zip(tokens.next().and_then(|t| t.parse().ok()))
            .map(|(messages, size)| MailboxStat { messages, size });
        stat.ok_or_else(|| Error::Parse(format!("bad STAT response: {detail:?}")))
    }

    /// Lists message sizes, for one message or the whole maildrop.
    ///
    /// Payload lines that do not parse as `number size` are skipped.
    ///
    /// # Errors
    ///
    /// Single-message form fails with `Parse` when the reply is malformed.
    pub async fn list(&mut self, message: Option<u32>) -> Result<MessageList> {
        let mut listing = MessageList::new();
        match message {
            Some(n) => {
                let detail = self.command(&format!("LIST {n}")).await?;
                let (num, size) = parse_numbered::<u64>(&detail)
                    .ok_or_else(|| Error::Parse(format!("bad LIST response: {detail:?}")))?;
                listing.insert(num, size);
            }
            None => {
                self.command("LIST").await?;
                loop {
                    let line = self.dialog.read_line().await?;
                    if line == END_OF_DATA {
                        break;
                    }
                    if let Some((num, size)) = parse_numbered::<u64>(unstuff(&line)) {
                        listing.insert(num, size);
                    }
                }
            }
        }
        Ok(listing)
    }

    /// Lists unique ids, for one message or the whole maildrop.
    ///
    /// # Errors
    ///
    /// Single-message form fails with `Parse` when the reply is malformed.
    pub async fn uidl(&mut self, message: Option<u32>) -> Result<UidList> {
        let mut listing = UidList::new();
        match message {
            Some(n) => {
                let detail = self.command(&format!("UIDL {n}")).await?;
                let (num, uid) = parse_numbered::<String>(&detail)
                    .ok_or_else(|| Error::Parse(format!("bad UIDL response: {detail:?}")))?;
                listing.insert(num, uid);
            }
            None => {
                self.command("UIDL").await?;
                loop {
                    let line = self.dialog.read_line().await?;
                    if line == END_OF_DATA {
                        break;
                    }
                    if let Some((num, uid)) = parse_numbered::<String>(unstuff(&line)) {
                        listing.insert(num, uid);
                    }
                }
            }
        }
        Ok(listing)
    }

    /// Retrieves a message as raw RFC 5322 text.
    ///
    /// Lines are CRLF-terminated with dot-stuffing removed and without the
    /// terminator line; the result is handed to the external MIME parser
    /// as-is.
    ///
    /// # Errors
    ///
    /// Returns a command failure when the message does not exist.
    pub async fn retr(&mut self, message: u32) -> Result<String> {
        self.command(&format!("RETR {message}")).await?;
        self.read_payload().await
    }

    /// Retrieves the headers plus the first `lines` body lines.
    ///
    /// Optional server command; the same framing as `retr`.
    ///
    /// # Errors
    ///
    /// Returns a command failure when TOP is unsupported.
    pub async fn top(&mut self, message: u32, lines: u32) -> Result<String> {
        self.command(&format!("TOP {message} {lines}")).await?;
        self.read_payload().await
    }

    /// Marks a message as deleted.
    ///
    /// # Errors
    ///
    /// Returns a command failure when the message does not exist.
    pub async fn dele(&mut self, message: u32) -> Result<()> {
        self.command(&format!("DELE {message}")).await?;
        Ok(())
    }

    /// Unmarks any messages marked as deleted.
    ///
    /// # Errors
    ///
    /// Returns a command failure on `-ERR`.
    pub async fn rset(&mut self) -> Result<()> {
        self.command("RSET").await?;
        Ok(())
    }

    /// No-op keep-alive.
    ///
    /// # Errors
    ///
    /// Returns a command failure on `-ERR`.
    pub async fn noop(&mut self) -> Result<()> {
        self.command("NOOP").await?;
        Ok(())
    }

    /// Ends the session (entering the update state server-side).
    ///
    /// # Errors
    ///
    /// Returns a command failure on `-ERR`.
    pub async fn quit(&mut self) -> Result<()> {
        self.command("QUIT").await?;
        Ok(())
    }

    /// Sends one command and requires a `+OK` status, returning its text.
    async fn command(&mut self, line: &str) -> Result<String> {
        self.dialog.write_line(line).await?;
        let (ok, detail) = self.read_status().await?;
        if ok {
            Ok(detail)
        } else {
            Err(Error::Command(detail))
        }
    }

    /// Reads a status line: `+OK` or `-ERR`, a space, optional text.
    async fn read_status(&mut self) -> Result<(bool, String)> {
        let line = self.dialog.read_line().await?;
        let (status, rest) = match line.find(' ') {
            Some(pos) => (&line[..pos], line[pos + 1..].to_string()),
            None => (line.as_str(), String::new()),
        };
        match status {
            OK_RESPONSE => Ok((true, rest)),
            ERR_RESPONSE => Ok((false, rest)),
            _ => Err(Error::Parse(format!("unknown response status: {line:?}"))),
        }
    }

    /// Reads a dot-terminated payload, removing dot-stuffing.
    async fn read_payload(&mut self) -> Result<String> {
        let mut payload = String::new();
        loop {
            let line = self.dialog.read_line().await?;
            if line == END_OF_DATA {
                break;
            }
            payload.push_str(unstuff(&line));
            payload.push_str("\r\n");
        }
        Ok(payload)
    }
}

/// Strips exactly one leading `.` from a stuffed payload line.
fn unstuff(line: &str) -> &str {
    line.strip_prefix('.').unwrap_or(line)
}

/// Parses `"<number> <value>"`.
fn parse_numbered<T: std::str::FromStr>(text: &str) -> Option<(u32, T)> {
    let mut tokens = text.split_whitespace();
    let num = tokens.next()?.parse().ok()?;
    let value = tokens.next()?.parse().ok()?;
    Some((num, value))
}
