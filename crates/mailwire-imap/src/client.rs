//! Async IMAP client.

use tokio::io::{AsyncRead, AsyncWrite};

use mailwire_net::{ensure_auth_allowed, Capabilities, Dialog, MailStream, NetError, TlsMode};

use crate::command::{to_astring, StoreAction};
use crate::parser::ResponseParser;
use crate::search::{render_conditions, SearchCondition};
use crate::types::{ranges_to_string, MailboxStat, MessageRange, Response, ResponseLine, Status};
use crate::{Error, ImapOptions, Result};

/// IMAP mailbox client.
///
/// Each request is tagged with the decimal form of a per-session counter;
/// the response is collected until the line echoing that tag arrives.
/// Commands and replies are strictly FIFO; the client is not safe for
/// concurrent use.
pub struct ImapClient<S = MailStream> {
    dialog: Dialog<S>,
    options: ImapOptions,
    remote_host: String,
    capabilities: Capabilities,
    parser: ResponseParser,
    tag: u32,
    tls: bool,
}

impl ImapClient<MailStream> {
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
        options: ImapOptions,
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
        tracing::debug!(host, port, ?mode, "IMAP connection established");

        let tls = stream.is_tls();
        let mut client = Self::from_stream(stream, host, options);
        client.tls = tls;
        Ok(client)
    }

    /// Upgrades the connection with STARTTLS.
    ///
    /// Requires an OK completion, then handshakes over the same socket.
    /// The dialog's line ceiling and timeout carry over; the capability
    /// set is cleared and must be refreshed with a new `capability` call.
    /// Consumes the client: on handshake failure the socket is gone and
    /// the session cannot be resumed.
    ///
    /// # Errors
    ///
    /// Returns a command failure when the server refuses, or a transport
    /// error when the handshake fails.
    pub async fn start_tls(mut self) -> Result<Self> {
        ensure_ok(self.command("STARTTLS").await?)?;

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

impl<S> ImapClient<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps an already-established stream.
    ///
    /// The stream is assumed plaintext; `host` is retained for the TLS
    /// server name on a later upgrade.
    pub fn from_stream(stream: S, host: impl Into<String>, options: ImapOptions) -> Self {
        let dialog = Dialog::with_limits(stream, options.max_line_length, options.timeout);
        Self {
            dialog,
            options,
            remote_host: host.into(),
            capabilities: Capabilities::new(),
            parser: ResponseParser::new(),
            tag: 0,
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

    /// Capabilities from the most recent CAPABILITY exchange.
    #[must_use]
    pub const fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Reads the server greeting.
    ///
    /// OK, PREAUTH and BYE are all valid greeting statuses; BYE announces
    /// that the server will close the connection.
    ///
    /// # Errors
    ///
    /// Anything else is a connection rejection or a parse failure.
    pub async fn read_greeting(&mut self) -> Result<Response> {
        let line = self.read_response_line().await?;
        let head = line.fragments.first().map(String::as_str).unwrap_or("");
        let Some(rest) = head.strip_prefix('*') else {
            return Err(Error::Parse(format!("greeting is not untagged: {head:?}")));
        };
        let (status_atom, text) = split_token(rest);
        let status = Status::parse(status_atom);
        match status {
            Status::Ok | Status::PreAuth | Status::Bye => {}
            Status::Unknown => {
                return Err(Error::Parse(format!(
                    "invalid greeting status {status_atom:?}"
                )));
            }
            _ => return Err(Error::ConnectionRejected(text.to_string())),
        }

        Ok(Response {
            tag: "*".to_string(),
            status,
            text: text.to_string(),
            literals: line.literals.clone(),
            lines: vec![line],
        })
    }

    /// Issues a raw tagged command and collects its response.
    ///
    /// # Errors
    ///
    /// Transport, parse and tag-correlation failures; the tagged status is
    /// returned in the response, not checked here.
    pub async fn command(&mut self, command: &str) -> Result<Response> {
        self.tag += 1;
        let tag = self.tag.to_string();
        self.dialog.write_line(&format!("{tag} {command}")).await?;

        let mut response = Response {
            tag: tag.clone(),
            status: Status::Unknown,
            text: String::new(),
            literals: Vec::new(),
            lines: Vec::new(),
        };
        loop {
            let line = self.read_response_line().await?;
            let head = line.fragments.first().map(String::as_str).unwrap_or("");
            response.literals.extend(line.literals.iter().cloned());

            if is_tagged_line(head, &tag) {
                let (status_atom, text) = split_token(&head[tag.len()..]);
                let status = Status::parse(status_atom);
                if !status.is_tagged_status() {
                    return Err(Error::Parse(format!(
                        "invalid tagged status {status_atom:?}"
                    )));
                }
                response.status = status;
                response.text = text.to_string();
                response.lines.push(line);
                break;
            }

            if !(head.starts_with('*') || head.starts_with('+')) {
                return Err(Error::InvalidTag {
                    expected: tag,
                    line: head.to_string(),
                });
            }
            response.lines.push(line);
        }
        Ok(response)
    }

    /// Asks the server for its capability list and stores it.
    ///
    /// Atoms of the form `AUTH=PLAIN` contribute a parameter to the `AUTH`
    /// keyword, so mechanisms merge the same way EHLO parameters do.
    ///
    /// # Errors
    ///
    /// Non-OK completion is a command failure.
    pub async fn capability(&mut self) -> Result<Response> {
        let response = ensure_ok(self.command("CAPABILITY").await?)?;
        self.capabilities.clear();
        for line in &response.lines {
            let is_capability_line = line.atom(0) == Some("*")
                && line
                    .atom(1)
                    .is_some_and(|a| a.eq_ignore_ascii_case("CAPABILITY"));
            if !is_capability_line {
                continue;
            }
            for token in line.tokens.iter().skip(2) {
                let Some(atom) = token.as_atom() else { continue };
                match atom.split_once('=') {
                    Some((keyword, value)) => {
                        self.capabilities.insert(keyword, [value.to_string()]);
                    }
                    None => self.capabilities.insert(atom, Vec::new()),
                }
            }
        }
        Ok(response)
    }

    /// Authenticates with LOGIN; arguments are astring-rendered.
    ///
    /// The auth policy is consulted first; when it refuses, nothing is
    /// written to the wire.
    ///
    /// # Errors
    ///
    /// Fails with `Net(TlsRequired)` from the policy gate or
    /// `AuthRejected` when the server refuses the credentials.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<Response> {
        ensure_auth_allowed(self.tls, &self.options.auth)?;
        let response = self
            .command(&format!(
                "LOGIN {} {}",
                to_astring(username),
                to_astring(password)
            ))
            .await?;
        if response.status != Status::Ok {
            return Err(Error::AuthRejected(response.text));
        }
        Ok(response)
    }

    /// Selects a mailbox read-write, returning the untagged statistics.
    ///
    /// # Errors
    ///
    /// Non-OK completion is a command failure.
    pub async fn select(&mut self, mailbox: &str) -> Result<(Response, MailboxStat)> {
        self.select_with("SELECT", mailbox).await
    }

    /// Selects a mailbox read-only, returning the untagged statistics.
    ///
    /// # Errors
    ///
    /// Non-OK completion is a command failure.
    pub async fn examine(&mut self, mailbox: &str) -> Result<(Response, MailboxStat)> {
        self.select_with("EXAMINE", mailbox).await
    }

    async fn select_with(&mut self, verb: &str, mailbox: &str) -> Result<(Response, MailboxStat)> {
        let response = ensure_ok(
            self.command(&format!("{verb} {}", to_astring(mailbox)))
                .await?,
        )?;
        let stat = parse_mailbox_stat(&response);
        Ok((response, stat))
    }

    /// Applies a flag mutation to the given messages.
    ///
    /// # Errors
    ///
    /// Non-OK completion is a command failure.
    pub async fn store(
        &mut self,
        sequence: &[MessageRange],
        action: &StoreAction,
    ) -> Result<Response> {
        ensure_ok(
            self.command(&format!(
                "STORE {} {}",
                ranges_to_string(sequence),
                action.render()
            ))
            .await?,
        )
    }

    /// Permanently removes `\Deleted` messages, returning the expunged
    /// sequence numbers in server order.
    ///
    /// # Errors
    ///
    /// Non-OK completion is a command failure.
    pub async fn expunge(&mut self) -> Result<Vec<u32>> {
        let response = ensure_ok(self.command("EXPUNGE").await?)?;
        let mut expunged = Vec::new();
        for line in &response.lines {
            if line.atom(0) == Some("*")
                && line
                    .atom(2)
                    .is_some_and(|a| a.eq_ignore_ascii_case("EXPUNGE"))
            {
                if let Some(n) = line.atom(1).and_then(|a| a.parse().ok()) {
                    expunged.push(n);
                }
            }
        }
        Ok(expunged)
    }

    /// Searches the selected mailbox, returning matching sequence numbers.
    ///
    /// # Errors
    ///
    /// Non-OK completion is a command failure.
    pub async fn search(&mut self, conditions: &[SearchCondition]) -> Result<Vec<u32>> {
        let response = ensure_ok(
            self.command(&format!("SEARCH {}", render_conditions(conditions)))
                .await?,
        )?;
        let mut ids = Vec::new();
        for line in &response.lines {
            let is_search_line = line.atom(0) == Some("*")
                && line
                    .atom(1)
                    .is_some_and(|a| a.eq_ignore_ascii_case("SEARCH"));
            if !is_search_line {
                continue;
            }
            for token in line.tokens.iter().skip(2) {
                if let Some(n) = token.as_atom().and_then(|a| a.parse().ok()) {
                    ids.push(n);
                }
            }
        }
        Ok(ids)
    }

    /// Closes the selected mailbox, expunging `\Deleted` messages.
    ///
    /// # Errors
    ///
    /// Non-OK completion is a command failure.
    pub async fn close(&mut self) -> Result<Response> {
        ensure_ok(self.command("CLOSE").await?)
    }

    /// Ends the session; the server replies with an untagged BYE before
    /// the tagged completion.
    ///
    /// # Errors
    ///
    /// Non-OK completion is a command failure.
    pub async fn logout(&mut self) -> Result<Response> {
        ensure_ok(self.command("LOGOUT").await?)
    }

    /// No-op keep-alive; any pending unilateral data arrives as untagged
    /// lines of the response.
    ///
    /// # Errors
    ///
    /// Non-OK completion is a command failure.
    pub async fn noop(&mut self) -> Result<Response> {
        ensure_ok(self.command("NOOP").await?)
    }

    /// Reads one logical response line, resolving embedded literals.
    async fn read_response_line(&mut self) -> Result<ResponseLine> {
        self.parser.reset();
        let mut collected = ResponseLine::default();
        let mut line = self.dialog.read_line().await?;
        loop {
            self.parser.feed_line(&line)?;
            collected.fragments.push(line);
            match self.parser.pending_literal() {
                Some(declared) => {
                    let data = self.dialog.read_exactly(declared).await?;
                    collected.literals.push(data.clone());
                    self.parser.attach_literal(data)?;
                    line = self.dialog.read_line().await?;
                }
                None => break,
            }
        }
        let (tokens, annotations) = self.parser.take_tokens();
        collected.tokens = tokens;
        collected.annotations = annotations;
        Ok(collected)
    }
}

/// Requires an OK completion, surfacing NO/BAD with the server's text.
fn ensure_ok(response: Response) -> Result<Response> {
    if response.status == Status::Ok {
        Ok(response)
    } else {
        Err(Error::Command {
            status: response.status,
            text: response.text,
        })
    }
}

/// True when `line` is the completion for `tag`.
fn is_tagged_line(line: &str, tag: &str) -> bool {
    line.strip_prefix(tag)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
}

/// Splits the first space-delimited token from leading-trimmed text.
fn split_token(text: &str) -> (&str, &str) {
    let text = text.trim_start_matches(' ');
    match text.find(' ') {
        Some(pos) => (&text[..pos], text[pos + 1..].trim_start_matches(' ')),
        None => (text, ""),
    }
}

/// Collects EXISTS / RECENT counts and the UIDNEXT / UIDVALIDITY / UNSEEN
/// response codes from the untagged lines of a SELECT / EXAMINE response.
fn parse_mailbox_stat(response: &Response) -> MailboxStat {
    let mut stat = MailboxStat::default();
    for line in &response.lines {
        if line.atom(0) != Some("*") {
            continue;
        }

        if let (Some(count), Some(keyword)) = (line.atom(1), line.atom(2)) {
            if let Ok(n) = count.parse::<u32>() {
                if keyword.eq_ignore_ascii_case("EXISTS") {
                    stat.messages = n;
                } else if keyword.eq_ignore_ascii_case("RECENT") {
                    stat.recent = n;
                }
            }
        }

        if let [key, value, ..] = line.annotations.as_slice() {
            if let (Some(key), Some(value)) = (key.as_atom(), value.as_atom()) {
                if let Ok(n) = value.parse::<u32>() {
                    if key.eq_ignore_ascii_case("UIDNEXT") {
                        stat.uid_next = n;
                    } else if key.eq_ignore_ascii_case("UIDVALIDITY") {
                        stat.uid_validity = n;
                    } else if key.eq_ignore_ascii_case("UNSEEN") {
                        stat.unseen = n;
                    }
                }
            }
        }
    }
    stat
}
