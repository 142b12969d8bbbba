//! Core IMAP types.

use crate::parser::ResponseToken;

/// Terminal status of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Command completed successfully.
    Ok,
    /// Command failed (operational error).
    No,
    /// Command failed (protocol or syntax error).
    Bad,
    /// Greeting for a pre-authenticated connection.
    PreAuth,
    /// Server is closing the connection.
    Bye,
    /// Anything else; invalid as a tagged status.
    Unknown,
}

impl Status {
    /// Maps a status atom, ignoring case; unrecognized atoms are
    /// [`Status::Unknown`].
    #[must_use]
    pub fn parse(atom: &str) -> Self {
        if atom.eq_ignore_ascii_case("OK") {
            Self::Ok
        } else if atom.eq_ignore_ascii_case("NO") {
            Self::No
        } else if atom.eq_ignore_ascii_case("BAD") {
            Self::Bad
        } else if atom.eq_ignore_ascii_case("PREAUTH") {
            Self::PreAuth
        } else if atom.eq_ignore_ascii_case("BYE") {
            Self::Bye
        } else {
            Self::Unknown
        }
    }

    /// Returns true for the statuses a tagged completion may carry.
    #[must_use]
    pub const fn is_tagged_status(self) -> bool {
        matches!(self, Self::Ok | Self::No | Self::Bad)
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Ok => "OK",
            Self::No => "NO",
            Self::Bad => "BAD",
            Self::PreAuth => "PREAUTH",
            Self::Bye => "BYE",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

/// One logical response line: the physical lines it spans, its literal
/// payloads, and the parsed token trees.
#[derive(Debug, Clone, Default)]
pub struct ResponseLine {
    /// Mandatory-part token tree.
    pub tokens: Vec<ResponseToken>,
    /// Tokens from the `[...]` response-code annotation, when present.
    pub annotations: Vec<ResponseToken>,
    /// The physical lines, terminators stripped, in arrival order.
    pub fragments: Vec<String>,
    /// Literal payloads, in arrival order.
    pub literals: Vec<Vec<u8>>,
}

impl ResponseLine {
    /// The nth mandatory token as an atom, when it is one.
    #[must_use]
    pub fn atom(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).and_then(ResponseToken::as_atom)
    }
}

/// A collected response: zero or more untagged lines followed by the
/// tagged completion (or a single line for greetings).
#[derive(Debug, Clone)]
pub struct Response {
    /// `"*"` for untagged-only responses, else the request's tag.
    pub tag: String,
    /// Terminal status.
    pub status: Status,
    /// Trailing text of the status line.
    pub text: String,
    /// Every literal payload in the response, in order.
    pub literals: Vec<Vec<u8>>,
    /// The raw parsed lines, the tagged completion last.
    pub lines: Vec<ResponseLine>,
}

/// Statistics reported by SELECT / EXAMINE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MailboxStat {
    /// Number of messages in the mailbox (EXISTS).
    pub messages: u32,
    /// Number of messages with the `\Recent` flag (RECENT).
    pub recent: u32,
    /// The next UID to be assigned (UIDNEXT).
    pub uid_next: u32,
    /// UID validity value (UIDVALIDITY).
    pub uid_validity: u32,
    /// Sequence number of the first unseen message (UNSEEN).
    pub unseen: u32,
}

/// An inclusive message range; an absent upper bound means "to the end".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRange {
    /// First sequence number or UID.
    pub first: u32,
    /// Last sequence number or UID; `None` renders as `*`.
    pub last: Option<u32>,
}

impl MessageRange {
    /// Creates a bounded range.
    #[must_use]
    pub const fn new(first: u32, last: u32) -> Self {
        Self {
            first,
            last: Some(last),
        }
    }

    /// Creates a single-message range.
    #[must_use]
    pub const fn single(n: u32) -> Self {
        Self {
            first: n,
            last: Some(n),
        }
    }

    /// Creates a range open at the upper end (`first:*`).
    #[must_use]
    pub const fn open(first: u32) -> Self {
        Self { first, last: None }
    }
}

impl std::fmt::Display for MessageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.last {
            Some(last) => write!(f, "{}:{last}", self.first),
            None => write!(f, "{}:*", self.first),
        }
    }
}

/// Renders a range list as comma-joined `lo:hi` fragments.
#[must_use]
pub fn ranges_to_string(ranges: &[MessageRange]) -> String {
    let rendered: Vec<String> = ranges.iter().map(ToString::to_string).collect();
    rendered.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_is_case_insensitive() {
        assert_eq!(Status::parse("ok"), Status::Ok);
        assert_eq!(Status::parse("No"), Status::No);
        assert_eq!(Status::parse("BAD"), Status::Bad);
        assert_eq!(Status::parse("preauth"), Status::PreAuth);
        assert_eq!(Status::parse("Bye"), Status::Bye);
        assert_eq!(Status::parse("MAYBE"), Status::Unknown);
    }

    #[test]
    fn tagged_statuses() {
        assert!(Status::Ok.is_tagged_status());
        assert!(Status::No.is_tagged_status());
        assert!(Status::Bad.is_tagged_status());
        assert!(!Status::PreAuth.is_tagged_status());
        assert!(!Status::Bye.is_tagged_status());
        assert!(!Status::Unknown.is_tagged_status());
    }

    #[test]
    fn range_rendering() {
        assert_eq!(MessageRange::new(2, 4).to_string(), "2:4");
        assert_eq!(MessageRange::single(7).to_string(), "7:7");
        assert_eq!(MessageRange::open(3).to_string(), "3:*");
        assert_eq!(
            ranges_to_string(&[MessageRange::new(1, 5), MessageRange::open(10)]),
            "1:5,10:*"
        );
    }
}
