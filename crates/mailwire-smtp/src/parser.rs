//! SMTP reply-line grammar and EHLO capability parsing.

use mailwire_net::Capabilities;

use crate::types::Reply;
use crate::{Error, Result};

/// One parsed reply line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyLine {
    /// The three-digit code.
    pub code: u16,
    /// True when this line terminates the reply (space separator or a
    /// bare three-digit line).
    pub last: bool,
    /// Free text after the separator.
    pub text: String,
}

/// Parses a single reply line.
///
/// Grammar: three ASCII digits, then `' '` (final) or `'-'` (continuation)
/// and free text. A bare three-digit line is a final line with empty text.
///
/// # Errors
///
/// Anything else is a parse failure; the reply is never guessed at.
pub fn parse_reply_line(line: &str) -> Result<ReplyLine> {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || !bytes[..3].iter().all(u8::is_ascii_digit) {
        return Err(Error::Parse(format!("missing reply code: {line:?}")));
    }
    let code = u16::from(bytes[0] - b'0') * 100
        + u16::from(bytes[1] - b'0') * 10
        + u16::from(bytes[2] - b'0');

    let (last, text) = match bytes.get(3) {
        None => (true, ""),
        Some(b' ') => (true, &line[4..]),
        Some(b'-') => (false, &line[4..]),
        Some(_) => {
            return Err(Error::Parse(format!("bad separator after code: {line:?}")));
        }
    };

    Ok(ReplyLine {
        code,
        last,
        text: text.to_string(),
    })
}

/// Extracts the capability set from a 2xx EHLO reply.
///
/// The first line is the server's domain and greeting text and never a
/// capability; each remaining line contributes its first whitespace token
/// as the (uppercased) keyword and the rest as parameters. Duplicate
/// keywords merge.
#[must_use]
pub fn parse_capabilities(reply: &Reply) -> Capabilities {
    let mut caps = Capabilities::new();
    for line in reply.lines.iter().skip(1) {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        caps.insert(keyword, tokens.map(str::to_string));
    }
    caps
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::ReplyCode;

    #[test]
    fn final_line() {
        let line = parse_reply_line("250 OK").unwrap();
        assert_eq!(line.code, 250);
        assert!(line.last);
        assert_eq!(line.text, "OK");
    }

    #[test]
    fn continuation_line() {
        let line = parse_reply_line("250-SIZE 35882577").unwrap();
        assert_eq!(line.code, 250);
        assert!(!line.last);
        assert_eq!(line.text, "SIZE 35882577");
    }

    #[test]
    fn bare_code_is_final_with_empty_text() {
        let line = parse_reply_line("354").unwrap();
        assert_eq!(line.code, 354);
        assert!(line.last);
        assert_eq!(line.text, "");
    }

    #[test]
    fn short_line_is_rejected() {
        assert!(matches!(parse_reply_line("25"), Err(Error::Parse(_))));
    }

    #[test]
    fn non_digit_code_is_rejected() {
        assert!(matches!(parse_reply_line("2a0 OK"), Err(Error::Parse(_))));
        assert!(matches!(parse_reply_line("abc OK"), Err(Error::Parse(_))));
    }

    #[test]
    fn bad_separator_is_rejected() {
        assert!(matches!(parse_reply_line("250+OK"), Err(Error::Parse(_))));
    }

    #[test]
    fn ehlo_capabilities() {
        let reply = Reply::new(
            ReplyCode::OK,
            vec![
                "smtp.example.com".to_string(),
                "SIZE 35882577".to_string(),
                "AUTH LOGIN PLAIN".to_string(),
                "STARTTLS".to_string(),
            ],
        );
        let caps = parse_capabilities(&reply);
        assert_eq!(
            caps.parameters("SIZE"),
            Some(["35882577".to_string()].as_slice())
        );
        assert_eq!(
            caps.parameters("AUTH"),
            Some(["LOGIN".to_string(), "PLAIN".to_string()].as_slice())
        );
        assert_eq!(caps.parameters("STARTTLS"), Some([].as_slice()));
        assert!(caps.supports("starttls"));
    }

    #[test]
    fn single_line_reply_yields_empty_capabilities() {
        let reply = Reply::new(ReplyCode::OK, vec!["smtp.example.com ready".to_string()]);
        assert!(parse_capabilities(&reply).is_empty());
    }
}
