//! Incremental IMAP response parser.
//!
//! A logical response line may span several physical lines when it embeds
//! `{n}`-prefixed literals, so the parser is an explicit state machine
//! rather than a recursive descent: the caller feeds one physical line,
//! checks for a pending literal, attaches the literal bytes it read from
//! the stream, and feeds the continuation line, repeating until no literal
//! is outstanding. Token state survives across those feeds.

mod token;

pub use token::ResponseToken;

use crate::{Error, Result};

/// `{n}` literal framing progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum LiteralState {
    /// No literal in flight.
    #[default]
    None,
    /// Inside `{...}`, accumulating size digits.
    Size,
    /// Size complete; the payload must be read from the stream next.
    Waiting,
    /// Payload bytes are being attached.
    Reading,
    /// Payload attached; cleared when the continuation line is fed.
    Done,
}

/// Atom accumulation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum AtomState {
    #[default]
    None,
    Plain,
    Quoted,
}

/// Parser for one logical response line.
///
/// Tokens attach to the innermost open parenthesized list; tokens inside a
/// `[...]` response code collect into a separate annotation tree. Reset the
/// parser before each new logical line.
#[derive(Debug, Default)]
pub struct ResponseParser {
    literal_state: LiteralState,
    atom_state: AtomState,
    /// Inside a quoted atom, the previous character was a `\`.
    escape_pending: bool,
    in_annotation: bool,
    depth: usize,
    literal_size_digits: String,
    mandatory: Vec<ResponseToken>,
    annotation: Vec<ResponseToken>,
}

impl ResponseParser {
    /// Creates a parser ready for a new response line.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all state for the next logical line.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The declared length of the literal the line ended on, when the
    /// caller must now read that many bytes from the stream.
    #[must_use]
    pub fn pending_literal(&self) -> Option<usize> {
        if self.literal_state != LiteralState::Waiting {
            return None;
        }
        match self.last_token() {
            Some(ResponseToken::Literal { declared_len, .. }) => Some(*declared_len),
            _ => None,
        }
    }

    /// Attaches the payload of the pending literal.
    ///
    /// # Errors
    ///
    /// Fails when no literal is pending, when the most recent token is not
    /// a literal, or when `data` does not match the declared length.
    pub fn attach_literal(&mut self, data: Vec<u8>) -> Result<()> {
        if self.literal_state != LiteralState::Waiting {
            return Err(Error::Parse("no literal pending".to_string()));
        }
        self.literal_state = LiteralState::Reading;
        match self.innermost().last_mut() {
            Some(ResponseToken::Literal {
                declared_len,
                data: slot,
            }) => {
                if data.len() != *declared_len {
                    return Err(Error::Parse(format!(
                        "literal payload is {} bytes, {declared_len} declared",
                        data.len()
                    )));
                }
                *slot = data;
                self.literal_state = LiteralState::Done;
                Ok(())
            }
            _ => Err(Error::Parse("pending token is not a literal".to_string())),
        }
    }

    /// Takes the accumulated `(mandatory, annotation)` token trees.
    pub fn take_tokens(&mut self) -> (Vec<ResponseToken>, Vec<ResponseToken>) {
        (
            std::mem::take(&mut self.mandatory),
            std::mem::take(&mut self.annotation),
        )
    }

    /// Feeds one physical line (terminator already stripped).
    ///
    /// # Errors
    ///
    /// Fails on grammar violations: unbalanced `)` / `]`, nested `[`,
    /// non-digits inside a literal size, or text after a completed
    /// literal size on the same line.
    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        if self.literal_state == LiteralState::Done {
            self.literal_state = LiteralState::None;
        }

        for ch in line.chars() {
            // Inside a quoted atom every character is data, modulo the
            // backslash escapes for '"' and '\'.
            if self.atom_state == AtomState::Quoted {
                if self.escape_pending {
                    self.escape_pending = false;
                    self.push_atom_char(ch)?;
                } else {
                    match ch {
                        '\\' => self.escape_pending = true,
                        '"' => self.atom_state = AtomState::None,
                        _ => self.push_atom_char(ch)?,
                    }
                }
                continue;
            }

            match ch {
                '[' => {
                    if self.in_annotation {
                        return Err(Error::Parse("nested '[' in response".to_string()));
                    }
                    self.in_annotation = true;
                }

                ']' => {
                    if !self.in_annotation {
                        return Err(Error::Parse("']' without '['".to_string()));
                    }
                    self.in_annotation = false;
                    self.atom_state = AtomState::None;
                }

                '(' => {
                    self.innermost().push(ResponseToken::List(Vec::new()));
                    self.depth += 1;
                    self.atom_state = AtomState::None;
                }

                ')' => {
                    if self.depth == 0 {
                        return Err(Error::Parse("')' without '('".to_string()));
                    }
                    self.depth -= 1;
                    self.atom_state = AtomState::None;
                }

                '{' => {
                    if self.literal_state == LiteralState::Size {
                        return Err(Error::Parse("'{' inside literal size".to_string()));
                    }
                    self.innermost().push(ResponseToken::Literal {
                        declared_len: 0,
                        data: Vec::new(),
                    });
                    self.literal_size_digits.clear();
                    self.literal_state = LiteralState::Size;
                    self.atom_state = AtomState::None;
                }

                '}' => {
                    if self.literal_state != LiteralState::Size {
                        return Err(Error::Parse("'}' without literal size".to_string()));
                    }
                    let declared: usize = self.literal_size_digits.parse().map_err(|_| {
                        Error::Parse(format!("bad literal size {:?}", self.literal_size_digits))
                    })?;
                    match self.innermost().last_mut() {
                        Some(ResponseToken::Literal { declared_len, .. }) => {
                            *declared_len = declared;
                        }
                        _ => {
                            return Err(Error::Parse(
                                "literal size without literal token".to_string(),
                            ));
                        }
                    }
                    self.literal_state = LiteralState::Waiting;
                }

                ' ' => {
                    self.atom_state = AtomState::None;
                }

                '"' => {
                    if self.atom_state == AtomState::None {
                        self.innermost().push(ResponseToken::Atom(String::new()));
                        self.atom_state = AtomState::Quoted;
                        self.escape_pending = false;
                    }
                }

                _ => match self.literal_state {
                    LiteralState::Size => {
                        if !ch.is_ascii_digit() {
                            return Err(Error::Parse(format!(
                                "non-digit {ch:?} in literal size"
                            )));
                        }
                        self.literal_size_digits.push(ch);
                    }
                    LiteralState::Waiting => {
                        return Err(Error::Parse(
                            "text after literal size on the same line".to_string(),
                        ));
                    }
                    _ => {
                        if self.atom_state == AtomState::None {
                            self.innermost().push(ResponseToken::Atom(String::new()));
                            self.atom_state = AtomState::Plain;
                        }
                        self.push_atom_char(ch)?;
                    }
                },
            }
        }
        Ok(())
    }

    /// The innermost open token list: the root (mandatory or annotation,
    /// depending on `[...]` state), descended through trailing lists once
    /// per open parenthesis.
    fn innermost(&mut self) -> &mut Vec<ResponseToken> {
        let root = if self.in_annotation {
            &mut self.annotation
        } else {
            &mut self.mandatory
        };
        descend(root, self.depth)
    }

    /// Immutable view of the token new content would attach after.
    fn last_token(&self) -> Option<&ResponseToken> {
        let mut list = if self.in_annotation {
            &self.annotation
        } else {
            &self.mandatory
        };
        for _ in 0..self.depth {
            match list.last() {
                Some(ResponseToken::List(children)) => list = children,
                _ => break,
            }
        }
        list.last()
    }

    fn push_atom_char(&mut self, ch: char) -> Result<()> {
        match self.innermost().last_mut() {
            Some(ResponseToken::Atom(text)) => {
                text.push(ch);
                Ok(())
            }
            _ => Err(Error::Parse(format!("unexpected {ch:?} outside an atom"))),
        }
    }
}

/// Walks into the trailing list of `list` up to `depth` times.
fn descend(list: &mut Vec<ResponseToken>, depth: usize) -> &mut Vec<ResponseToken> {
    if depth == 0 || !matches!(list.last(), Some(ResponseToken::List(_))) {
        return list;
    }
    match list.last_mut() {
        Some(ResponseToken::List(children)) => descend(children, depth - 1),
        _ => unreachable!(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn parse_one(line: &str) -> (Vec<ResponseToken>, Vec<ResponseToken>) {
        let mut parser = ResponseParser::new();
        parser.feed_line(line).unwrap();
        assert_eq!(parser.pending_literal(), None);
        parser.take_tokens()
    }

    fn atom(text: &str) -> ResponseToken {
        ResponseToken::Atom(text.to_string())
    }

    #[test]
    fn plain_atoms() {
        let (tokens, annotations) = parse_one("* OK ready");
        assert_eq!(tokens, vec![atom("*"), atom("OK"), atom("ready")]);
        assert!(annotations.is_empty());
    }

    #[test]
    fn quoted_atom_with_escapes() {
        let (tokens, _) = parse_one(r#"* "a \"b\" \\ c""#);
        assert_eq!(tokens, vec![atom("*"), atom(r#"a "b" \ c"#)]);
    }

    #[test]
    fn consecutive_escaped_backslashes() {
        let (tokens, _) = parse_one(r#"* "a\\\\b""#);
        assert_eq!(tokens, vec![atom("*"), atom(r"a\\b")]);
    }

    #[test]
    fn empty_quoted_atom() {
        let (tokens, _) = parse_one(r#"* """#);
        assert_eq!(tokens, vec![atom("*"), atom("")]);
    }

    #[test]
    fn nested_lists() {
        let (tokens, _) = parse_one("* LIST (\\HasNoChildren (\\Marked)) \".\" INBOX");
        assert_eq!(
            tokens,
            vec![
                atom("*"),
                atom("LIST"),
                ResponseToken::List(vec![
                    atom("\\HasNoChildren"),
                    ResponseToken::List(vec![atom("\\Marked")]),
                ]),
                atom("."),
                atom("INBOX"),
            ]
        );
    }

    #[test]
    fn tokens_after_closed_list_attach_at_outer_level() {
        let (tokens, _) = parse_one("* (a) b");
        assert_eq!(
            tokens,
            vec![atom("*"), ResponseToken::List(vec![atom("a")]), atom("b")]
        );
    }

    #[test]
    fn annotation_tokens_are_separate() {
        let (tokens, annotations) = parse_one("* OK [UIDNEXT 4392] predicted next UID");
        assert_eq!(
            tokens,
            vec![
                atom("*"),
                atom("OK"),
                atom("predicted"),
                atom("next"),
                atom("UID"),
            ]
        );
        assert_eq!(annotations, vec![atom("UIDNEXT"), atom("4392")]);
    }

    #[test]
    fn literal_flow() {
        let mut parser = ResponseParser::new();
        parser.feed_line("* 1 FETCH (BODY[] {11}").unwrap();
        assert_eq!(parser.pending_literal(), Some(11));
        parser.attach_literal(b"Hello World".to_vec()).unwrap();
        assert_eq!(parser.pending_literal(), None);
        parser.feed_line(")").unwrap();

        let (tokens, _) = parser.take_tokens();
        assert_eq!(tokens[0], atom("*"));
        assert_eq!(tokens[1], atom("1"));
        assert_eq!(tokens[2], atom("FETCH"));
        let list = tokens[3].as_list().unwrap();
        assert_eq!(list[0], atom("BODY"));
        assert_eq!(
            list[1],
            ResponseToken::Literal {
                declared_len: 11,
                data: b"Hello World".to_vec(),
            }
        );
    }

    #[test]
    fn zero_length_literal() {
        let mut parser = ResponseParser::new();
        parser.feed_line("* 1 FETCH (BODY[] {0}").unwrap();
        assert_eq!(parser.pending_literal(), Some(0));
        parser.attach_literal(Vec::new()).unwrap();
        parser.feed_line(")").unwrap();
        let (tokens, _) = parser.take_tokens();
        let list = tokens[3].as_list().unwrap();
        assert_eq!(list[1].as_literal().unwrap(), b"");
    }

    #[test]
    fn literal_length_mismatch_is_rejected() {
        let mut parser = ResponseParser::new();
        parser.feed_line("* {5}").unwrap();
        assert!(parser.attach_literal(b"toolong".to_vec()).is_err());
    }

    #[test]
    fn unbalanced_close_paren() {
        let mut parser = ResponseParser::new();
        assert!(matches!(parser.feed_line("* a)"), Err(Error::Parse(_))));
    }

    #[test]
    fn close_bracket_without_open() {
        let mut parser = ResponseParser::new();
        assert!(matches!(parser.feed_line("* a]"), Err(Error::Parse(_))));
    }

    #[test]
    fn nested_open_bracket_is_rejected() {
        let mut parser = ResponseParser::new();
        assert!(matches!(parser.feed_line("* [a [b"), Err(Error::Parse(_))));
    }

    #[test]
    fn non_digit_in_literal_size_is_rejected() {
        let mut parser = ResponseParser::new();
        assert!(matches!(parser.feed_line("* {12a}"), Err(Error::Parse(_))));
    }

    #[test]
    fn text_after_literal_size_is_rejected() {
        let mut parser = ResponseParser::new();
        assert!(matches!(
            parser.feed_line("* {5} trailing"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn specials_inside_quotes_are_data() {
        let (tokens, annotations) = parse_one(r#"* "(not a list) [nor code] {9}""#);
        assert_eq!(tokens, vec![atom("*"), atom("(not a list) [nor code] {9}")]);
        assert!(annotations.is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let mut parser = ResponseParser::new();
        parser.feed_line("* ({3}").unwrap();
        parser.reset();
        let (tokens, annotations) = parser.take_tokens();
        assert!(tokens.is_empty());
        assert!(annotations.is_empty());
        assert_eq!(parser.pending_literal(), None);
    }
}
