//! Command argument rendering.

/// Renders a command argument as an astring.
///
/// Values matching the atom production are sent bare; anything else is
/// double-quoted with `"` and `\` backslash-escaped. Values containing
/// CR, LF or NUL cannot be represented in a quoted string and are the
/// caller's responsibility to avoid.
#[must_use]
pub fn to_astring(text: &str) -> String {
    if !text.is_empty() && text.bytes().all(is_atom_byte) {
        text.to_string()
    } else {
        quote_string(text)
    }
}

/// Double-quotes a string, escaping `"` and `\`.
#[must_use]
pub(crate) fn quote_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        if ch == '"' || ch == '\\' {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

/// True for bytes allowed in a bare atom argument.
const fn is_atom_byte(b: u8) -> bool {
    !matches!(
        b,
        b'(' | b')' | b'{' | b'}' | b'[' | b']' | b'"' | b'\\' | b'%' | b'*'
    ) && b > 0x20
        && b != 0x7F
}

/// Flag mutation for the STORE command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreAction {
    /// Replace the flag set (`FLAGS`).
    SetFlags(Vec<String>),
    /// Add to the flag set (`+FLAGS`).
    AddFlags(Vec<String>),
    /// Remove from the flag set (`-FLAGS`).
    RemoveFlags(Vec<String>),
}

impl StoreAction {
    /// Renders the item name and parenthesized value list.
    #[must_use]
    pub fn render(&self) -> String {
        let (item, flags) = match self {
            Self::SetFlags(flags) => ("FLAGS", flags),
            Self::AddFlags(flags) => ("+FLAGS", flags),
            Self::RemoveFlags(flags) => ("-FLAGS", flags),
        };
        format!("{item} ({})", flags.join(" "))
    }
}
