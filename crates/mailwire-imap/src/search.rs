//! SEARCH condition rendering.

use chrono::NaiveDate;

use crate::command::quote_string;
use crate::types::{ranges_to_string, MessageRange};

/// One SEARCH criterion, rendered to its canonical protocol fragment.
///
/// Dates render as `dd-Mon-yyyy` with English month abbreviations; range
/// lists render comma-joined with `*` for an open upper bound; string
/// values are double-quoted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchCondition {
    /// Every message in the mailbox.
    All,
    /// Messages with these sequence numbers.
    SeqList(Vec<MessageRange>),
    /// Messages with these UIDs.
    UidList(Vec<MessageRange>),
    /// Subject contains the string.
    Subject(String),
    /// Body contains the string.
    Body(String),
    /// From header contains the string.
    From(String),
    /// To header contains the string.
    To(String),
    /// Internal date earlier than the date.
    Before(NaiveDate),
    /// Internal date within the date.
    On(NaiveDate),
    /// Internal date on or after the date.
    Since(NaiveDate),
    /// Recent messages not yet seen.
    New,
    /// Messages with the `\Recent` flag.
    Recent,
    /// Messages with the `\Seen` flag.
    Seen,
    /// Messages without the `\Seen` flag.
    Unseen,
}

impl std::fmt::Display for SearchCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("ALL"),
            Self::SeqList(ranges) => f.write_str(&ranges_to_string(ranges)),
            Self::UidList(ranges) => write!(f, "UID {}", ranges_to_string(ranges)),
            Self::Subject(text) => write!(f, "SUBJECT {}", quote_string(text)),
            Self::Body(text) => write!(f, "BODY {}", quote_string(text)),
            Self::From(text) => write!(f, "FROM {}", quote_string(text)),
            Self::To(text) => write!(f, "TO {}", quote_string(text)),
            Self::Before(date) => write!(f, "BEFORE {}", format_date(*date)),
            Self::On(date) => write!(f, "ON {}", format_date(*date)),
            Self::Since(date) => write!(f, "SINCE {}", format_date(*date)),
            Self::New => f.write_str("NEW"),
            Self::Recent => f.write_str("RECENT"),
            Self::Seen => f.write_str("SEEN"),
            Self::Unseen => f.write_str("UNSEEN"),
        }
    }
}

/// Renders a date as `dd-Mon-yyyy`.
fn format_date(date: NaiveDate) -> String {
    date.format("%d-%b-%Y").to_string()
}

/// Joins conditions into the SEARCH argument string.
#[must_use]
pub(crate) fn render_conditions(conditions: &[SearchCondition]) -> String {
    let rendered: Vec<String> = conditions.iter().map(ToString::to_string).collect();
    rendered.join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bare_keys() {
        assert_eq!(SearchCondition::All.to_string(), "ALL");
        assert_eq!(SearchCondition::New.to_string(), "NEW");
        assert_eq!(SearchCondition::Recent.to_string(), "RECENT");
        assert_eq!(SearchCondition::Seen.to_string(), "SEEN");
        assert_eq!(SearchCondition::Unseen.to_string(), "UNSEEN");
    }

    #[test]
    fn dates_render_with_english_month_abbreviations() {
        assert_eq!(
            SearchCondition::Before(date(2009, 7, 17)).to_string(),
            "BEFORE 17-Jul-2009"
        );
        assert_eq!(
            SearchCondition::On(date(2024, 1, 5)).to_string(),
            "ON 05-Jan-2024"
        );
        assert_eq!(
            SearchCondition::Since(date(1999, 12, 31)).to_string(),
            "SINCE 31-Dec-1999"
        );
    }

    #[test]
    fn range_lists_join_with_commas() {
        assert_eq!(
            SearchCondition::SeqList(vec![MessageRange::new(1, 5), MessageRange::open(8)])
                .to_string(),
            "1:5,8:*"
        );
        assert_eq!(
            SearchCondition::UidList(vec![MessageRange::single(42)]).to_string(),
            "UID 42:42"
        );
    }

    #[test]
    fn string_values_are_quoted() {
        assert_eq!(
            SearchCondition::Subject("hello world".to_string()).to_string(),
            "SUBJECT \"hello world\""
        );
        assert_eq!(
            SearchCondition::From("a\"b".to_string()).to_string(),
            "FROM \"a\\\"b\""
        );
    }

    #[test]
    fn conditions_join_with_spaces() {
        let rendered = render_conditions(&[
            SearchCondition::Unseen,
            SearchCondition::Since(date(2024, 3, 2)),
        ]);
        assert_eq!(rendered, "UNSEEN SINCE 02-Mar-2024");
    }
}
