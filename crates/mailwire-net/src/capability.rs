//! Server capability set shared by the SMTP and IMAP engines.

use std::collections::HashMap;

/// Capabilities advertised by the server.
///
/// Keywords are case-insensitive and stored uppercased; each keyword maps
/// to the ordered list of parameter tokens it was announced with (empty
/// when the capability carries no arguments). The set is replaced wholesale
/// on every EHLO / CAPABILITY exchange and must be considered stale after a
/// TLS upgrade until refreshed.
#[derive(Debug, Clone, Default)]
pub struct Capabilities {
    entries: HashMap<String, Vec<String>>,
}

impl Capabilities {
    /// Creates an empty capability set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a capability, merging parameters on duplicate keywords.
    pub fn insert(&mut self, keyword: &str, parameters: impl IntoIterator<Item = String>) {
        self.entries
            .entry(keyword.to_ascii_uppercase())
            .or_default()
            .extend(parameters);
    }

    /// Returns true if the keyword was announced, ignoring case.
    #[must_use]
    pub fn supports(&self, keyword: &str) -> bool {
        self.entries.contains_key(&keyword.to_ascii_uppercase())
    }

    /// Returns the parameters announced for a keyword, ignoring case.
    #[must_use]
    pub fn parameters(&self, keyword: &str) -> Option<&[String]> {
        self.entries
            .get(&keyword.to_ascii_uppercase())
            .map(Vec::as_slice)
    }

    /// Returns true if nothing has been announced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Discards all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterates over `(keyword, parameters)` pairs in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let mut caps = Capabilities::new();
        caps.insert("StartTls", []);
        assert!(caps.supports("STARTTLS"));
        assert!(caps.supports("starttls"));
        assert!(!caps.supports("AUTH"));
    }

    #[test]
    fn duplicate_keywords_merge_parameters() {
        let mut caps = Capabilities::new();
        caps.insert("AUTH", vec!["LOGIN".to_string()]);
        caps.insert("auth", vec!["PLAIN".to_string()]);
        assert_eq!(
            caps.parameters("Auth"),
            Some(["LOGIN".to_string(), "PLAIN".to_string()].as_slice())
        );
    }

    #[test]
    fn empty_parameter_list_means_bare_announcement() {
        let mut caps = Capabilities::new();
        caps.insert("STARTTLS", []);
        assert_eq!(caps.parameters("STARTTLS"), Some([].as_slice()));
        assert_eq!(caps.parameters("SIZE"), None);
    }

    #[test]
    fn clear_empties_the_set() {
        let mut caps = Capabilities::new();
        caps.insert("SIZE", vec!["35882577".to_string()]);
        assert!(!caps.is_empty());
        caps.clear();
        assert!(caps.is_empty());
    }
}
