// File: src/core/replacements.rs
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const DEFAULT_REPLACEMENTS: &[(&str, &str)] = &[
    ("«", "\""),
    ("»", "\""),
    ("„", "\""),
    ("“", "\""),
    ("”", "\""),
    ("‘", "'"),
    ("’", "'"),
    ("‚", "'"),
    ("–", "-"),
    ("—", "-"),
    ("…", "..."),
    ("\u{00a0}", " "),
    ("\u{00ad}", ""),
    ("\u{200b}", ""),
];

/// Literal substitutions applied to source text before segmentation.
///
/// Serialized as a flat string-to-string object. Longer keys win over shorter
/// keys sharing a prefix, so the result never depends on map order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplacementTable {
    entries: BTreeMap<String, String>,
}

impl Default for ReplacementTable {
    fn default() -> Self {
        DEFAULT_REPLACEMENTS
            .iter()
            .map(|&(from, to)| (from.to_string(), to.to_string()))
            .collect()
    }
}

impl FromIterator<(String, String)> for ReplacementTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let entries = iter.into_iter().filter(|(from, _)| !from.is_empty()).collect();
        Self { entries }
    }
}

impl ReplacementTable {
    pub fn empty() -> Self {
        Self { entries: BTreeMap::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, from: &str) -> Option<&str> {
        self.entries.get(from).map(String::as_str)
    }

    /// Adds or overrides a substitution. Empty keys are ignored.
    pub fn insert(&mut self, from: impl Into<String>, to: impl Into<String>) {
        let from = from.into();
        if !from.is_empty() {
            self.entries.insert(from, to.into());
        }
    }

    pub fn remove(&mut self, from: &str) -> Option<String> {
        self.entries.remove(from)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Applies every substitution in a single left-to-right pass.
    /// Replaced output is never rescanned.
    pub fn normalize(&self, text: &str) -> String {
        if self.entries.is_empty() {
            return text.to_string();
        }

        let mut keys: Vec<(&str, &str)> = self.iter().collect();
        keys.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(b.0)));

        let mut result = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(c) = rest.chars().next() {
            match keys.iter().find(|(from, _)| rest.starts_with(from)) {
                Some((from, to)) => {
                    result.push_str(to);
                    rest = &rest[from.len()..];
                }
                None => {
                    result.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_normalize_typography() {
        let table = ReplacementTable::default();
        assert_eq!(table.normalize("«Oui» — dit‑il…"), "\"Oui\" - dit‑il...");
        assert_eq!(table.normalize("a\u{00a0}b\u{00ad}c"), "a bc");
    }

    #[test]
    fn longer_keys_take_precedence() {
        let mut table = ReplacementTable::empty();
        table.insert("a", "1");
        table.insert("ab", "2");
        assert_eq!(table.normalize("abab a"), "22 1");
    }

    #[test]
    fn replacement_output_is_not_rescanned() {
        let mut table = ReplacementTable::empty();
        table.insert("x", "xy");
        table.insert("y", "z");
        assert_eq!(table.normalize("xy"), "xyz");
    }

    #[test]
    fn empty_keys_are_ignored() {
        let mut table = ReplacementTable::empty();
        table.insert("", "boom");
        assert!(table.is_empty());
        assert_eq!(table.normalize("abc"), "abc");
    }

    #[test]
    fn serializes_as_flat_object() {
        let mut table = ReplacementTable::empty();
        table.insert("«", "\"");
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"«":"\""}"#);
        let back: ReplacementTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
