//! `info.txt` metadata reader.
//!
//! One property per line, `name: value`. Parsing is best-effort: malformed
//! lines are dropped and the reader never fails.
//!
//! Known format limitation: the separator has no escape form. Lines split at
//! the first `": "`, so a name can never contain it and a value containing it
//! survives only by that accident of ordering.

use std::collections::HashMap;
use std::convert::Infallible;
use std::str::FromStr;

/// Separator between a property name and its value.
pub const SEPARATOR: &str = ": ";

/// Conventional file name for level and song metadata.
pub const INFO_FILE: &str = "info.txt";

/// Parsed `name → raw value` mapping. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    props: HashMap<String, String>,
}

impl MetadataRecord {
    /// Parses a metadata blob. Later duplicate keys overwrite earlier ones.
    pub fn parse(text: &str) -> Self {
        let mut props = HashMap::new();
        let text = text.trim();
        if text.is_empty() {
            return Self { props };
        }

        for line in text.split('\n') {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some(idx) = line.find(SEPARATOR) else {
                continue;
            };
            let value_start = idx + SEPARATOR.len();
            if idx == 0 || value_start >= line.len() {
                continue;
            }
            props.insert(line[..idx].to_string(), line[value_start..].to_string());
        }

        Self { props }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.props.get(name).map(String::as_str)
    }

    /// Coerces a property; `None` when absent or not parseable as `T`.
    pub fn get_parsed<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name)?.trim().parse().ok()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromStr for MetadataRecord {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_scenario() {
        let rec = MetadataRecord::parse("full_name: Test Level\ncreators: Alice\ndifficulty: 5");
        assert_eq!(rec.len(), 3);
        assert_eq!(rec.get("full_name"), Some("Test Level"));
        assert_eq!(rec.get("creators"), Some("Alice"));
        assert_eq!(rec.get("difficulty"), Some("5"));
        assert_eq!(rec.get_parsed::<u32>("difficulty"), Some(5));
    }

    #[test]
    fn empty_and_blank_input() {
        assert!(MetadataRecord::parse("").is_empty());
        assert!(MetadataRecord::parse("  \n\n \t").is_empty());
    }

    #[test]
    fn lines_without_separator_are_dropped() {
        let rec = MetadataRecord::parse("no separator here\nname:value\nok: yes");
        assert_eq!(rec.len(), 1);
        assert_eq!(rec.get("ok"), Some("yes"));
    }

    #[test]
    fn empty_name_or_value_is_dropped() {
        let rec = MetadataRecord::parse(": orphan\nblank: \nkept: 1");
        assert_eq!(rec.len(), 1);
        assert!(!rec.contains("blank"));
        assert!(rec.contains("kept"));
    }

    #[test]
    fn later_duplicates_overwrite() {
        let rec = MetadataRecord::parse("bpm: 120\nbpm: 140");
        assert_eq!(rec.get("bpm"), Some("140"));
    }

    #[test]
    fn crlf_line_endings() {
        let rec = MetadataRecord::parse("artist: Someone\r\ntitle: Song\r\n");
        assert_eq!(rec.get("artist"), Some("Someone"));
        assert_eq!(rec.get("title"), Some("Song"));
    }

    #[test]
    fn separator_inside_value_splits_at_first() {
        // No escape form exists; everything after the first separator is the value.
        let rec = MetadataRecord::parse("note: time: 3pm");
        assert_eq!(rec.get("note"), Some("time: 3pm"));
    }

    #[test]
    fn unparsable_coercion_is_none() {
        let rec = MetadataRecord::parse("difficulty: hard");
        assert_eq!(rec.get_parsed::<f32>("difficulty"), None);
        assert_eq!(rec.get_parsed::<f32>("missing"), None);
    }

    #[test]
    fn well_formed_lines_round_trip() {
        let pairs = [("a", "1"), ("long_name", "Some value with spaces"), ("x", "-")];
        let text: String = pairs.iter().map(|(k, v)| format!("{k}{SEPARATOR}{v}\n")).collect();
        let rec: MetadataRecord = text.parse().unwrap();
        for (k, v) in pairs {
            assert_eq!(rec.get(k), Some(v));
        }
    }
}
