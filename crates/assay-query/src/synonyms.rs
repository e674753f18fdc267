//! Synonym expansion for string search values.
//!
//! A flat table of synonym groups (one comma-separated group per line,
//! chiefly element symbol/name pairs) loaded once and shared read-only. A
//! value that matches any entry of a group is replaced by the whole group,
//! so the translated query ORs one predicate per synonym.

use std::sync::OnceLock;

/// Built-in synonym table shipped with the crate.
const BUILTIN_SYNONYMS: &str = include_str!("../data/synonyms.txt");

/// A set of synonym groups.
#[derive(Debug, Clone, Default)]
pub struct SynonymTable {
    /// The groups; every entry of a group is a synonym of every other.
    groups: Vec<Vec<String>>,
}

impl SynonymTable {
    /// Parses a table from its text form: one comma-separated group per
    /// line, blank lines ignored.
    pub fn parse(text: &str) -> Self {
        let groups = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.split(',').map(|word| word.trim().to_string()).collect())
            .collect();
        Self { groups }
    }

    /// The built-in table of element symbol/name pairs.
    pub fn builtin() -> &'static Self {
        static BUILTIN: OnceLock<SynonymTable> = OnceLock::new();
        BUILTIN.get_or_init(|| Self::parse(BUILTIN_SYNONYMS))
    }

    /// Looks up the group for a value.
    ///
    /// Matching is case-insensitive and substring-tolerant: the value
    /// matches any group entry that contains it. Returns the first matching
    /// group, or `None`.
    pub fn lookup(&self, value: &str) -> Option<&[String]> {
        if value.is_empty() {
            return None;
        }
        let needle = value.to_lowercase();
        self.groups
            .iter()
            .find(|group| {
                group
                    .iter()
                    .any(|word| word.to_lowercase().contains(&needle))
            })
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_symbol_match() {
        let group = SynonymTable::builtin().lookup("Cu").unwrap();
        assert!(group.contains(&"copper".to_string()));
        assert!(group.contains(&"Cu".to_string()));
    }

    #[test]
    fn case_insensitive() {
        let group = SynonymTable::builtin().lookup("COPPER").unwrap();
        assert!(group.contains(&"Cu".to_string()));
    }

    #[test]
    fn substring_tolerant() {
        // "coppe" is a substring of "copper"
        assert!(SynonymTable::builtin().lookup("coppe").is_some());
    }

    #[test]
    fn no_match() {
        assert!(SynonymTable::builtin().lookup("styrofoam").is_none());
        assert!(SynonymTable::builtin().lookup("").is_none());
    }

    #[test]
    fn custom_table() {
        let table = SynonymTable::parse("PTFE,teflon\n\nPE,polyethylene\n");
        assert_eq!(
            table.lookup("teflon").unwrap(),
            &["PTFE".to_string(), "teflon".to_string()]
        );
        assert!(table.lookup("acrylic").is_none());
    }
}
