//! Ignore options that remove properties or whole categories from a comparison

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

/// A recognized ignore option
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum IgnoreOption {
    DatasetAlias,
    FieldAlias,
    HasM,
    HasZ,
    Domains,
    Topology,
}

impl IgnoreOption {
    pub const ALL: [IgnoreOption; 6] = [
        IgnoreOption::DatasetAlias,
        IgnoreOption::FieldAlias,
        IgnoreOption::HasM,
        IgnoreOption::HasZ,
        IgnoreOption::Domains,
        IgnoreOption::Topology,
    ];

    /// Name as typed by the user
    pub fn label(&self) -> &'static str {
        match self {
            IgnoreOption::DatasetAlias => "Feature Class/Table Alias",
            IgnoreOption::FieldAlias => "Field Alias",
            IgnoreOption::HasM => "Has M",
            IgnoreOption::HasZ => "Has Z",
            IgnoreOption::Domains => "Domains",
            IgnoreOption::Topology => "Topology",
        }
    }

    /// Case-insensitive lookup by label
    pub fn from_label(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|option| option.label().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for IgnoreOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Set of enabled ignore options plus any names that were not recognized
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreOptions {
    enabled: BTreeSet<IgnoreOption>,
    pub unknown: Vec<String>,
}

impl IgnoreOptions {
    /// Parse a comma or semicolon separated list such as `'Field Alias';'Has M'`.
    /// Unknown names are logged and kept in `unknown`; they never fail the run.
    pub fn parse(list: &str) -> Self {
        Self::from_names(list.split([',', ';']))
    }

    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut options = Self::default();

        for raw in names {
            let name = raw.trim().trim_matches(|c| c == '\'' || c == '"').trim();
            if name.is_empty() {
                continue;
            }

            match IgnoreOption::from_label(name) {
                Some(option) => {
                    options.enabled.insert(option);
                }
                None => {
                    log::warn!("{} Ignore Property unknown", name);
                    options.unknown.push(name.to_string());
                }
            }
        }

        options
    }

    #[cfg(test)]
    pub fn with(mut self, option: IgnoreOption) -> Self {
        self.enabled.insert(option);
        self
    }

    pub fn contains(&self, option: IgnoreOption) -> bool {
        self.enabled.contains(&option)
    }

    pub fn merge(&mut self, other: IgnoreOptions) {
        self.enabled.extend(other.enabled);
        self.unknown.extend(other.unknown);
    }

    pub fn iter(&self) -> impl Iterator<Item = IgnoreOption> + '_ {
        self.enabled.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_semicolon_list_with_quotes() {
        let options = IgnoreOptions::parse("'Field Alias';'Has M'");
        assert!(options.contains(IgnoreOption::FieldAlias));
        assert!(options.contains(IgnoreOption::HasM));
        assert!(!options.contains(IgnoreOption::HasZ));
        assert!(options.unknown.is_empty());
    }

    #[test]
    fn test_parse_comma_list() {
        let options = IgnoreOptions::parse("Feature Class/Table Alias, Domains,Topology");
        assert!(options.contains(IgnoreOption::DatasetAlias));
        assert!(options.contains(IgnoreOption::Domains));
        assert!(options.contains(IgnoreOption::Topology));
    }

    #[test]
    fn test_unknown_option_is_kept_not_fatal() {
        let options = IgnoreOptions::parse("Has Z;Colour");
        assert!(options.contains(IgnoreOption::HasZ));
        assert_eq!(options.unknown, vec!["Colour".to_string()]);
    }

    #[test]
    fn test_labels_round_trip_case_insensitive() {
        assert_eq!(IgnoreOption::from_label("has m"), Some(IgnoreOption::HasM));
        assert_eq!(IgnoreOption::from_label("FIELD ALIAS"), Some(IgnoreOption::FieldAlias));
        assert_eq!(IgnoreOption::from_label("Alias"), None);
    }

    #[test]
    fn test_empty_entries_skipped() {
        let options = IgnoreOptions::parse(";;  ,");
        assert!(options.is_empty());
        assert!(options.unknown.is_empty());
    }
}
