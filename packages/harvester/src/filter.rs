//! Substring filters over the derived entry fields.

use std::fmt;

use crate::types::Entry;

/// Optional case-insensitive substring filters on party names and
/// classification codes. Both must match when both are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    name: Option<String>,
    code: Option<String>,
}

impl EntryFilter {
    /// Build a filter. Blank patterns are ignored.
    ///
    /// # Examples
    /// ```
    /// use placsp_harvester::filter::EntryFilter;
    /// use placsp_harvester::types::Entry;
    ///
    /// let filter = EntryFilter::new(Some("acme"), None);
    /// let entry = Entry {
    ///     party_names: Some("Acme Corp | Globex".to_string()),
    ///     ..Entry::default()
    /// };
    /// assert!(filter.matches(&entry));
    /// ```
    pub fn new(name: Option<&str>, code: Option<&str>) -> Self {
        let normalize = |pattern: Option<&str>| {
            pattern
                .filter(|p| !p.trim().is_empty())
                .map(str::to_lowercase)
        };
        Self {
            name: normalize(name),
            code: normalize(code),
        }
    }

    /// Whether any filter is set.
    pub fn is_active(&self) -> bool {
        self.name.is_some() || self.code.is_some()
    }

    /// Whether `entry` passes every active filter.
    pub fn matches(&self, entry: &Entry) -> bool {
        contains_ci(entry.party_names.as_deref(), self.name.as_deref())
            && contains_ci(entry.classification_codes.as_deref(), self.code.as_deref())
    }
}

impl fmt::Display for EntryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(name) = &self.name {
            parts.push(format!("name: '{name}'"));
        }
        if let Some(code) = &self.code {
            parts.push(format!("code: '{code}'"));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// `pattern` is already lower-cased. An inactive pattern always matches; an
/// absent field never matches an active one.
fn contains_ci(field: Option<&str>, pattern: Option<&str>) -> bool {
    match (pattern, field) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(pattern), Some(value)) => value.to_lowercase().contains(pattern),
    }
}
