//! Core data types for the harvester.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Separator between aggregated values in derived fields.
pub const FIELD_SEPARATOR: &str = " | ";

/// One record extracted from a feed entry.
///
/// Every field is optional: feeds routinely omit parts of the payload, and an
/// entry without an `id` is still a valid (unnamed) entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Option<String>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub updated: Option<String>,
    pub link: Option<String>,

    /// URI of the technical document attached to the tender.
    pub document_uri: Option<String>,

    /// All party names, joined with `" | "` in document order.
    pub party_names: Option<String>,

    /// All commodity classification codes, joined with `" | "` in document order.
    pub classification_codes: Option<String>,
}

impl Entry {
    /// Whether every field is absent or blank.
    ///
    /// # Examples
    /// ```
    /// use placsp_harvester::types::Entry;
    ///
    /// assert!(Entry::default().is_empty());
    ///
    /// let entry = Entry { id: Some("urn:1".to_string()), ..Entry::default() };
    /// assert!(!entry.is_empty());
    /// ```
    #[must_use]
    pub fn is_empty(&self) -> bool {
        [
            &self.id,
            &self.title,
            &self.summary,
            &self.updated,
            &self.link,
            &self.document_uri,
            &self.party_names,
            &self.classification_codes,
        ]
        .iter()
        .all(|field| field.as_deref().is_none_or(|v| v.trim().is_empty()))
    }

    /// Identifier for logs and file names.
    #[must_use]
    pub fn display_id(&self) -> &str {
        self.id.as_deref().unwrap_or("unknown")
    }
}

/// An entry after filtering and document acquisition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedEntry {
    #[serde(flatten)]
    pub entry: Entry,

    /// Local path of the downloaded document, if acquisition succeeded.
    pub downloaded_file: Option<PathBuf>,
}

impl ProcessedEntry {
    #[must_use]
    pub fn new(entry: Entry, downloaded_file: Option<PathBuf>) -> Self {
        Self {
            entry,
            downloaded_file,
        }
    }
}
