//! Filtering and document acquisition for extracted entries.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::error::Result;
use crate::feed::parse_feed;
use crate::filter::EntryFilter;
use crate::types::{Entry, ProcessedEntry};

/// Acquires the document behind an entry's `document_uri`.
pub trait DocumentFetcher {
    /// Store the document at `uri` and return its location.
    ///
    /// `base_name` is a suggestion for naming the stored file when the URI
    /// does not carry a usable file name.
    fn fetch(&self, uri: &str, base_name: &str) -> Result<PathBuf>;
}

/// Sequential, paced document acquisition over filtered entries.
pub struct EntryProcessor<'f> {
    fetcher: Option<&'f dyn DocumentFetcher>,
    pacing: Duration,
}

impl<'f> EntryProcessor<'f> {
    /// Processor that downloads through `fetcher`, pausing `pacing` after each entry.
    pub fn new(fetcher: &'f dyn DocumentFetcher, pacing: Duration) -> Self {
        Self {
            fetcher: Some(fetcher),
            pacing,
        }
    }

    /// Processor that only filters; every `downloaded_file` stays `None`.
    pub fn without_downloads() -> Self {
        Self {
            fetcher: None,
            pacing: Duration::ZERO,
        }
    }

    /// Filter `entries` and acquire the documents of the survivors.
    ///
    /// A failed acquisition only affects its own entry.
    pub fn process(&self, entries: Vec<Entry>, filter: &EntryFilter) -> Vec<ProcessedEntry> {
        let mut processed = Vec::new();

        for entry in entries {
            if !filter.matches(&entry) {
                tracing::debug!(
                    id = entry.display_id(),
                    filter = %filter,
                    "Entry filtered out"
                );
                continue;
            }

            tracing::info!(id = entry.display_id(), "Processing entry");

            let downloaded_file = match (self.fetcher, entry.document_uri.as_deref()) {
                (Some(fetcher), Some(uri)) => self.acquire(fetcher, uri, entry.display_id()),
                (None, Some(_)) => None,
                (_, None) => {
                    tracing::info!(id = entry.display_id(), "No document URI for entry");
                    None
                }
            };

            processed.push(ProcessedEntry::new(entry, downloaded_file));

            if self.fetcher.is_some() && !self.pacing.is_zero() {
                thread::sleep(self.pacing);
            }
        }

        processed
    }

    fn acquire(&self, fetcher: &dyn DocumentFetcher, uri: &str, id: &str) -> Option<PathBuf> {
        match fetcher.fetch(uri, id) {
            Ok(path) => {
                tracing::info!(uri, path = %path.display(), "Document downloaded");
                Some(path)
            }
            Err(e) => {
                tracing::error!(uri, error = %e, "Document download failed");
                None
            }
        }
    }
}

/// Parse one feed document and process its entries.
///
/// Returns the processed entries and the number of entries before filtering.
pub fn harvest_document(
    xml: &str,
    filter: &EntryFilter,
    processor: &EntryProcessor<'_>,
) -> Result<(Vec<ProcessedEntry>, usize)> {
    let entries = parse_feed(xml)?;
    let total = entries.len();
    Ok((processor.process(entries, filter), total))
}
