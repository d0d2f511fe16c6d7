//! Feed document parsing: namespaces, entries and per-entry extraction.

use std::fs;
use std::path::Path;

use roxmltree::Document;

use crate::error::Result;
use crate::extract::extract_entry;
use crate::http::bytes_to_string;
use crate::locator::locate_entries;
use crate::namespace::resolve_namespaces;
use crate::types::Entry;

/// Parse a feed document and extract its entries.
///
/// Entries without any data are dropped. A feed without entries yields an
/// empty vector; only malformed XML is an error.
///
/// # Examples
/// ```
/// use placsp_harvester::feed::parse_feed;
///
/// let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
///   <entry><id>urn:1</id><title>Cleaning services</title></entry>
///   <entry><title>   </title></entry>
/// </feed>"#;
/// let entries = parse_feed(xml).unwrap();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].title.as_deref(), Some("Cleaning services"));
/// ```
pub fn parse_feed(xml: &str) -> Result<Vec<Entry>> {
    let doc = Document::parse(xml.trim_start_matches('\u{feff}'))?;
    let namespaces = resolve_namespaces(&doc);

    let root = doc.root_element();
    let elements = locate_entries(root);
    if elements.is_empty() {
        tracing::warn!(root = root.tag_name().name(), "No <entry> elements found");
        return Ok(Vec::new());
    }

    let located = elements.len();
    let entries: Vec<Entry> = elements
        .into_iter()
        .filter_map(|element| extract_entry(element, &namespaces))
        .collect();

    tracing::info!(located, valid = entries.len(), "Extracted entries");
    Ok(entries)
}

/// Read and parse a feed file.
///
/// # Arguments
/// * `path` - Feed file on disk
///
/// # Returns
/// The extracted entries, or an error when the file cannot be read or parsed.
pub fn parse_feed_file(path: &Path) -> Result<Vec<Entry>> {
    tracing::info!(path = %path.display(), "Processing feed file");
    let bytes = fs::read(path)?;
    let xml = bytes_to_string(&bytes, &path.display().to_string());
    parse_feed(&xml)
}
