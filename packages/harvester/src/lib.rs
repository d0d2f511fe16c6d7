//! PLACSP Harvester - Extract procurement entries from Atom feed archives.
//!
//! Spanish public procurement feeds wrap CODICE payloads in Atom entries, and
//! the namespaces are declared inconsistently: sometimes as a default
//! namespace, sometimes with prefixes, sometimes not at all. This crate
//! recovers a fixed set of fields per entry regardless of that layout, then
//! filters the entries, downloads their tender documents and writes a report.
//!
//! # Example
//!
//! ```
//! use placsp_harvester::parse_feed;
//!
//! let prefixed = r#"<a:feed xmlns:a="http://www.w3.org/2005/Atom">
//!   <a:entry><a:id>urn:1</a:id></a:entry>
//! </a:feed>"#;
//! let bare = "<feed><entry><id>urn:1</id></entry></feed>";
//!
//! assert_eq!(parse_feed(prefixed).unwrap(), parse_feed(bare).unwrap());
//! ```
//!
//! # Architecture
//!
//! The harvester is organized into several modules:
//!
//! - [`namespace`]: Prefix to URI mapping for a document
//! - [`strategy`]: Ordered element lookup strategies
//! - [`locator`]: Finding entry elements
//! - [`resolver`]: Resolving simple entry fields
//! - [`extract`]: Building an [`Entry`] from an entry element
//! - [`feed`]: Parsing a whole feed document
//! - [`filter`]: Substring filters over entries
//! - [`pipeline`]: Filtering and paced document acquisition
//! - [`download`]: HTTP document fetcher
//! - [`archive`]: ZIP download, unpacking and feed discovery
//! - [`report`]: Text and YAML reports
//! - [`inspect`]: Structure dump for debugging feeds
//! - [`config`]: Configuration constants, run settings and sources
//! - [`error`]: Error types and Result alias
//! - [`http`]: HTTP client with retry
//! - [`xml`]: XML utilities
//! - [`cli`]: Command-line interface
//! - [`harvester`]: Main harvester service

pub mod archive;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod extract;
pub mod feed;
pub mod filter;
pub mod harvester;
pub mod http;
pub mod inspect;
pub mod locator;
pub mod namespace;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod strategy;
pub mod types;
pub mod xml;

// Re-export main functions
pub use feed::parse_feed;
pub use harvester::{Harvester, RunSummary};
pub use pipeline::harvest_document;

// Re-export commonly used items
pub use config::{HarvestConfig, Source};
pub use error::{HarvesterError, Result};
pub use filter::EntryFilter;
pub use namespace::{resolve_namespaces, NamespaceMap};
pub use pipeline::{DocumentFetcher, EntryProcessor};
pub use types::{Entry, ProcessedEntry};
