//! Error types for the harvester.
//!
//! Only run-level failures surface as `HarvesterError`. Per-field and
//! per-entry problems (missing elements, failed document downloads) are
//! absorbed by the extraction and pipeline layers and never reach this type.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to download a resource from a specific URL.
    #[error("Failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// All retry attempts for a transient failure were used up.
    #[error("Giving up after {attempts} attempts: {message}")]
    RetriesExhausted { attempts: u32, message: String },

    /// XML parsing failed.
    #[error("XML parsing failed: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// ZIP archive could not be read or unpacked.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization failed: {0}")]
    YamlSerialization(#[from] serde_yaml_ng::Error),

    /// Local source file does not exist.
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Source argument cannot be used as requested.
    #[error("Invalid source: {0}")]
    InvalidSource(String),

    /// Archive contained no feed files.
    #[error("No .atom files found in {}", .0.display())]
    NoFeedFiles(PathBuf),
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
