//! Configuration constants, run settings and source validation.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{HarvesterError, Result};

/// Atom syndication namespace.
pub const ATOM_NS: &str = "http://www.w3.org/2005/Atom";

/// CODICE aggregate components namespace.
pub const CAC_NS: &str = "urn:dgpe:names:draft:codice:schema:xsd:CommonAggregateComponents-2";

/// CODICE basic components namespace.
pub const CBC_NS: &str = "urn:dgpe:names:draft:codice:schema:xsd:CommonBasicComponents-2";

/// PLACE extension of the aggregate components.
pub const CAC_PLACE_EXT_NS: &str =
    "urn:dgpe:names:draft:codice-place-ext:schema:xsd:CommonAggregateComponents-2";

/// PLACE extension of the basic components.
pub const CBC_PLACE_EXT_NS: &str =
    "urn:dgpe:names:draft:codice-place-ext:schema:xsd:CommonBasicComponents-2";

/// Atom tombstones (deleted entries) namespace.
pub const TOMBSTONES_NS: &str = "http://purl.org/atompub/tombstones/1.0";

/// UBL extension components namespace.
pub const UBL_EXT_NS: &str =
    "urn:oasis:names:specification:ubl:schema:xsd:CommonExtensionComponents-2";

/// Well-known prefixes for this document family, in registration order.
pub const KNOWN_NAMESPACES: &[(&str, &str)] = &[
    ("atom", ATOM_NS),
    ("cac", CAC_NS),
    ("cbc", CBC_NS),
    ("cac-place-ext", CAC_PLACE_EXT_NS),
    ("cbc-place-ext", CBC_PLACE_EXT_NS),
    ("at", TOMBSTONES_NS),
    ("ns7", UBL_EXT_NS),
];

/// HTTP timeout in seconds.
///
/// Tender documents can be large PDFs served by slow municipal hosts.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Pause between successive document downloads (milliseconds).
pub const DEFAULT_PACING_DELAY_MS: u64 = 500;

/// Directory receiving downloaded documents.
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloaded_docs";

/// Directory an archive is unpacked into.
pub const DEFAULT_EXTRACT_DIR: &str = "temp_extract";

/// Local file name for an archive fetched from a URL.
pub const DEFAULT_ARCHIVE_FILE: &str = "temp.zip";

/// Report file name.
pub const DEFAULT_OUTPUT_FILE: &str = "extracted_data.txt";

/// Extension of feed files inside an archive.
pub const FEED_FILE_EXTENSION: &str = "atom";

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s/]+").expect("valid regex"));

/// Where the harvest input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// Remote ZIP archive.
    Url(String),
    /// Local ZIP archive.
    Archive(PathBuf),
    /// Local feed file, processed without unpacking.
    Feed(PathBuf),
}

impl Source {
    /// Classify and validate a source argument.
    ///
    /// # Arguments
    /// * `source` - URL or path given by the user
    /// * `local` - `source` is a local path rather than a URL
    /// * `feed` - `source` is a feed file rather than an archive (requires `local`)
    ///
    /// # Examples
    /// ```
    /// use placsp_harvester::config::Source;
    ///
    /// assert!(Source::parse("https://example.org/feed.zip", false, false).is_ok());
    /// assert!(Source::parse("feed.atom", true, true).is_ok());
    /// assert!(Source::parse("feed.atom", false, true).is_err()); // --atom needs --local
    /// assert!(Source::parse("feed.xml", true, true).is_err()); // wrong extension
    /// ```
    pub fn parse(source: &str, local: bool, feed: bool) -> Result<Self> {
        if feed && !local {
            return Err(HarvesterError::InvalidSource(
                "a feed file source must be local".to_string(),
            ));
        }

        if !local {
            if !URL_PATTERN.is_match(source) {
                return Err(HarvesterError::InvalidSource(format!(
                    "'{source}' is not an http(s) URL (use --local for files)"
                )));
            }
            return Ok(Self::Url(source.to_string()));
        }

        let path = PathBuf::from(source);
        if feed {
            if !has_feed_extension(&path) {
                return Err(HarvesterError::InvalidSource(format!(
                    "'{source}' does not have the .{FEED_FILE_EXTENSION} extension"
                )));
            }
            return Ok(Self::Feed(path));
        }

        Ok(Self::Archive(path))
    }

    /// Check that a local source exists.
    pub fn ensure_exists(&self) -> Result<()> {
        match self {
            Self::Url(_) => Ok(()),
            Self::Archive(path) | Self::Feed(path) => {
                if path.exists() {
                    Ok(())
                } else {
                    Err(HarvesterError::SourceNotFound(path.clone()))
                }
            }
        }
    }
}

/// Whether a path names a feed file.
pub fn has_feed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == FEED_FILE_EXTENSION)
}

/// Settings for one harvest run.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub download_dir: PathBuf,
    pub extract_dir: PathBuf,
    pub archive_file: PathBuf,
    pub output_file: PathBuf,
    pub pacing_delay: Duration,
    pub download_documents: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            download_dir: PathBuf::from(DEFAULT_DOWNLOAD_DIR),
            extract_dir: PathBuf::from(DEFAULT_EXTRACT_DIR),
            archive_file: PathBuf::from(DEFAULT_ARCHIVE_FILE),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            pacing_delay: Duration::from_millis(DEFAULT_PACING_DELAY_MS),
            download_documents: true,
        }
    }
}

impl HarvestConfig {
    /// Defaults overridden by `HARVESTER_*` environment variables.
    ///
    /// Unparseable numeric values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let download_dir = std::env::var("HARVESTER_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.download_dir);

        let extract_dir = std::env::var("HARVESTER_EXTRACT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.extract_dir);

        let pacing_delay = std::env::var("HARVESTER_PACING_DELAY_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.pacing_delay);

        Self {
            download_dir,
            extract_dir,
            pacing_delay,
            ..defaults
        }
    }

    pub fn with_download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = dir.into();
        self
    }

    pub fn with_extract_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.extract_dir = dir.into();
        self
    }

    pub fn with_archive_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.archive_file = path.into();
        self
    }

    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = path.into();
        self
    }

    pub fn with_pacing_delay(mut self, delay: Duration) -> Self {
        self.pacing_delay = delay;
        self
    }

    pub fn with_downloads(mut self, enabled: bool) -> Self {
        self.download_documents = enabled;
        self
    }
}
