//! Tender document downloads into a local directory.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_DISPOSITION;
use tempfile::NamedTempFile;
use url::Url;

use crate::error::Result;
use crate::http::fetch;
use crate::pipeline::DocumentFetcher;

/// Extension given to documents whose name cannot be derived from the response.
const FALLBACK_EXTENSION: &str = "pdf";

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DISPOSITION_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"filename="?([^";]+)"?"#).expect("valid regex"));

/// Downloads documents over HTTP, never overwriting existing files.
pub struct HttpDocumentFetcher {
    client: Client,
    download_dir: PathBuf,
}

impl HttpDocumentFetcher {
    pub fn new(client: Client, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            download_dir: download_dir.into(),
        }
    }
}

impl DocumentFetcher for HttpDocumentFetcher {
    fn fetch(&self, uri: &str, base_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.download_dir)?;

        let mut response = fetch(&self.client, uri)?;
        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        // Removed on drop unless persisted.
        let mut partial = NamedTempFile::new_in(&self.download_dir)?;
        let bytes = response.copy_to(partial.as_file_mut())?;

        let file_name = document_file_name(uri, disposition.as_deref(), base_name);
        let path = unique_path(&self.download_dir, &file_name);
        partial.persist_noclobber(&path).map_err(|e| e.error)?;
        tracing::debug!(uri, path = %path.display(), bytes, "Document stored");

        Ok(path)
    }
}

/// Pick a file name for a downloaded document.
///
/// Order: last URL path segment when it has an extension, then the
/// `Content-Disposition` file name, then `<base_name>.pdf`.
///
/// # Examples
/// ```
/// use placsp_harvester::download::document_file_name;
///
/// assert_eq!(document_file_name("https://x/docs/pliego.pdf", None, "id"), "pliego.pdf");
/// assert_eq!(
///     document_file_name("https://x/download?id=1", Some("attachment; filename=\"pcap.pdf\""), "id"),
///     "pcap.pdf"
/// );
/// assert_eq!(
///     document_file_name("https://x/download", None, "urn:uuid/42"),
///     "urn_uuid_42.pdf"
/// );
/// ```
pub fn document_file_name(uri: &str, disposition: Option<&str>, base_name: &str) -> String {
    if let Some(name) = url_file_name(uri) {
        return name;
    }
    if let Some(name) = disposition.and_then(disposition_file_name) {
        return name;
    }
    format!("{}.{FALLBACK_EXTENSION}", sanitize_file_name(base_name))
}

fn url_file_name(uri: &str) -> Option<String> {
    let url = Url::parse(uri).ok()?;
    let segment = url.path_segments()?.next_back()?;
    Path::new(segment)
        .extension()
        .is_some()
        .then(|| segment.to_string())
}

fn disposition_file_name(header: &str) -> Option<String> {
    let raw = DISPOSITION_FILENAME.captures(header)?.get(1)?.as_str().trim();
    // Drop any directory part a server might send along.
    let name = Path::new(raw).file_name()?.to_str()?;
    (!name.is_empty()).then(|| name.to_string())
}

/// Replace path and drive separators so an identifier can serve as a file name.
pub fn sanitize_file_name(name: &str) -> String {
    name.replace(['/', ':'], "_")
}

/// First free path for `file_name` in `dir`, appending `_1`, `_2`, ... before
/// the extension on collision.
///
/// # Arguments
/// * `dir` - Download directory
/// * `file_name` - Preferred file name
///
/// # Returns
/// A path in `dir` that does not exist yet.
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = name.extension().map(|e| e.to_string_lossy().into_owned());

    (1u32..)
        .map(|n| match &extension {
            Some(ext) => dir.join(format!("{stem}_{n}.{ext}")),
            None => dir.join(format!("{stem}_{n}")),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}
