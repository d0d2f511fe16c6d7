//! ZIP bundle handling: download, unpack and feed file discovery.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;
use walkdir::WalkDir;
use zip::ZipArchive;

use crate::config::has_feed_extension;
use crate::error::Result;
use crate::http::fetch;

/// Download a ZIP bundle to `destination`.
///
/// # Arguments
/// * `client` - HTTP client to use
/// * `url` - Location of the bundle
/// * `destination` - File the bundle is written to
///
/// # Returns
/// The path of the stored bundle.
pub fn download_archive(client: &Client, url: &str, destination: &Path) -> Result<PathBuf> {
    tracing::info!(url, "Downloading archive");

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut response = fetch(client, url)?;
    let mut file = File::create(destination)?;
    let bytes = response.copy_to(&mut file)?;

    tracing::info!(path = %destination.display(), bytes, "Archive downloaded");
    Ok(destination.to_path_buf())
}

/// Unpack `archive_path` into `target_dir` and return the directory.
///
/// Entries whose names would escape `target_dir` are skipped.
///
/// # Arguments
/// * `archive_path` - ZIP file to unpack
/// * `target_dir` - Directory receiving the contents, created when missing
///
/// # Returns
/// `target_dir`, once every safe entry has been written.
pub fn extract_archive(archive_path: &Path, target_dir: &Path) -> Result<PathBuf> {
    let mut archive = ZipArchive::new(File::open(archive_path)?)?;
    fs::create_dir_all(target_dir)?;

    for index in 0..archive.len() {
        let mut file = archive.by_index(index)?;
        let Some(relative) = file.enclosed_name() else {
            tracing::warn!(name = file.name(), "Skipping archive entry with unsafe path");
            continue;
        };
        let out_path = target_dir.join(relative);

        if file.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }

        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = File::create(&out_path)?;
        io::copy(&mut file, &mut out)?;
    }

    tracing::info!(
        archive = %archive_path.display(),
        target = %target_dir.display(),
        files = archive.len(),
        "Archive extracted"
    );
    Ok(target_dir.to_path_buf())
}

/// All feed files below `dir`, sorted by path.
pub fn find_feed_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file() && has_feed_extension(path))
        .collect();
    files.sort();

    tracing::debug!(dir = %dir.display(), count = files.len(), "Found feed files");
    files
}
