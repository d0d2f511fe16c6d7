//! Report rendering for processed entries.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::error::Result;
use crate::types::ProcessedEntry;

/// Placeholder printed for absent fields.
const MISSING: &str = "N/A";

/// Output format of the report file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable labelled blocks.
    #[default]
    Text,
    /// Machine-readable YAML document.
    Yaml,
}

/// YAML document layout.
#[derive(Debug, Serialize)]
struct YamlReport<'a> {
    generated_at: String,
    total_entries: usize,
    entries: &'a [ProcessedEntry],
}

/// Render the plain text report.
///
/// # Examples
/// ```
/// use placsp_harvester::report::render_text;
///
/// let report = render_text(&[]);
/// assert!(report.starts_with("Extracted data - Total entries: 0\n"));
/// ```
pub fn render_text(entries: &[ProcessedEntry]) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "Extracted data - Total entries: {}", entries.len());
    let _ = writeln!(out, "{}\n", "=".repeat(50));

    for (index, processed) in entries.iter().enumerate() {
        let entry = &processed.entry;
        let downloaded = processed
            .downloaded_file
            .as_ref()
            .map(|p| p.display().to_string());

        let _ = writeln!(out, "ENTRY {}:", index + 1);
        for (label, value) in [
            ("ID", entry.id.as_deref()),
            ("Title", entry.title.as_deref()),
            ("Link", entry.link.as_deref()),
            ("Summary", entry.summary.as_deref()),
            ("Updated", entry.updated.as_deref()),
            ("Document URI", entry.document_uri.as_deref()),
            ("Party Names", entry.party_names.as_deref()),
            ("Classification Codes", entry.classification_codes.as_deref()),
            ("Downloaded File", downloaded.as_deref()),
        ] {
            let _ = writeln!(out, "{label}: {}", value.unwrap_or(MISSING));
        }
        let _ = writeln!(out, "{}\n", "-".repeat(30));
    }

    out
}

/// Render the YAML report, stamped with the current UTC time.
pub fn render_yaml(entries: &[ProcessedEntry]) -> Result<String> {
    let report = YamlReport {
        generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        total_entries: entries.len(),
        entries,
    };
    Ok(serde_yaml_ng::to_string(&report)?)
}

/// Write the report to `path`, creating parent directories as needed.
///
/// # Arguments
/// * `path` - Report file
/// * `entries` - Processed entries in feed order
/// * `format` - Text or YAML
///
/// # Returns
/// The path that was written.
pub fn write_report(
    path: &Path,
    entries: &[ProcessedEntry],
    format: ReportFormat,
) -> Result<PathBuf> {
    let content = match format {
        ReportFormat::Text => render_text(entries),
        ReportFormat::Yaml => render_yaml(entries)?,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    tracing::info!(path = %path.display(), entries = entries.len(), "Report written");
    Ok(path.to_path_buf())
}
