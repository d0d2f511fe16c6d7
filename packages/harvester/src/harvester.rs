//! Main harvester service that ties all components together.

use std::fs;
use std::path::{Path, PathBuf};

use reqwest::blocking::Client;

use crate::archive::{download_archive, extract_archive, find_feed_files};
use crate::config::{HarvestConfig, Source};
use crate::download::HttpDocumentFetcher;
use crate::error::{HarvesterError, Result};
use crate::filter::EntryFilter;
use crate::feed::parse_feed_file;
use crate::http::create_client;
use crate::inspect::inspect_file;
use crate::pipeline::EntryProcessor;
use crate::report::{write_report, ReportFormat};
use crate::types::ProcessedEntry;

/// Outcome of one harvest run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Entries that passed the filters, in feed order.
    pub entries: Vec<ProcessedEntry>,
    /// Entries extracted before filtering.
    pub total_entries: usize,
    /// Feed files that were read.
    pub feed_files: usize,
    /// Report location, `None` when there was nothing to process.
    pub report_path: Option<PathBuf>,
}

impl RunSummary {
    /// Number of entries whose document was stored locally.
    pub fn downloaded(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.downloaded_file.is_some())
            .count()
    }
}

/// Feed files to process, plus the archive to remove afterwards.
struct FeedSet {
    files: Vec<PathBuf>,
    temp_archive: Option<PathBuf>,
}

/// Harvests feed archives: acquisition, extraction, filtering, downloads and reporting.
pub struct Harvester {
    config: HarvestConfig,
    client: Client,
    format: ReportFormat,
}

impl Harvester {
    /// Create a harvester with its own HTTP client.
    ///
    /// # Arguments
    /// * `config` - Directories, output file, pacing and download switch
    ///
    /// # Returns
    /// The harvester, or an error when the HTTP client cannot be built.
    pub fn new(config: HarvestConfig) -> Result<Self> {
        Ok(Self {
            config,
            client: create_client()?,
            format: ReportFormat::default(),
        })
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// Run a complete harvest of `source`.
    ///
    /// A feed file that cannot be read or parsed is logged and skipped; the
    /// remaining files are still processed.
    ///
    /// # Arguments
    /// * `source` - Feed file, local archive or archive URL
    /// * `filter` - Party name and classification code filters
    ///
    /// # Returns
    /// A [`RunSummary`] with the kept entries and the report location.
    pub fn run(&self, source: &Source, filter: &EntryFilter) -> Result<RunSummary> {
        let feeds = self.collect_feeds(source)?;
        if feeds.files.is_empty() {
            tracing::warn!(dir = %self.config.extract_dir.display(), "No feed files found");
            return Ok(RunSummary::default());
        }

        let fetcher = HttpDocumentFetcher::new(self.client.clone(), &self.config.download_dir);
        let processor = if self.config.download_documents {
            EntryProcessor::new(&fetcher, self.config.pacing_delay)
        } else {
            EntryProcessor::without_downloads()
        };

        let mut summary = RunSummary {
            feed_files: feeds.files.len(),
            ..RunSummary::default()
        };

        for path in &feeds.files {
            match parse_feed_file(path) {
                Ok(entries) => {
                    summary.total_entries += entries.len();
                    summary.entries.extend(processor.process(entries, filter));
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "Failed to process feed file");
                }
            }
        }

        if filter.is_active() {
            tracing::info!(
                "Filters applied ({filter}) -> {}/{} entries",
                summary.entries.len(),
                summary.total_entries
            );
        }

        let report = write_report(&self.config.output_file, &summary.entries, self.format)?;
        summary.report_path = Some(report);

        remove_temp_archive(feeds.temp_archive);

        tracing::info!(
            processed = summary.entries.len(),
            total = summary.total_entries,
            "Harvest completed"
        );
        Ok(summary)
    }

    /// Describe the structure of the source's first feed file.
    pub fn inspect(&self, source: &Source) -> Result<String> {
        let feeds = self.collect_feeds(source)?;
        let first = feeds
            .files
            .first()
            .ok_or_else(|| HarvesterError::NoFeedFiles(self.config.extract_dir.clone()))?;

        let dump = inspect_file(first)?;

        remove_temp_archive(feeds.temp_archive);
        Ok(format!("=== INSPECTION OF {} ===\n{dump}", first.display()))
    }

    fn collect_feeds(&self, source: &Source) -> Result<FeedSet> {
        source.ensure_exists()?;

        match source {
            Source::Feed(path) => Ok(FeedSet {
                files: vec![path.clone()],
                temp_archive: None,
            }),
            Source::Archive(path) => Ok(FeedSet {
                files: self.unpack(path)?,
                temp_archive: None,
            }),
            Source::Url(url) => {
                let archive = download_archive(&self.client, url, &self.config.archive_file)?;
                Ok(FeedSet {
                    files: self.unpack(&archive)?,
                    temp_archive: Some(archive),
                })
            }
        }
    }

    fn unpack(&self, archive: &Path) -> Result<Vec<PathBuf>> {
        let dir = extract_archive(archive, &self.config.extract_dir)?;
        Ok(find_feed_files(&dir))
    }
}

fn remove_temp_archive(archive: Option<PathBuf>) {
    if let Some(archive) = archive {
        if let Err(e) = fs::remove_file(&archive) {
            tracing::warn!(path = %archive.display(), error = %e, "Could not remove temporary archive");
        }
    }
}
