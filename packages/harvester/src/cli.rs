//! Command-line interface for the harvester.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{HarvestConfig, Source};
use crate::error::Result;
use crate::filter::EntryFilter;
use crate::harvester::Harvester;
use crate::report::ReportFormat;

/// PLACSP Harvester - Extract procurement entries from Atom feed archives.
#[derive(Parser)]
#[command(name = "placsp-harvester")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Where to read the feeds from.
#[derive(clap::Args, Debug)]
pub struct SourceArgs {
    /// URL of a ZIP archive, or a local ZIP / .atom path with --local
    pub source: String,

    /// Treat the source as a local file instead of a URL
    #[arg(long)]
    pub local: bool,

    /// The source is a single .atom file (requires --local)
    #[arg(long, requires = "local")]
    pub atom: bool,
}

impl SourceArgs {
    fn to_source(&self) -> Result<Source> {
        Source::parse(&self.source, self.local, self.atom)
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract entries, download their documents and write a report.
    Extract {
        #[command(flatten)]
        source: SourceArgs,

        /// Directory for downloaded documents (default: downloaded_docs)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Report file (default: extracted_data.txt)
        #[arg(long)]
        output_file: Option<PathBuf>,

        /// Keep entries whose party names contain this text (case-insensitive)
        #[arg(long)]
        filter_name: Option<String>,

        /// Keep entries whose classification codes contain this text (case-insensitive)
        #[arg(long)]
        filter_code: Option<String>,

        /// Pause between document downloads in milliseconds (default: 500)
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Report format
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,

        /// Skip document downloads
        #[arg(long)]
        no_download: bool,
    },

    /// Print the element structure of a feed to debug namespace problems.
    Inspect {
        #[command(flatten)]
        source: SourceArgs,
    },
}

/// Execute a parsed command.
pub fn execute(command: Commands) -> Result<()> {
    match command {
        Commands::Extract {
            source,
            output_dir,
            output_file,
            filter_name,
            filter_code,
            delay_ms,
            format,
            no_download,
        } => {
            let mut config = HarvestConfig::from_env().with_downloads(!no_download);
            if let Some(dir) = output_dir {
                config = config.with_download_dir(dir);
            }
            if let Some(file) = output_file {
                config = config.with_output_file(file);
            }
            if let Some(ms) = delay_ms {
                config = config.with_pacing_delay(Duration::from_millis(ms));
            }
            let filter = EntryFilter::new(filter_name.as_deref(), filter_code.as_deref());
            extract_command(&source, config, &filter, format)
        }
        Commands::Inspect { source } => inspect_command(&source),
    }
}

/// Execute the extract command.
fn extract_command(
    args: &SourceArgs,
    config: HarvestConfig,
    filter: &EntryFilter,
    format: ReportFormat,
) -> Result<()> {
    // Validate before touching the network
    let source = args.to_source()?;
    source.ensure_exists()?;

    println!(
        "{} {}",
        style("Harvesting").bold(),
        style(&args.source).cyan()
    );
    if filter.is_active() {
        println!("  Filters: {}", style(filter).yellow());
    }
    println!();

    let download_dir = config.download_dir.clone();
    let downloads_enabled = config.download_documents;
    let harvester = Harvester::new(config)?.with_format(format);

    let pb = spinner();
    pb.set_message("Processing feeds...");

    let summary = match harvester.run(&source, filter) {
        Ok(summary) => summary,
        Err(e) => {
            pb.finish_and_clear();
            return Err(e);
        }
    };

    pb.finish_and_clear();

    println!("{}", style("Harvest completed").green().bold());
    println!("  Feed files: {}", summary.feed_files);
    println!(
        "  Entries: {} of {}",
        style(summary.entries.len()).green(),
        summary.total_entries
    );
    if downloads_enabled {
        println!(
            "  Documents: {} in {}",
            summary.downloaded(),
            download_dir.display()
        );
    }

    match &summary.report_path {
        Some(path) => {
            println!();
            println!("{} {}", style("Saved to:").green().bold(), path.display());
        }
        None => println!("  {}", style("No feed files found").yellow()),
    }

    Ok(())
}

/// Execute the inspect command.
fn inspect_command(args: &SourceArgs) -> Result<()> {
    let source = args.to_source()?;
    let harvester = Harvester::new(HarvestConfig::from_env())?;

    let pb = spinner();
    pb.set_message("Reading feed...");
    let dump = harvester.inspect(&source);
    pb.finish_and_clear();

    println!("{}", dump?);
    Ok(())
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    #[allow(clippy::expect_used)] // Static template string that is guaranteed to be valid
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("valid template"),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
