//! coverfind command-line entry point.
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use coverfind_client::{BatchProcessor, CoverPipeline};
use coverfind_core::{AppConfig, CoverRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "coverfind")]
#[command(about = "Find and store book cover images")]
#[command(version)]
struct Cli {
    /// Covers directory (overrides config file and COVERFIND_COVERS_DIR)
    #[arg(long, global = true)]
    covers_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a cover URL without downloading it
    Search {
        /// Book title
        title: String,
        /// Author (repeat for several, first one is used in queries)
        #[arg(short, long = "author")]
        authors: Vec<String>,
    },

    /// Find a cover and store it in the covers directory
    Resolve {
        /// Book title
        title: String,
        /// Author (repeat for several, first one is used in queries)
        #[arg(short, long = "author")]
        authors: Vec<String>,
    },

    /// Resolve and store covers for every book in a JSON file
    Batch {
        /// JSON array of {"title": ..., "authors": [...]}
        #[arg(short, long)]
        input: PathBuf,
        /// Pause between books in milliseconds (default: configured batch delay)
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Delete stored covers that are not listed in a JSON file
    Cleanup {
        /// JSON array of public paths to keep, e.g. ["/covers/dune.jpg"]
        #[arg(short, long)]
        keep: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn request(title: String, authors: Vec<String>) -> Result<CoverRequest> {
    if title.trim().is_empty() {
        bail!("title cannot be empty");
    }
    Ok(CoverRequest::new(title, authors))
}

fn parse_books(json: &str) -> Result<Vec<CoverRequest>> {
    let books: Vec<CoverRequest> = serde_json::from_str(json).context("expected a JSON array of books")?;
    if let Some(index) = books.iter().position(|b| b.title.trim().is_empty()) {
        bail!("book {index} has an empty title");
    }
    Ok(books)
}

fn parse_keep(json: &str) -> Result<HashSet<String>> {
    let paths: Vec<String> = serde_json::from_str(json).context("expected a JSON array of paths")?;
    Ok(paths.into_iter().collect())
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = AppConfig::load()?;
    if let Some(dir) = cli.covers_dir {
        config.covers_dir = dir;
    }
    tracing::debug!(covers_dir = %config.covers_dir.display(), "configuration loaded");

    let pipeline = CoverPipeline::from_config(&config)?;

    match cli.command {
        Commands::Search { title, authors } => {
            let result = pipeline.search_cover(&request(title, authors)?).await;
            print_json(&result)?;
        }
        Commands::Resolve { title, authors } => {
            let result = pipeline.resolve_and_store(&request(title, authors)?).await;
            print_json(&result)?;
        }
        Commands::Batch { input, delay_ms } => {
            let books = parse_books(&read(&input).await?)?;
            let delay = delay_ms.map(Duration::from_millis).unwrap_or_else(|| config.batch_delay());

            let report = BatchProcessor::new(Arc::new(pipeline), delay).process_all(books).await;
            eprintln!("{} of {} covers stored", report.stored, report.total());
            print_json(&report)?;
        }
        Commands::Cleanup { keep } => {
            let referenced = parse_keep(&read(&keep).await?)?;
            let removed = pipeline.cleanup_orphans(&referenced).await?;
            print_json(&serde_json::json!({ "removed": removed }))?;
        }
    }

    Ok(())
}
