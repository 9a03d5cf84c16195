mod archiver;
mod error;
mod fetcher;
mod models;
mod parser;
mod scraper;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use crate::archiver::Archive;
use crate::fetcher::Browser;
use crate::parser::GamePageExtractor;
use crate::scraper::scrape_all;

/// Directory holding one JSON artifact per identifier plus the completion log.
const DATA_DIR: &str = "data";

#[derive(Parser)]
#[command(name = "game_archiver", about = "Scrapes and archives game pages by identifier")]
struct Args {
    /// Path to a file with one identifier per line
    #[arg(long)]
    ids: PathBuf,

    /// URL prefix each identifier is appended to
    #[arg(long = "url_prefix")]
    url_prefix: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();

    let ids = load_ids(&args.ids)
        .with_context(|| format!("failed to read identifiers from {}", args.ids.display()))?;
    let mut archive =
        Archive::open(DATA_DIR).with_context(|| format!("failed to open archive at {DATA_DIR}"))?;

    let browser = Browser::launch().await.context("failed to launch browser")?;
    let extractor = GamePageExtractor::new();

    let stop = Arc::new(AtomicBool::new(false));
    tokio::spawn({
        let stop = Arc::clone(&stop);
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping after the current page");
                stop.store(true, Ordering::SeqCst);
            }
        }
    });

    let stats =
        scrape_all(&browser, &extractor, &mut archive, &args.url_prefix, &ids, &stop).await;

    if let Err(e) = browser.close().await {
        warn!("Error closing browser: {}", e);
    }

    println!(
        "Done: {} scraped, {} skipped, {} failed.",
        stats.done, stats.skipped, stats.failed
    );
    if stats.interrupted {
        anyhow::bail!("interrupted; completed pages are saved and the next run resumes");
    }
    Ok(())
}

/// Read identifiers, one per line. Lines are trimmed and blank lines
/// skipped. Duplicates stay in; the loop skips them once the first
/// occurrence is recorded.
fn load_ids(path: &Path) -> std::io::Result<Vec<String>> {
    Ok(fs::read_to_string(path)?
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
