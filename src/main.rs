//! # Topics Scraper
//!
//! A once-a-day batch job that walks the category ("topics") pages of a news
//! portal in a headless browser, collects every headline's title and link,
//! and stores the result three ways.
//!
//! ## Features
//!
//! - Visits a fixed, ordered list of categories (domestic, world, business,
//!   entertainment, sports, it, science, local) for a single run date
//! - Drives headless Chrome, or replays saved pages with `--snapshot-dir`
//! - Waits for late-rendering elements with a bounded, cancellable retry
//! - Writes `csv/`, `json/` and `db/` outputs named `<Source>_News_<yyyymmdd>`
//!
//! ## Usage
//!
//! ```sh
//! topics_scraper -o ./out
//! ```
//!
//! ## Architecture
//!
//! The application follows a pipeline architecture:
//! 1. **Launch**: Start the browser (a version mismatch aborts the run)
//! 2. **Scrape**: For each category, load its page and extract headlines
//! 3. **Output**: Write the CSV, JSON and SQLite files
//! 4. **Close**: Shut the browser down

use clap::Parser;
use std::error::Error;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod browser;
mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod pipeline;
mod scrapers;
mod utils;
mod wait;

use browser::{ChromeDriver, Driver, SnapshotDriver};
use cli::Cli;
use config::ScrapeConfig;
use pipeline::{Pipeline, RunSummary};
use utils::RunDate;
use wait::CancelFlag;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("topics_scraper starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Configuration ----
    let mut config = match &args.config {
        Some(path) => ScrapeConfig::load(path)?,
        None => ScrapeConfig::default(),
    };
    args.apply(&mut config);
    let base_url = config.validate().inspect_err(|e| error!(error = %e, "Invalid configuration"))?;

    let date = match &args.date {
        Some(raw) => RunDate::parse_compact(raw)?,
        None => RunDate::today(),
    };
    info!(%date, %base_url, categories = config.categories.len(), "Run configured");

    // ---- Ctrl-C stops the run at the next category or element wait ----
    let cancel = CancelFlag::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received; cancelling run");
                cancel.cancel();
            }
        });
    }

    let browser_config = config.browser.clone();
    let pipeline = Pipeline::new(config, base_url, date, cancel);

    let result = match args.snapshot_dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Replaying saved pages");
            run_blocking(pipeline, SnapshotDriver::from_dir(dir)).await
        }
        None => run_blocking(pipeline, ChromeDriver::new(browser_config)).await,
    };

    let summary = match result {
        Ok(summary) => summary,
        Err(e) => {
            error!(error = %e, elapsed = ?start_time.elapsed(), "Run failed");
            return Err(e);
        }
    };

    for (category, count) in &summary.per_category {
        info!(%category, count, "Category summary");
    }
    info!(
        date = %summary.date,
        records = summary.total_records,
        csv = %summary.csv.path.display(),
        json = %summary.json.path.display(),
        db = %summary.sqlite.path.display(),
        stored = summary.sqlite.rows_stored.unwrap_or_default(),
        "Outputs written"
    );

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Run the blocking pipeline on a dedicated thread. The browser session is
/// opened, used and closed entirely on that thread.
async fn run_blocking<D>(pipeline: Pipeline, driver: D) -> Result<RunSummary, Box<dyn Error>>
where
    D: Driver + Send + 'static,
{
    let summary = tokio::task::spawn_blocking(move || pipeline.run(&driver)).await??;
    Ok(summary)
}
