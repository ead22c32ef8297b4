//! Command-line interface definitions for the topics scraper.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every flag is optional: with none of them the scraper runs the stock
//! configuration against a live headless Chrome and writes into the current
//! directory. Flags override values loaded from `--config`.

use crate::config::ScrapeConfig;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the topics scraper.
///
/// # Examples
///
/// ```sh
/// # Scrape today's pages into ./csv, ./json and ./db
/// topics_scraper
///
/// # Write somewhere else, with a config file
/// topics_scraper -c scraper.yaml -o /var/lib/topics
///
/// # Re-run yesterday from saved pages, no browser needed
/// topics_scraper --date 20250505 --snapshot-dir ./snapshots/20250505
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "TOPICS_SCRAPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory the csv/, json/ and db/ folders are written under
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Run date as yyyymmdd (defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Replay saved `<category>.html` pages from this directory instead of launching Chrome
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,

    /// Chrome/Chromium executable (auto-detected when omitted)
    #[arg(long, env = "CHROME_PATH")]
    pub chrome_path: Option<PathBuf>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    pub headful: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a loaded config.
    pub fn apply(&self, config: &mut ScrapeConfig) {
        if let Some(dir) = &self.output_dir {
            config.output.root = dir.clone();
        }
        if let Some(path) = &self.chrome_path {
            config.browser.executable = Some(path.clone());
        }
        if self.headful {
            config.browser.headless = false;
        }
    }
}
