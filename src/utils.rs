//! Utility functions for run dates, category URLs, logging and output directories.
//!
//! This module provides helper functions used throughout the application:
//! - [`RunDate`]: the single date a run is stamped with
//! - URL construction for category pages
//! - String truncation for log lines
//! - Output directory creation

use crate::error::ConfigError;
use crate::models::Category;
use chrono::{Local, NaiveDate};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, instrument};
use url::Url;

const COMPACT_FORMAT: &str = "%Y%m%d";

/// The date a run is stamped with.
///
/// Computed once at start-up and reused for every URL and file name, so a run
/// that crosses midnight still produces one consistent set of outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunDate(NaiveDate);

impl RunDate {
    /// Today's local date.
    #[instrument]
    pub fn today() -> Self {
        let date = Self(Local::now().date_naive());
        debug!(date = %date, "Computed run date");
        date
    }

    /// Parse a `yyyymmdd` string, as accepted by `--date`.
    pub fn parse_compact(s: &str) -> Result<Self, ConfigError> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::Date(s.to_string()));
        }
        NaiveDate::parse_from_str(s, COMPACT_FORMAT)
            .map(Self)
            .map_err(|_| ConfigError::Date(s.to_string()))
    }

    /// The date as an 8-digit `yyyymmdd` string.
    pub fn compact(&self) -> String {
        self.0.format(COMPACT_FORMAT).to_string()
    }
}

impl From<NaiveDate> for RunDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for RunDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(COMPACT_FORMAT))
    }
}

/// Build the URL of one category page for the given date.
///
/// The category is joined onto `base` (which should end with `/`), and the
/// date is passed as the `date` query parameter, e.g.
/// `https://news.yahoo.co.jp/topics/world?date=20250506`.
pub fn category_url(base: &Url, category: Category, date: RunDate) -> Result<Url, url::ParseError> {
    let mut url = base.join(category.as_str())?;
    url.query_pairs_mut().append_pair("date", &date.compact());
    Ok(url)
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at `max` characters with an ellipsis and the number
/// of dropped characters appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let total = s.chars().count();
    if total <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max).collect();
        format!("{head}…(+{} chars)", total - max)
    }
}

/// Ensure the parent directory of an output file exists.
///
/// Called by each sink right before it writes, never earlier, so a run that
/// fails during start-up leaves no output directories behind.
pub fn ensure_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir),
        _ => Ok(()),
    }
}
