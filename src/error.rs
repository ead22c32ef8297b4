//! Error types for each stage of a scrape run.
//!
//! Every stage owns one enum so callers can tell a fatal browser problem
//! from an extraction timeout or a failed write:
//!
//! - [`ConfigError`]: bad YAML, bad CLI override, invalid values
//! - [`BrowserError`]: launching, version checks and DOM access
//! - [`ExtractError`]: bounded element waits on a category page
//! - [`ExportError`]: CSV, JSON and SQLite sinks
//! - [`PipelineError`]: everything the orchestrator can surface

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while loading or validating [`crate::config::ScrapeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid run date {0:?} (expected yyyymmdd)")]
    Date(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Failures of the injected browser capability.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// The browser could not be started, or it reports a version other than
    /// the one the driver was built for. Always fatal.
    #[error("driver/browser version mismatch: {detail}")]
    DriverMismatch { detail: String },

    #[error("no snapshot page for {url} (looked for {})", path.display())]
    MissingSnapshot { url: String, path: PathBuf },

    #[error("failed to read snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid selector {0:?}")]
    Selector(String),

    #[error("nothing has been loaded in this session yet")]
    NoPage,

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error(transparent)]
    Protocol(#[from] anyhow::Error),
}

/// Failures while extracting records from one category page.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    /// The bounded wait ran out before the element showed up.
    #[error("element {selector:?} did not appear after {attempts} attempts")]
    Timeout { selector: String, attempts: u32 },

    #[error("element wait cancelled")]
    Cancelled,
}

/// Failures of the three output sinks.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Anything that stops a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error("extraction failed for category {category}: {source}")]
    Extract {
        category: &'static str,
        #[source]
        source: ExtractError,
    },

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("failed to build url for category {category}: {source}")]
    Url {
        category: &'static str,
        #[source]
        source: url::ParseError,
    },

    #[error("run cancelled")]
    Cancelled,
}

impl PipelineError {
    /// Whether this is the fatal start-up failure that gets upgrade guidance.
    pub fn is_driver_mismatch(&self) -> bool {
        matches!(self, Self::Browser(BrowserError::DriverMismatch { .. }))
    }
}
