//! The run orchestrator.
//!
//! A run is strictly sequential:
//!
//! ```text
//! open browser
//!   -> for each category: build url -> navigate -> extract -> collect
//!   -> write CSV -> write JSON -> write SQLite
//!   -> close browser
//! ```
//!
//! Nothing touches the output directories until every category has been
//! scraped, so a browser that fails to start leaves no files behind.

use crate::browser::{Driver, Session};
use crate::config::{OutputPaths, ScrapeConfig};
use crate::error::{ExtractError, PipelineError};
use crate::models::{Category, ResultCollector};
use crate::outputs::{self, ExportReport};
use crate::scrapers::PageExtractor;
use crate::utils::{RunDate, category_url};
use crate::wait::{CancelFlag, WaitPolicy};
use std::time::Instant;
use tracing::{error, info, instrument, warn};
use url::Url;

/// Outcome of a successful run.
#[derive(Debug)]
pub struct RunSummary {
    pub date: RunDate,
    /// Records collected per visited category, in visiting order.
    pub per_category: Vec<(Category, usize)>,
    pub total_records: usize,
    pub csv: ExportReport,
    pub json: ExportReport,
    pub sqlite: ExportReport,
}

pub struct Pipeline {
    config: ScrapeConfig,
    base_url: Url,
    date: RunDate,
    cancel: CancelFlag,
}

impl Pipeline {
    /// `base_url` is the validated form of `config.base_url`
    /// (see [`ScrapeConfig::validate`]).
    pub fn new(config: ScrapeConfig, base_url: Url, date: RunDate, cancel: CancelFlag) -> Self {
        Self {
            config,
            base_url,
            date,
            cancel,
        }
    }

    pub fn output_paths(&self) -> OutputPaths {
        self.config.output_paths(self.date)
    }

    /// Execute one full run against `driver`.
    #[instrument(level = "info", skip_all, fields(date = %self.date))]
    pub fn run<D: Driver>(&self, driver: &D) -> Result<RunSummary, PipelineError> {
        let t0 = Instant::now();

        let mut session = match driver.open() {
            Ok(session) => session,
            Err(e) => {
                let e = PipelineError::from(e);
                if e.is_driver_mismatch() {
                    error!(
                        error = %e,
                        "The browser driver does not match the installed browser. Install a matching browser/driver pair and retry"
                    );
                }
                return Err(e);
            }
        };

        let extractor = PageExtractor::new(
            self.config.selectors.clone(),
            WaitPolicy::from_config(&self.config.wait, self.cancel.clone()),
        );

        let mut collector = ResultCollector::new();
        let mut per_category = Vec::with_capacity(self.config.categories.len());

        for &category in &self.config.categories {
            if self.cancel.is_cancelled() {
                return Err(PipelineError::Cancelled);
            }

            let url = category_url(&self.base_url, category, self.date).map_err(|source| {
                PipelineError::Url {
                    category: category.as_str(),
                    source,
                }
            })?;
            info!(%category, %url, "Loading category page");
            session.navigate(url.as_str())?;

            let records = extractor
                .extract(&session, category)
                .map_err(|source| match source {
                    ExtractError::Cancelled => PipelineError::Cancelled,
                    source => PipelineError::Extract {
                        category: category.as_str(),
                        source,
                    },
                })?;

            per_category.push((category, records.len()));
            collector.extend(records);
        }

        if collector.is_empty() {
            warn!("No headlines found in any category");
        } else {
            info!(total = collector.len(), "Finished scraping all categories");
        }

        let paths = self.output_paths();
        let records = collector.snapshot();
        let csv = outputs::csv::write_records(records, &paths.csv)?;
        let json = outputs::json::write_records(records, &paths.json)?;
        let (sqlite, _rows) = outputs::sqlite::write_records(records, &paths.db)?;

        session.close()?;

        let elapsed = t0.elapsed();
        info!(
            ?elapsed,
            records = collector.len(),
            inserted = sqlite.rows_written,
            skipped = sqlite.rows_skipped,
            "Run complete"
        );

        Ok(RunSummary {
            date: self.date,
            per_category,
            total_records: collector.len(),
            csv,
            json,
            sqlite,
        })
    }
}
