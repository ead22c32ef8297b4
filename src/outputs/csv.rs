//! CSV output.
//!
//! One row per collected record, in collection order, under a fixed
//! `category,title,url` header. The header is written even when nothing was
//! collected. Fields containing commas, quotes or newlines are quoted, and
//! rows end in `\r\n`.

use super::ExportReport;
use crate::error::ExportError;
use crate::models::NewsRecord;
use crate::utils::ensure_parent_dir;
use csv::WriterBuilder;
use std::path::Path;
use tracing::{info, instrument};

pub const HEADER: [&str; 3] = ["category", "title", "url"];

/// Write `records` to `path`, replacing any previous file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn write_records(records: &[NewsRecord], path: &Path) -> Result<ExportReport, ExportError> {
    ensure_parent_dir(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    info!(rows = records.len(), "Wrote CSV file");
    Ok(ExportReport::written(path, records.len()))
}
