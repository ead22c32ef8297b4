//! Output sinks for the collected records.
//!
//! This module contains one submodule per output format. Each sink consumes
//! the full record list once, after every category has been scraped:
//!
//! # Submodules
//!
//! - [`csv`]: flat `category,title,url` rows
//! - [`json`]: one document keyed by category
//! - [`sqlite`]: a `news` table that rejects duplicate rows
//!
//! # Output Structure
//!
//! ```text
//! output_root/
//! ├── csv/Yahoo_News_20250506.csv
//! ├── json/Yahoo_News_20250506.json
//! └── db/Yahoo_News_20250506.db
//! ```
//!
//! The sinks are independent: a failure in one does not undo what an
//! earlier one already wrote.

pub mod csv;
pub mod json;
pub mod sqlite;

use std::path::{Path, PathBuf};

/// What a sink did with the records it was given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub path: PathBuf,
    /// Rows written (CSV/JSON) or newly inserted (SQLite).
    pub rows_written: usize,
    /// Rows rejected as duplicates. Always zero except for SQLite.
    pub rows_skipped: usize,
    /// Rows in the table after the write. SQLite only.
    pub rows_stored: Option<usize>,
}

impl ExportReport {
    pub fn written(path: &Path, rows: usize) -> Self {
        Self {
            path: path.to_path_buf(),
            rows_written: rows,
            rows_skipped: 0,
            rows_stored: None,
        }
    }
}
