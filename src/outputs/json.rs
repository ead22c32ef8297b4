//! JSON output.
//!
//! The document is one object keyed by category, each holding that
//! category's `{title, url}` entries in collection order:
//!
//! ```json
//! {
//!     "world": [
//!         {
//!             "title": "...",
//!             "url": "https://news.yahoo.co.jp/pickup/..."
//!         }
//!     ]
//! }
//! ```
//!
//! Keys appear in the order their first record was collected. A category with
//! no records has no key at all. Non-ASCII text is written as-is.

use super::ExportReport;
use crate::error::ExportError;
use crate::models::{ArticleLink, Category, NewsRecord};
use crate::utils::ensure_parent_dir;
use serde::{Serialize, Serializer};
use serde_json::ser::PrettyFormatter;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::{info, instrument};

/// Records grouped by category, preserving first-seen key order.
#[derive(Debug, Default)]
pub struct CategoryDocument<'a> {
    groups: Vec<(Category, Vec<ArticleLink<'a>>)>,
}

impl<'a> CategoryDocument<'a> {
    pub fn from_records(records: &'a [NewsRecord]) -> Self {
        let mut doc = Self::default();
        for record in records {
            doc.add(record);
        }
        doc
    }

    fn add(&mut self, record: &'a NewsRecord) {
        match self.groups.iter_mut().find(|(c, _)| *c == record.category) {
            Some((_, links)) => links.push(record.into()),
            None => self.groups.push((record.category, vec![record.into()])),
        }
    }
}

impl Serialize for CategoryDocument<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.groups.iter().map(|(c, links)| (c, links)))
    }
}

/// Write `records` to `path` as an indented JSON document.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn write_records(records: &[NewsRecord], path: &Path) -> Result<ExportReport, ExportError> {
    ensure_parent_dir(path)?;

    let doc = CategoryDocument::from_records(records);
    let mut out = BufWriter::new(File::create(path)?);
    let mut ser = serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    doc.serialize(&mut ser)?;
    out.flush()?;

    info!(
        rows = records.len(),
        categories = doc.groups.len(),
        "Wrote JSON file"
    );
    Ok(ExportReport::written(path, records.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn record(category: Category, title: &str) -> NewsRecord {
        NewsRecord {
            category,
            title: title.to_string(),
            url: format!("https://example.com/{}", title.len()),
        }
    }

    #[test]
    fn test_groups_by_category_in_first_seen_order() {
        let records = vec![
            record(Category::World, "w1"),
            record(Category::Business, "b1"),
            record(Category::World, "w22"),
        ];
        let doc = CategoryDocument::from_records(&records);
        let keys: Vec<_> = doc.groups.iter().map(|(c, _)| *c).collect();
        assert_eq!(keys, [Category::World, Category::Business]);

        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(
            json,
            r#"{"world":[{"title":"w1","url":"https://example.com/2"},{"title":"w22","url":"https://example.com/3"}],"business":[{"title":"b1","url":"https://example.com/2"}]}"#
        );
    }

    #[test]
    fn test_written_file_is_indented_and_keeps_non_ascii() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("json/Yahoo_News_20250506.json");
        let records = vec![record(Category::Sports, "大谷が本塁打")];
        write_records(&records, &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("大谷が本塁打"));
        assert!(!written.contains("\\u"));
        assert!(written.contains("\n    \"sports\": [\n        {\n            \"title\""));

        let value: Value = serde_json::from_str(&written).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(!obj.contains_key("domestic"));
        assert_eq!(value["sports"][0]["title"], "大谷が本塁打");
    }

    #[test]
    fn test_no_records_is_empty_object() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("empty.json");
        write_records(&[], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }
}
