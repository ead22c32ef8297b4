//! SQLite output.
//!
//! Records go into a `news` table with a unique constraint over all three
//! columns. This is the only sink that deduplicates: inserting a record that
//! is already stored (earlier in the run or by an earlier run the same day)
//! is logged and skipped. After inserting, the whole table is read back and
//! reported.

use super::ExportReport;
use crate::error::ExportError;
use crate::models::NewsRecord;
use crate::utils::{ensure_parent_dir, truncate_for_log};
use rusqlite::{Connection, ErrorCode, params};
use std::fmt;
use std::path::Path;
use tracing::{info, instrument};

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS news (
    category TEXT,
    title TEXT,
    url TEXT,
    UNIQUE(category, title, url)
)";

const INSERT: &str = "INSERT INTO news (category, title, url) VALUES (?1, ?2, ?3)";

const SELECT_ALL: &str = "SELECT category, title, url FROM news ORDER BY rowid";

/// A row read back from the `news` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub category: String,
    pub title: String,
    pub url: String,
}

impl fmt::Display for StoredRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.category, self.title, self.url)
    }
}

/// Render the whole table, one row per line.
pub fn render_table(rows: &[StoredRow]) -> String {
    rows.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Insert `records` into the database at `path`, creating it if needed, and
/// return the table's full contents with the report.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn write_records(
    records: &[NewsRecord],
    path: &Path,
) -> Result<(ExportReport, Vec<StoredRow>), ExportError> {
    ensure_parent_dir(path)?;

    let mut conn = Connection::open(path)?;
    conn.execute(CREATE_TABLE, [])?;

    let mut inserted = 0usize;
    let mut skipped = 0usize;
    {
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(INSERT)?;
            for record in records {
                match stmt.execute(params![record.category.as_str(), record.title, record.url]) {
                    Ok(_) => inserted += 1,
                    Err(rusqlite::Error::SqliteFailure(e, _))
                        if e.code == ErrorCode::ConstraintViolation =>
                    {
                        skipped += 1;
                        info!(
                            category = %record.category,
                            title = %truncate_for_log(&record.title, 60),
                            "Row already stored; skipping"
                        );
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
        tx.commit()?;
    }

    let rows = read_all(&conn)?;
    info!(inserted, skipped, stored = rows.len(), "Wrote SQLite database");
    info!(table = %render_table(&rows), "Table contents");

    conn.close().map_err(|(_, e)| e)?;

    let report = ExportReport {
        rows_skipped: skipped,
        rows_stored: Some(rows.len()),
        ..ExportReport::written(path, inserted)
    };
    Ok((report, rows))
}

/// Every row of the `news` table, in insertion order.
pub fn read_all(conn: &Connection) -> Result<Vec<StoredRow>, ExportError> {
    let mut stmt = conn.prepare(SELECT_ALL)?;
    let rows = stmt
        .query_map([], |row| {
            Ok(StoredRow {
                category: row.get(0)?,
                title: row.get(1)?,
                url: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn record(category: Category, title: &str, url: &str) -> NewsRecord {
        NewsRecord {
            category,
            title: title.to_string(),
            url: url.to_string(),
        }
    }

    #[test]
    fn test_duplicates_are_stored_once() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("db/Yahoo_News_20250506.db");
        let records = vec![
            record(Category::World, "a", "https://example.com/a"),
            record(Category::World, "a", "https://example.com/a"),
            record(Category::It, "a", "https://example.com/a"),
        ];

        let (report, rows) = write_records(&records, &path).unwrap();
        assert_eq!(report.rows_written, 2);
        assert_eq!(report.rows_skipped, 1);
        assert_eq!(report.rows_stored, Some(2));
        assert_eq!(
            rows,
            vec![
                StoredRow {
                    category: "world".into(),
                    title: "a".into(),
                    url: "https://example.com/a".into(),
                },
                StoredRow {
                    category: "it".into(),
                    title: "a".into(),
                    url: "https://example.com/a".into(),
                },
            ]
        );
    }

    #[test]
    fn test_second_run_adds_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("news.db");
        let records = vec![
            record(Category::Science, "x", "https://example.com/x"),
            record(Category::Local, "y", "https://example.com/y"),
        ];

        let (first, _) = write_records(&records, &path).unwrap();
        assert_eq!(first.rows_written, 2);

        let (second, rows) = write_records(&records, &path).unwrap();
        assert_eq!(second.rows_written, 0);
        assert_eq!(second.rows_skipped, 2);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_schema_has_composite_unique_constraint() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("news.db");
        write_records(&[], &path).unwrap();

        let conn = Connection::open(&path).unwrap();
        let sql: String = conn
            .query_row(
                "SELECT sql FROM sqlite_master WHERE type = 'table' AND name = 'news'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(sql.contains("UNIQUE(category, title, url)"));
        assert!(read_all(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_table_report_lists_every_row_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("news.db");
        let records = vec![
            record(Category::Sports, "決勝", "https://example.com/s"),
            record(Category::World, "w", "https://example.com/w"),
        ];
        let (_, rows) = write_records(&records, &path).unwrap();

        assert_eq!(
            render_table(&rows),
            "(sports, 決勝, https://example.com/s)\n(world, w, https://example.com/w)"
        );
        assert_eq!(render_table(&[]), "");
    }
}
