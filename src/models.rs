//! Data models for scraped headlines.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Category`]: the fixed, ordered set of topic pages on the portal
//! - [`NewsRecord`]: one extracted (category, title, url) reference
//! - [`ResultCollector`]: the run-scoped, append-only list of records
//! - [`ArticleLink`]: the `{title, url}` shape written to the JSON document

use serde::{Deserialize, Serialize};
use std::fmt;

/// One topic partition of the news portal.
///
/// The declaration order is the iteration order of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Domestic,
    World,
    Business,
    Entertainment,
    Sports,
    It,
    Science,
    Local,
}

impl Category {
    /// Every category, in the order a run visits them.
    pub const ALL: [Category; 8] = [
        Category::Domestic,
        Category::World,
        Category::Business,
        Category::Entertainment,
        Category::Sports,
        Category::It,
        Category::Science,
        Category::Local,
    ];

    /// The identifier used in page URLs and in every output file.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Domestic => "domestic",
            Category::World => "world",
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::Sports => "sports",
            Category::It => "it",
            Category::Science => "science",
            Category::Local => "local",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A headline extracted from a category page.
///
/// Field order matters: the CSV sink serializes records positionally as
/// `category, title, url`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NewsRecord {
    /// The category page the headline was found on.
    pub category: Category,
    /// Visible text of the headline element.
    pub title: String,
    /// Absolute link to the article.
    pub url: String,
}

/// `{title, url}` entry of the per-category arrays in the JSON document.
#[derive(Debug, Serialize)]
pub struct ArticleLink<'a> {
    pub title: &'a str,
    pub url: &'a str,
}

impl<'a> From<&'a NewsRecord> for ArticleLink<'a> {
    fn from(record: &'a NewsRecord) -> Self {
        Self {
            title: &record.title,
            url: &record.url,
        }
    }
}

/// Ordered, append-only list of every record found during one run.
///
/// No deduplication happens here; only the SQLite sink rejects duplicates.
#[derive(Debug, Default)]
pub struct ResultCollector {
    records: Vec<NewsRecord>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: NewsRecord) {
        self.records.push(record);
    }

    /// All records so far, in insertion order.
    pub fn snapshot(&self) -> &[NewsRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Extend<NewsRecord> for ResultCollector {
    fn extend<I: IntoIterator<Item = NewsRecord>>(&mut self, iter: I) {
        for record in iter {
            self.append(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: Category, title: &str) -> NewsRecord {
        NewsRecord {
            category,
            title: title.to_string(),
            url: format!("https://example.com/{title}"),
        }
    }

    #[test]
    fn test_category_order_and_slugs() {
        let slugs: Vec<_> = Category::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(
            slugs,
            [
                "domestic",
                "world",
                "business",
                "entertainment",
                "sports",
                "it",
                "science",
                "local"
            ]
        );
    }

    #[test]
    fn test_category_serde_uses_slug() {
        let json = serde_json::to_string(&Category::It).unwrap();
        assert_eq!(json, "\"it\"");
        let back: Category = serde_yaml::from_str("entertainment").unwrap();
        assert_eq!(back, Category::Entertainment);
    }

    #[test]
    fn test_collector_keeps_insertion_order_and_duplicates() {
        let mut collector = ResultCollector::new();
        assert!(collector.is_empty());

        collector.append(record(Category::World, "b"));
        collector.append(record(Category::Domestic, "a"));
        collector.append(record(Category::World, "b"));

        assert_eq!(collector.len(), 3);
        let titles: Vec<_> = collector.snapshot().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["b", "a", "b"]);
        assert_eq!(collector.snapshot()[0], collector.snapshot()[2]);
    }

    #[test]
    fn test_article_link_from_record() {
        let r = record(Category::Sports, "goal");
        let link = ArticleLink::from(&r);
        let json = serde_json::to_string(&link).unwrap();
        assert_eq!(json, r#"{"title":"goal","url":"https://example.com/goal"}"#);
    }
}
