//! Run configuration.
//!
//! Everything a run depends on (portal URL, category list, output
//! locations, page selectors) lives in [`ScrapeConfig`]. Every field has a
//! default, so an empty YAML file (or no file at all) reproduces the stock
//! Yahoo! News topics scrape.
//!
//! ```yaml
//! source_name: Yahoo
//! base_url: https://news.yahoo.co.jp/topics/
//! categories: [domestic, world, business]
//! output:
//!   root: /var/lib/topics
//! browser:
//!   headless: true
//!   required_major_version: 120
//! wait:
//!   max_attempts: 50
//!   interval_ms: 100
//! ```

use crate::error::ConfigError;
use crate::models::Category;
use crate::utils::RunDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};
use url::Url;

/// Top-level configuration handed to the orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Prefix of every output file name (`<source>_News_<yyyymmdd>.*`).
    pub source_name: String,
    /// Category pages live at `<base_url><category>?date=<yyyymmdd>`.
    pub base_url: String,
    /// Categories to visit, in order.
    pub categories: Vec<Category>,
    pub output: OutputConfig,
    pub browser: BrowserConfig,
    pub selectors: SelectorConfig,
    pub wait: WaitConfig,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            source_name: "Yahoo".to_string(),
            base_url: "https://news.yahoo.co.jp/topics/".to_string(),
            categories: Category::ALL.to_vec(),
            output: OutputConfig::default(),
            browser: BrowserConfig::default(),
            selectors: SelectorConfig::default(),
            wait: WaitConfig::default(),
        }
    }
}

/// Where the three sinks write. Relative sink directories resolve against `root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub root: PathBuf,
    pub csv_dir: PathBuf,
    pub json_dir: PathBuf,
    pub db_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            csv_dir: PathBuf::from("csv"),
            json_dir: PathBuf::from("json"),
            db_dir: PathBuf::from("db"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    /// Chrome/Chromium executable; auto-detected when unset.
    pub executable: Option<PathBuf>,
    /// Major version the browser must report, e.g. `120`.
    pub required_major_version: Option<u32>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            required_major_version: None,
        }
    }
}

/// CSS selectors for the news list on a category page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One element per headline.
    pub item: String,
    /// Headline text, inside `item`.
    pub title: String,
    /// Article link, inside `item`.
    pub link: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            item: ".newsFeed_item".to_string(),
            title: ".newsFeed_item_title".to_string(),
            link: "a".to_string(),
        }
    }
}

/// Bound on how long extraction waits for a nested element to render.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            interval_ms: 100,
        }
    }
}

impl WaitConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// The three files one run produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
    pub db: PathBuf,
}

impl ScrapeConfig {
    /// Load a YAML config file. Missing keys fall back to their defaults.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&raw)?;
        info!(categories = config.categories.len(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to an empty mapping.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Reject values that would make a run meaningless or unbounded.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        if self.categories.is_empty() {
            return Err(ConfigError::Invalid("no categories configured".into()));
        }
        if self.wait.max_attempts == 0 {
            return Err(ConfigError::Invalid("wait.max_attempts must be at least 1".into()));
        }
        if self.source_name.trim().is_empty() {
            return Err(ConfigError::Invalid("source_name must not be empty".into()));
        }
        let base = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::Invalid(format!("base_url {:?}: {e}", self.base_url)))?;
        if base.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "base_url {:?} cannot be used as a base",
                self.base_url
            )));
        }
        Ok(base)
    }

    /// Output file locations for a run on `date`.
    pub fn output_paths(&self, date: RunDate) -> OutputPaths {
        let stem = format!("{}_News_{}", self.source_name, date.compact());
        let dir = |d: &Path| self.output.root.join(d);
        OutputPaths {
            csv: dir(&self.output.csv_dir).join(format!("{stem}.csv")),
            json: dir(&self.output.json_dir).join(format!("{stem}.json")),
            db: dir(&self.output.db_dir).join(format!("{stem}.db")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_scrape() {
        let config = ScrapeConfig::default();
        assert_eq!(config.source_name, "Yahoo");
        assert_eq!(config.base_url, "https://news.yahoo.co.jp/topics/");
        assert_eq!(config.categories, Category::ALL.to_vec());
        assert!(config.browser.headless);
        assert_eq!(config.selectors.item, ".newsFeed_item");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = ScrapeConfig::from_yaml("  \n").unwrap();
        assert_eq!(config.categories.len(), 8);
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let yaml = r#"
source_name: Example
categories: [world, it]
wait:
  max_attempts: 3
browser:
  required_major_version: 120
"#;
        let config = ScrapeConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.source_name, "Example");
        assert_eq!(config.categories, vec![Category::World, Category::It]);
        assert_eq!(config.wait.max_attempts, 3);
        assert_eq!(config.wait.interval_ms, 100);
        assert_eq!(config.browser.required_major_version, Some(120));
        assert!(config.browser.headless);
        assert_eq!(config.output.csv_dir, PathBuf::from("csv"));
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let err = ScrapeConfig::from_yaml("categories: [weather]").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ScrapeConfig::default();
        config.categories.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ScrapeConfig::default();
        config.wait.max_attempts = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ScrapeConfig::default();
        config.base_url = "not a url".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = ScrapeConfig::default();
        config.base_url = "mailto:news@example.com".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_output_paths() {
        let mut config = ScrapeConfig::default();
        config.output.root = PathBuf::from("/srv/news");
        let date = RunDate::parse_compact("20250506").unwrap();
        let paths = config.output_paths(date);
        assert_eq!(paths.csv, PathBuf::from("/srv/news/csv/Yahoo_News_20250506.csv"));
        assert_eq!(paths.json, PathBuf::from("/srv/news/json/Yahoo_News_20250506.json"));
        assert_eq!(paths.db, PathBuf::from("/srv/news/db/Yahoo_News_20250506.db"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = ScrapeConfig::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
