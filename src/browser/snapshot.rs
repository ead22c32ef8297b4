//! Replays saved category pages instead of driving a live browser.
//!
//! A snapshot directory holds one `<category>.html` per category, e.g.
//! `snapshots/domestic.html`. Navigating to
//! `https://news.yahoo.co.jp/topics/domestic?date=20250506` loads
//! `snapshots/domestic.html`; the query string is ignored.
//!
//! Pages are parsed with `scraper`, so there is no script execution and
//! everything is "rendered" as soon as it is loaded.

use super::{Driver, Session};
use crate::error::BrowserError;
use scraper::{ElementRef, Html, Selector};
#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, instrument};
use url::Url;

#[derive(Debug, Clone)]
enum PageSource {
    Dir(PathBuf),
    #[cfg(test)]
    Memory(HashMap<String, String>),
}

/// Opens [`SnapshotSession`]s over a directory of saved pages. Tests use an
/// in-memory page set instead.
#[derive(Debug, Clone)]
pub struct SnapshotDriver {
    source: PageSource,
}

impl SnapshotDriver {
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            source: PageSource::Dir(dir.into()),
        }
    }

    #[cfg(test)]
    /// Pages keyed by the last path segment of their URL (the category slug).
    pub fn from_pages<K, V>(pages: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            source: PageSource::Memory(
                pages
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl Driver for SnapshotDriver {
    type Session = SnapshotSession;

    fn open(&self) -> Result<SnapshotSession, BrowserError> {
        match &self.source {
            PageSource::Dir(dir) if !dir.is_dir() => {
                return Err(BrowserError::Snapshot {
                    path: dir.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "snapshot directory does not exist",
                    ),
                });
            }
            _ => {}
        }
        Ok(SnapshotSession {
            source: self.source.clone(),
            page: None,
            url: None,
        })
    }
}

pub struct SnapshotSession {
    source: PageSource,
    page: Option<Html>,
    url: Option<String>,
}

impl SnapshotSession {
    fn page(&self) -> Result<&Html, BrowserError> {
        self.page.as_ref().ok_or(BrowserError::NoPage)
    }

    fn load(&self, url: &str) -> Result<String, BrowserError> {
        let parsed = Url::parse(url)?;
        let slug = parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .unwrap_or("index")
            .to_string();

        match &self.source {
            PageSource::Dir(dir) => {
                let path = dir.join(format!("{slug}.html"));
                if !path.is_file() {
                    return Err(BrowserError::MissingSnapshot {
                        url: url.to_string(),
                        path,
                    });
                }
                fs::read_to_string(&path).map_err(|source| BrowserError::Snapshot { path, source })
            }
            #[cfg(test)]
            PageSource::Memory(pages) => {
                pages
                    .get(&slug)
                    .cloned()
                    .ok_or_else(|| BrowserError::MissingSnapshot {
                        url: url.to_string(),
                        path: PathBuf::from(format!("{slug}.html")),
                    })
            }
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector, BrowserError> {
    Selector::parse(selector).map_err(|_| BrowserError::Selector(selector.to_string()))
}

impl Session for SnapshotSession {
    type Node<'a> = ElementRef<'a>;

    #[instrument(level = "debug", skip(self))]
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        let html = self.load(url)?;
        debug!(bytes = html.len(), "Loaded snapshot");
        self.page = Some(Html::parse_document(&html));
        self.url = Some(url.to_string());
        Ok(())
    }

    fn current_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn find_all<'a>(&'a self, selector: &str) -> Result<Vec<ElementRef<'a>>, BrowserError> {
        let selector = parse_selector(selector)?;
        Ok(self.page()?.select(&selector).collect())
    }

    fn find_one<'a>(
        &'a self,
        scope: &ElementRef<'a>,
        selector: &str,
    ) -> Result<Option<ElementRef<'a>>, BrowserError> {
        let selector = parse_selector(selector)?;
        Ok(scope.select(&selector).next())
    }

    fn text(&self, node: &ElementRef<'_>) -> Result<String, BrowserError> {
        // Collapse whitespace the way a rendered innerText would.
        Ok(node.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" "))
    }

    fn attribute(&self, node: &ElementRef<'_>, name: &str) -> Result<Option<String>, BrowserError> {
        Ok(node.value().attr(name).map(str::to_string))
    }

    fn close(self) -> Result<(), BrowserError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <ul>
            <li class="newsFeed_item">
              <a href="/pickup/1"><div class="newsFeed_item_title">  First
                 headline </div></a>
            </li>
            <li class="newsFeed_item">
              <a href="https://example.com/2"><div class="newsFeed_item_title">Second</div></a>
            </li>
          </ul>
        </body></html>
    "#;

    fn session() -> SnapshotSession {
        let driver = SnapshotDriver::from_pages([("world", PAGE)]);
        let mut session = driver.open().unwrap();
        session
            .navigate("https://news.example.com/topics/world?date=20250506")
            .unwrap();
        session
    }

    #[test]
    fn test_find_all_and_nested_lookup() {
        let session = session();
        let items = session.find_all(".newsFeed_item").unwrap();
        assert_eq!(items.len(), 2);

        let title = session.find_one(&items[0], ".newsFeed_item_title").unwrap().unwrap();
        assert_eq!(session.text(&title).unwrap(), "First headline");

        let link = session.find_one(&items[1], "a").unwrap().unwrap();
        assert_eq!(
            session.attribute(&link, "href").unwrap().as_deref(),
            Some("https://example.com/2")
        );
        assert_eq!(session.attribute(&link, "title").unwrap(), None);

        assert!(session.find_one(&items[0], "img").unwrap().is_none());
        assert_eq!(
            session.current_url(),
            Some("https://news.example.com/topics/world?date=20250506")
        );
    }

    #[test]
    fn test_lookup_before_navigation_fails() {
        let session = SnapshotDriver::from_pages([("world", PAGE)]).open().unwrap();
        assert!(matches!(session.find_all("li"), Err(BrowserError::NoPage)));
    }

    #[test]
    fn test_missing_page() {
        let mut session = SnapshotDriver::from_pages([("world", PAGE)]).open().unwrap();
        let err = session.navigate("https://news.example.com/topics/it").unwrap_err();
        assert!(matches!(err, BrowserError::MissingSnapshot { .. }));
    }

    #[test]
    fn test_bad_selector() {
        let session = session();
        assert!(matches!(session.find_all("li[["), Err(BrowserError::Selector(_))));
    }

    #[test]
    fn test_directory_source() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("sports.html"), PAGE).unwrap();

        let mut session = SnapshotDriver::from_dir(tmp.path()).open().unwrap();
        session.navigate("https://news.example.com/topics/sports/").unwrap();
        assert_eq!(session.find_all(".newsFeed_item").unwrap().len(), 2);

        assert!(SnapshotDriver::from_dir(tmp.path().join("nope")).open().is_err());
    }
}
