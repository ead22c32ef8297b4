//! News-list extractor for topics pages.
//!
//! A topics page lists one container per headline:
//!
//! ```html
//! <li class="newsFeed_item">
//!   <a href="https://news.yahoo.co.jp/pickup/6500000">
//!     <div class="newsFeed_item_title">Headline text</div>
//!   </a>
//! </li>
//! ```
//!
//! Containers are read in document order. For each one, the title and link
//! elements are awaited with the configured [`WaitPolicy`], since they may
//! render after the container itself.

use crate::browser::Session;
use crate::config::SelectorConfig;
use crate::error::ExtractError;
use crate::models::{Category, NewsRecord};
use crate::utils::truncate_for_log;
use crate::wait::WaitPolicy;
use tracing::{debug, info, instrument};
use url::Url;

#[derive(Debug, Clone)]
pub struct PageExtractor {
    selectors: SelectorConfig,
    wait: WaitPolicy,
}

impl PageExtractor {
    pub fn new(selectors: SelectorConfig, wait: WaitPolicy) -> Self {
        Self { selectors, wait }
    }

    /// Extract every headline on the page `session` currently shows.
    ///
    /// A page without any news containers yields an empty list; that only
    /// means the category had no news that day.
    ///
    /// # Errors
    ///
    /// - [`ExtractError::Timeout`] if a container's title or link never appears
    /// - [`ExtractError::Cancelled`] if the run is cancelled mid-wait
    /// - [`ExtractError::Browser`] for any browser failure
    #[instrument(level = "info", skip_all, fields(%category))]
    pub fn extract<S: Session>(
        &self,
        session: &S,
        category: Category,
    ) -> Result<Vec<NewsRecord>, ExtractError> {
        let items = session.find_all(&self.selectors.item)?;
        if items.is_empty() {
            info!("No news items on page");
            return Ok(Vec::new());
        }

        let page_url = session.current_url().and_then(|u| Url::parse(u).ok());
        let mut records = Vec::with_capacity(items.len());

        for item in &items {
            let title_el = self
                .wait
                .poll(&self.selectors.title, || session.find_one(item, &self.selectors.title))?;
            let link_el = self
                .wait
                .poll(&self.selectors.link, || session.find_one(item, &self.selectors.link))?;

            let title = session.text(&title_el)?;
            let href = session.attribute(&link_el, "href")?.unwrap_or_default();
            let url = resolve_href(page_url.as_ref(), &href);

            debug!(title = %truncate_for_log(&title, 60), %url, "Extracted headline");
            records.push(NewsRecord {
                category,
                title,
                url,
            });
        }

        info!(count = records.len(), "Extracted headlines");
        Ok(records)
    }
}

/// Resolve a raw `href` against the page URL, as a browser's `href` property would.
fn resolve_href(page: Option<&Url>, href: &str) -> String {
    let href = href.trim();
    if href.is_empty() {
        return String::new();
    }
    match page.map(|base| base.join(href)) {
        Some(Ok(resolved)) => resolved.to_string(),
        _ => href.to_string(),
    }
}
