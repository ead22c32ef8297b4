//! Headless Chrome session over the DevTools protocol.
//!
//! Launches Chrome/Chromium with `headless_chrome`, keeps a single tab, and
//! optionally checks the browser's major version before any page is loaded.

use super::{Driver, Session};
use crate::config::BrowserConfig;
use crate::error::BrowserError;
use headless_chrome::browser::tab::NoElementFound;
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ffi::OsStr;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

static MAJOR_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/(\d+)\.").expect("static regex is valid"));

/// Pull the major version out of a DevTools product string such as
/// `HeadlessChrome/120.0.6099.109`.
pub fn major_version(product: &str) -> Option<u32> {
    MAJOR_VERSION
        .captures(product)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Fail with [`BrowserError::DriverMismatch`] unless `product` reports the
/// `required` major version. No requirement means any browser is accepted.
pub fn check_major_version(required: Option<u32>, product: &str) -> Result<(), BrowserError> {
    let Some(required) = required else {
        return Ok(());
    };
    match major_version(product) {
        Some(found) if found == required => Ok(()),
        Some(found) => Err(BrowserError::DriverMismatch {
            detail: format!("driver expects major version {required}, browser reports {found} ({product:?})"),
        }),
        None => Err(BrowserError::DriverMismatch {
            detail: format!("driver expects major version {required}, cannot read version from {product:?}"),
        }),
    }
}

#[derive(Debug, Clone)]
pub struct ChromeDriver {
    config: BrowserConfig,
}

impl ChromeDriver {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

impl Driver for ChromeDriver {
    type Session = ChromeSession;

    #[instrument(level = "info", skip_all, fields(headless = self.config.headless))]
    fn open(&self) -> Result<ChromeSession, BrowserError> {
        let options = LaunchOptions {
            headless: self.config.headless,
            path: self.config.executable.clone(),
            args: vec![OsStr::new("--disable-extensions")],
            ..LaunchOptions::default()
        };

        let browser = Browser::new(options).map_err(|e| BrowserError::DriverMismatch {
            detail: format!("failed to launch browser: {e:#}"),
        })?;

        let product = browser.get_version()?.product;
        info!(%product, "Browser started");

        check_major_version(self.config.required_major_version, &product)?;

        let tab = browser.new_tab()?;
        Ok(ChromeSession {
            browser,
            tab,
            url: None,
        })
    }
}

pub struct ChromeSession {
    // Dropping the browser kills the Chrome process.
    browser: Browser,
    tab: Arc<Tab>,
    url: Option<String>,
}

impl Session for ChromeSession {
    type Node<'a> = Element<'a>;

    #[instrument(level = "debug", skip(self))]
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError> {
        self.tab.navigate_to(url)?.wait_until_navigated()?;
        let landed = self.tab.get_url();
        if landed != url {
            debug!(requested = url, %landed, "Page redirected");
        }
        self.url = Some(landed);
        Ok(())
    }

    fn current_url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn find_all<'a>(&'a self, selector: &str) -> Result<Vec<Element<'a>>, BrowserError> {
        match self.tab.find_elements(selector) {
            Ok(elements) => Ok(elements),
            Err(e) if e.is::<NoElementFound>() => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn find_one<'a>(
        &'a self,
        scope: &Element<'a>,
        selector: &str,
    ) -> Result<Option<Element<'a>>, BrowserError> {
        match scope.find_element(selector) {
            Ok(element) => Ok(Some(element)),
            Err(e) if e.is::<NoElementFound>() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn text(&self, node: &Element<'_>) -> Result<String, BrowserError> {
        Ok(node.get_inner_text()?.trim().to_string())
    }

    fn attribute(&self, node: &Element<'_>, name: &str) -> Result<Option<String>, BrowserError> {
        Ok(node.get_attribute_value(name)?)
    }

    #[instrument(level = "info", skip_all)]
    fn close(self) -> Result<(), BrowserError> {
        if let Err(e) = self.tab.close(true) {
            warn!(error = %e, "Failed to close tab cleanly");
        }
        drop(self.browser);
        debug!("Browser closed");
        Ok(())
    }
}
