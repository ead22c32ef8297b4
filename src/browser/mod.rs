//! The browser capability the scraper runs against.
//!
//! Extraction never talks to Chrome directly. It goes through two traits:
//!
//! - [`Driver`]: starts a browser and hands out a [`Session`]
//! - [`Session`]: navigates and queries the DOM of the loaded page
//!
//! # Implementations
//!
//! | Driver | Module | Backing |
//! |--------|--------|---------|
//! | [`ChromeDriver`] | [`chrome`] | Headless Chrome over the DevTools protocol |
//! | [`SnapshotDriver`] | [`snapshot`] | Saved HTML pages parsed with `scraper` |
//!
//! Lookups that find nothing return `Ok(None)` / an empty `Vec`; errors are
//! reserved for real failures (dead browser, bad selector, unreadable file).

pub mod chrome;
pub mod snapshot;

pub use chrome::ChromeDriver;
pub use snapshot::SnapshotDriver;

use crate::error::BrowserError;

/// Starts browser sessions.
pub trait Driver {
    type Session: Session;

    /// Launch a browser. Fails with [`BrowserError::DriverMismatch`] when the
    /// browser cannot be used with this driver.
    fn open(&self) -> Result<Self::Session, BrowserError>;
}

/// One open browser tab.
///
/// `Node<'a>` is a handle to an element of the currently loaded page and
/// borrows the session, so handles cannot outlive the page they came from.
pub trait Session {
    type Node<'a>
    where
        Self: 'a;

    /// Load `url` and block until the page has loaded.
    fn navigate(&mut self, url: &str) -> Result<(), BrowserError>;

    /// URL of the currently loaded page, after any redirects.
    fn current_url(&self) -> Option<&str>;

    /// Every element of the page matching `selector`, in document order.
    fn find_all<'a>(&'a self, selector: &str) -> Result<Vec<Self::Node<'a>>, BrowserError>;

    /// First descendant of `scope` matching `selector`, if any.
    fn find_one<'a>(
        &'a self,
        scope: &Self::Node<'a>,
        selector: &str,
    ) -> Result<Option<Self::Node<'a>>, BrowserError>;

    /// Rendered text of `node`.
    fn text(&self, node: &Self::Node<'_>) -> Result<String, BrowserError>;

    fn attribute(&self, node: &Self::Node<'_>, name: &str) -> Result<Option<String>, BrowserError>;

    /// Release the browser. Consumes the session so it cannot be closed twice.
    fn close(self) -> Result<(), BrowserError>;
}
