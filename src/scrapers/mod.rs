//! Page extractors for category pages.
//!
//! Each extractor takes a [`crate::browser::Session`] that already shows a
//! category page and turns its news list into [`crate::models::NewsRecord`]s.
//!
//! # Supported Layouts
//!
//! | Layout | Module | Notes |
//! |--------|--------|-------|
//! | Yahoo! News topics | [`topics`] | `.newsFeed_item` list; selectors configurable |

pub mod topics;

pub use topics::PageExtractor;
