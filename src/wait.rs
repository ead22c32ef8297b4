//! Bounded polling for elements that render after the page load.
//!
//! Category pages may fill in parts of a news item asynchronously, so a
//! lookup can miss an element that shows up a moment later. [`WaitPolicy`]
//! repeats a lookup until it produces a value, within a fixed budget:
//!
//! - at most `max_attempts` lookups
//! - a fixed `interval` sleep between lookups
//! - a shared [`CancelFlag`] checked before every lookup
//!
//! Running out of attempts is a typed [`ExtractError::Timeout`], never a hang.

use crate::config::WaitConfig;
use crate::error::{BrowserError, ExtractError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::sleep;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Cooperative cancellation shared between the Ctrl-C handler and the run.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone)]
pub struct WaitPolicy {
    max_attempts: u32,
    interval: Duration,
    cancel: CancelFlag,
}

impl WaitPolicy {
    /// `max_attempts` is clamped to at least one lookup.
    pub fn new(max_attempts: u32, interval: Duration, cancel: CancelFlag) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            interval,
            cancel,
        }
    }

    pub fn from_config(config: &WaitConfig, cancel: CancelFlag) -> Self {
        Self::new(config.max_attempts, config.interval(), cancel)
    }

    /// Run `probe` until it returns `Some`, the budget is spent, or the run is
    /// cancelled. Browser errors from `probe` abort the wait immediately.
    pub fn poll<T, F>(&self, selector: &str, mut probe: F) -> Result<T, ExtractError>
    where
        F: FnMut() -> Result<Option<T>, BrowserError>,
    {
        let t0 = Instant::now();
        let mut attempt = 0u32;

        loop {
            if self.cancel.is_cancelled() {
                return Err(ExtractError::Cancelled);
            }

            attempt += 1;
            if let Some(found) = probe()? {
                if attempt > 1 {
                    debug!(selector, attempt, elapsed_ms = t0.elapsed().as_millis() as u64, "Element appeared after waiting");
                }
                return Ok(found);
            }

            if attempt >= self.max_attempts {
                warn!(
                    selector,
                    attempt,
                    elapsed_ms = t0.elapsed().as_millis() as u64,
                    "Element never appeared; giving up"
                );
                return Err(ExtractError::Timeout {
                    selector: selector.to_string(),
                    attempts: attempt,
                });
            }

            sleep(self.interval);
        }
    }
}
