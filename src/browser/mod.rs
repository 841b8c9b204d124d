//! Navigator adapter: renders a page and hands back its elements
//!
//! [`Navigator`] and [`PageHandle`] are the seam between the job controller
//! and the browser. [`ChromeNavigator`] is the headless Chrome
//! implementation; tests substitute in-memory pages.

pub mod config;
pub mod session;
pub mod url;

pub use config::LaunchOptions;
pub use session::BrowserSession;
pub use url::normalize_url;

use crate::dom::DomSnapshot;
use crate::error::{Result, ScrapeError};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// A loaded page. Dropping the handle releases the browser resources behind it.
pub trait PageHandle: Send {
    /// Enumerate the first `max_nodes` elements in document order.
    ///
    /// Text is transported long enough to tell whether it fits in
    /// `display_text_cap` characters.
    fn snapshot(&self, max_nodes: usize, html_cap: usize, display_text_cap: usize) -> Result<DomSnapshot>;
}

/// Opens pages, each in its own isolated browser context
pub trait Navigator: Send + Sync {
    /// Load `url` and wait for the network to go idle, bounded by `timeout`.
    /// Fails with [`ScrapeError::Cancelled`] soon after `cancel` fires.
    fn open(&self, url: &str, timeout: Duration, cancel: &CancellationToken) -> Result<Box<dyn PageHandle>>;
}

/// Launches a fresh Chrome per page; contexts are never shared between jobs
#[derive(Debug, Clone, Default)]
pub struct ChromeNavigator {
    launch: LaunchOptions,
    network_idle: Duration,
}

impl ChromeNavigator {
    pub fn new(launch: LaunchOptions, network_idle: Duration) -> Self {
        Self { launch, network_idle }
    }
}

struct ChromePage {
    session: BrowserSession,
}

impl PageHandle for ChromePage {
    fn snapshot(&self, max_nodes: usize, html_cap: usize, display_text_cap: usize) -> Result<DomSnapshot> {
        self.session.snapshot(max_nodes, html_cap, display_text_cap)
    }
}

impl Navigator for ChromeNavigator {
    fn open(&self, url: &str, timeout: Duration, cancel: &CancellationToken) -> Result<Box<dyn PageHandle>> {
        let deadline = Instant::now() + timeout;
        let session = BrowserSession::launch(&self.launch)?;
        if cancel.is_cancelled() {
            return Err(ScrapeError::Cancelled);
        }

        log::debug!("Navigating to {}", url);
        session.navigate(url, timeout)?;
        session.wait_for_network_idle(self.network_idle, deadline, timeout, cancel)?;

        Ok(Box::new(ChromePage { session }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires Chrome to be installed
    fn test_open_data_url() {
        let navigator = ChromeNavigator::new(LaunchOptions::new().headless(true), Duration::from_millis(200));
        let page = navigator
            .open("data:text/html,<html><body><p>Hi</p></body></html>", Duration::from_secs(20), &CancellationToken::new())
            .expect("Failed to open page");

        let snapshot = page.snapshot(10, 2000, 40).expect("Failed to snapshot");
        let tags: Vec<_> = snapshot.nodes().iter().map(|n| n.tag_name.as_str()).collect();
        assert_eq!(tags, vec!["html", "head", "body", "p"]);
    }

    #[test]
    #[ignore]
    fn test_open_cancelled() {
        let navigator = ChromeNavigator::new(LaunchOptions::new().headless(true), Duration::from_millis(200));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = navigator.open("about:blank", Duration::from_secs(20), &cancel);
        assert!(matches!(result, Err(ScrapeError::Cancelled)));
    }
}
