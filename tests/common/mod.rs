#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use xpath_scraper::{DomNode, DomSnapshot, Navigator, PageHandle, Result, ScrapeError};

/// Serves a fixed snapshot and counts opened and released pages
#[derive(Clone)]
pub struct StaticNavigator {
    snapshot: DomSnapshot,
    load_delay: Duration,
    failure: Option<ScrapeError>,
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
}

impl StaticNavigator {
    pub fn new(snapshot: DomSnapshot) -> Self {
        Self {
            snapshot,
            load_delay: Duration::ZERO,
            failure: None,
            opened: Arc::new(AtomicUsize::new(0)),
            closed: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn failing(error: ScrapeError) -> Self {
        Self { failure: Some(error), ..Self::new(DomSnapshot::default()) }
    }

    pub fn slow(snapshot: DomSnapshot, load_delay: Duration) -> Self {
        Self { load_delay, ..Self::new(snapshot) }
    }

    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

/// How often a loading page checks for cancellation
const POLL_INTERVAL: Duration = Duration::from_millis(10);

impl Navigator for StaticNavigator {
    fn open(&self, _url: &str, timeout: Duration, cancel: &CancellationToken) -> Result<Box<dyn PageHandle>> {
        // The page exists from here on; every early return releases it
        self.opened.fetch_add(1, Ordering::SeqCst);
        let page = StaticPage { snapshot: self.snapshot.clone(), closed: Arc::clone(&self.closed) };
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        let started = Instant::now();
        while started.elapsed() < self.load_delay {
            if cancel.is_cancelled() {
                return Err(ScrapeError::Cancelled);
            }
            if started.elapsed() >= timeout {
                return Err(ScrapeError::NavigationTimeout(timeout));
            }
            std::thread::sleep(POLL_INTERVAL);
        }

        Ok(Box::new(page))
    }
}

struct StaticPage {
    snapshot: DomSnapshot,
    closed: Arc<AtomicUsize>,
}

impl PageHandle for StaticPage {
    fn snapshot(&self, _max_nodes: usize, _html_cap: usize, _display_text_cap: usize) -> Result<DomSnapshot> {
        Ok(self.snapshot.clone())
    }
}

impl Drop for StaticPage {
    fn drop(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

/// `<html><head></head><body><button id="go">Go</button></body></html>`
pub fn button_page() -> DomSnapshot {
    DomSnapshot::new(vec![
        DomNode::new("html").with_html("<html><head></head><body><button id=\"go\">Go</button></body></html>"),
        DomNode::new("head").with_parent(0).with_html("<head></head>"),
        DomNode::new("body").with_parent(0).with_text("Go").with_html("<body><button id=\"go\">Go</button></body>"),
        DomNode::new("button")
            .with_parent(2)
            .with_attribute("id", "go")
            .with_text("Go")
            .with_html("<button id=\"go\">Go</button>"),
    ])
}

/// html > body > `count` divs, each with id `e<i>`
pub fn div_page(count: usize) -> DomSnapshot {
    let mut nodes = vec![DomNode::new("html"), DomNode::new("body").with_parent(0)];
    for i in 0..count {
        nodes.push(
            DomNode::new("div")
                .with_parent(1)
                .with_attribute("id", format!("e{}", i))
                .with_html(format!("<div id=\"e{}\"></div>", i)),
        );
    }
    DomSnapshot::new(nodes)
}

/// A small form page exercising several categories
pub fn form_page() -> DomSnapshot {
    DomSnapshot::new(vec![
        DomNode::new("html"),                                                          // 0
        DomNode::new("body").with_parent(0),                                           // 1
        DomNode::new("h1").with_parent(1).with_text("Sign in"),                        // 2
        DomNode::new("form").with_parent(1).with_attribute("id", "login"),             // 3
        DomNode::new("input").with_parent(3).with_attribute("name", "email").with_attribute("type", "email"), // 4
        DomNode::new("input").with_parent(3).with_attribute("name", "password").with_attribute("type", "password"), // 5
        DomNode::new("input").with_parent(3).with_attribute("type", "checkbox"),       // 6
        DomNode::new("button").with_parent(3).with_attribute("type", "submit").with_text("Sign in"), // 7
        DomNode::new("a").with_parent(1).with_attribute("href", "/reset").with_text("Forgot password?"), // 8
    ])
}
