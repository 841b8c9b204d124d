use crate::classify::ClassifierKind;
use crate::dom::ExtractLimits;
use crate::dom::metadata::{DEFAULT_DISPLAY_TEXT_CAP, DEFAULT_HTML_CAP};
use std::time::Duration;

/// Settings for scrape jobs
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapeConfig {
    /// Elements examined per page, taken in document order
    pub max_nodes: usize,

    /// Characters of outer markup kept per element
    pub html_cap: usize,

    /// Longest inner text folded into a display name
    pub display_text_cap: usize,

    /// Bound on page load, including the network-idle wait
    pub navigation_timeout: Duration,

    /// Quiet period without new network requests that counts as idle
    pub network_idle: Duration,

    /// Bound on a whole job; expiry cancels in-flight work
    pub job_deadline: Duration,

    /// Classification strategy
    pub classifier: ClassifierKind,

    /// Classifier calls allowed in flight at once
    pub classify_concurrency: usize,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            max_nodes: 20,
            html_cap: DEFAULT_HTML_CAP,
            display_text_cap: DEFAULT_DISPLAY_TEXT_CAP,
            navigation_timeout: Duration::from_secs(60),
            network_idle: Duration::from_millis(500),
            job_deadline: Duration::from_secs(180),
            classifier: ClassifierKind::Rules,
            classify_concurrency: 4,
        }
    }
}

impl ScrapeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn html_cap(mut self, html_cap: usize) -> Self {
        self.html_cap = html_cap;
        self
    }

    pub fn navigation_timeout(mut self, timeout: Duration) -> Self {
        self.navigation_timeout = timeout;
        self
    }

    pub fn network_idle(mut self, quiet: Duration) -> Self {
        self.network_idle = quiet;
        self
    }

    pub fn job_deadline(mut self, deadline: Duration) -> Self {
        self.job_deadline = deadline;
        self
    }

    pub fn classifier(mut self, classifier: ClassifierKind) -> Self {
        self.classifier = classifier;
        self
    }

    /// Zero is treated as one
    pub fn classify_concurrency(mut self, concurrency: usize) -> Self {
        self.classify_concurrency = concurrency.max(1);
        self
    }

    pub fn extract_limits(&self) -> ExtractLimits {
        ExtractLimits { html_cap: self.html_cap, display_text_cap: self.display_text_cap }
    }
}
