//! Job controller: one page load turned into classified, grouped elements.
//!
//! A job moves `Pending -> Navigating -> Extracting -> Aggregating -> Done`.
//! `Failed` is reachable from every non-terminal state. Per-node extraction
//! errors skip that node and classifier errors fall back to
//! [`Category::Uncategorized`]; neither fails the job.

use crate::aggregate::{Aggregation, ElementRecord};
use crate::browser::{Navigator, PageHandle, normalize_url};
use crate::classify::{Category, Classifier};
use crate::config::ScrapeConfig;
use crate::dom::{DomSnapshot, ElementMetadata, XPathResolver, extract_metadata};
use crate::error::{Result, ScrapeError};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Slack on top of the navigation timeout before the controller gives up on
/// the browser thread itself
const NAVIGATION_GRACE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobStatus {
    Pending,
    Navigating,
    Extracting,
    Aggregating,
    Done,
    Failed,
}

impl JobStatus {
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        use JobStatus::*;
        matches!(
            (self, next),
            (Pending, Navigating)
                | (Navigating, Extracting)
                | (Extracting, Aggregating)
                | (Aggregating, Done)
                | (Pending | Navigating | Extracting | Aggregating, Failed)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Counters collected while a job runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JobStats {
    /// Elements on the page, including those past the cap
    pub total_elements: usize,
    /// Elements taken from the page for processing
    pub examined: usize,
    /// Elements dropped because they could not be evaluated
    pub skipped: usize,
    /// Elements whose category fell back after a classifier failure
    pub classification_failures: usize,
}

/// State and results of one scrape request. Not resumable.
#[derive(Debug, Clone)]
pub struct ScrapeJob {
    url: String,
    status: JobStatus,
    aggregation: Aggregation,
    logs: Vec<String>,
    error: Option<ScrapeError>,
    stats: JobStats,
}

impl ScrapeJob {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: JobStatus::Pending,
            aggregation: Aggregation::default(),
            logs: Vec::new(),
            error: None,
            stats: JobStats::default(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    /// Records in document order; empty unless the job is done
    pub fn records(&self) -> &[ElementRecord] {
        self.aggregation.records()
    }

    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    pub fn error(&self) -> Option<&ScrapeError> {
        self.error.as_ref()
    }

    pub fn stats(&self) -> &JobStats {
        &self.stats
    }

    fn transition(&mut self, next: JobStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(ScrapeError::Internal(format!("illegal job transition {} -> {}", self.status, next)));
        }
        log::debug!("Job for {}: {} -> {}", self.url, self.status, next);
        self.status = next;
        Ok(())
    }

    fn log(&mut self, line: impl Into<String>) {
        self.logs.push(line.into());
    }

    fn fail(&mut self, error: ScrapeError) {
        if let Err(e) = self.transition(JobStatus::Failed) {
            log::error!("{}", e);
            return;
        }
        log::error!("Scraping {} failed: {}", self.url, error);
        self.log(format!("Scraping failed: {}", error));
        self.error = Some(error);
    }
}

/// One element that made it through resolution and extraction
struct ExtractedNode {
    index: usize,
    xpath: String,
    metadata: ElementMetadata,
}

/// Runs scrape jobs against a navigator with a fixed classifier
pub struct JobController {
    navigator: Arc<dyn Navigator>,
    classifier: Arc<dyn Classifier>,
    config: ScrapeConfig,
}

impl JobController {
    /// Build a controller using the classifier selected in `config`
    pub fn new(navigator: Arc<dyn Navigator>, config: ScrapeConfig) -> Result<Self> {
        let classifier = config.classifier.build()?;
        Ok(Self::with_classifier(navigator, classifier, config))
    }

    pub fn with_classifier(navigator: Arc<dyn Navigator>, classifier: Arc<dyn Classifier>, config: ScrapeConfig) -> Self {
        Self { navigator, classifier, config }
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Run a job to completion. Never panics and never returns early:
    /// the returned job is always `Done` or `Failed`.
    pub async fn run(&self, url: &str) -> ScrapeJob {
        self.run_with_cancel(url, CancellationToken::new()).await
    }

    /// Like [`run`](Self::run), stopping early once `cancel` fires or the
    /// configured job deadline passes. The job works on a child of `cancel`,
    /// so a token shared between jobs is never cancelled by one of them.
    /// Dropping the returned future stops the job's own browser work.
    pub async fn run_with_cancel(&self, url: &str, cancel: CancellationToken) -> ScrapeJob {
        let mut job = ScrapeJob::new(url);
        let cancel = cancel.child_token();
        let _guard = cancel.clone().drop_guard();

        let outcome = tokio::select! {
            result = self.execute(&mut job, &cancel) => result,
            _ = cancel.cancelled() => Err(ScrapeError::Cancelled),
            _ = tokio::time::sleep(self.config.job_deadline) => {
                log::warn!("Job for {} exceeded its {:?} deadline", url, self.config.job_deadline);
                Err(ScrapeError::Cancelled)
            }
        };

        if let Err(error) = outcome {
            job.fail(error);
        }
        job
    }

    async fn execute(&self, job: &mut ScrapeJob, cancel: &CancellationToken) -> Result<()> {
        let url = normalize_url(job.url())?;

        job.transition(JobStatus::Navigating)?;
        log::info!("Navigating to {}", url);
        job.log(format!("Navigating to {}", url));
        let page = self.open_page(&url, cancel).await?;

        job.transition(JobStatus::Extracting)?;
        let snapshot = self.capture(page, cancel).await?;
        job.stats.total_elements = snapshot.total_elements();
        job.log(format!(
            "Page loaded; examining {} of {} elements",
            snapshot.len().min(self.config.max_nodes),
            snapshot.total_elements()
        ));

        let extracted = self.extract(job, &snapshot);
        let records = self.classify_all(job, extracted).await;

        job.transition(JobStatus::Aggregating)?;
        job.aggregation = Aggregation::from_indexed(records);
        job.log(format!("Scraping complete. Found {} elements.", job.aggregation.total()));
        log::info!("Scraped {} elements from {}", job.aggregation.total(), url);

        job.transition(JobStatus::Done)
    }

    /// Navigation runs on the blocking pool and gives up at its next check
    /// once `cancel` fires. The page it returns is dropped, and its browser
    /// closed, however this future ends.
    async fn open_page(&self, url: &str, cancel: &CancellationToken) -> Result<Box<dyn PageHandle>> {
        let navigator = Arc::clone(&self.navigator);
        let timeout = self.config.navigation_timeout;
        let target = url.to_string();
        let cancel = cancel.clone();

        let task = tokio::task::spawn_blocking(move || navigator.open(&target, timeout, &cancel));
        match tokio::time::timeout(timeout + NAVIGATION_GRACE, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(ScrapeError::Internal(format!("navigation task failed: {}", e))),
            Err(_) => Err(ScrapeError::NavigationTimeout(timeout)),
        }
    }

    /// Enumerate elements, then release the page
    async fn capture(&self, page: Box<dyn PageHandle>, cancel: &CancellationToken) -> Result<DomSnapshot> {
        let max_nodes = self.config.max_nodes;
        let html_cap = self.config.html_cap;
        let text_cap = self.config.display_text_cap;
        let cancel = cancel.clone();

        tokio::task::spawn_blocking(move || {
            if cancel.is_cancelled() {
                return Err(ScrapeError::Cancelled);
            }
            page.snapshot(max_nodes, html_cap, text_cap)
        })
        .await
        .map_err(|e| ScrapeError::Internal(format!("snapshot task failed: {}", e)))?
    }

    fn extract(&self, job: &mut ScrapeJob, snapshot: &DomSnapshot) -> Vec<ExtractedNode> {
        let limits = self.config.extract_limits();
        let examined = snapshot.len().min(self.config.max_nodes);
        let mut resolver = XPathResolver::new(snapshot);
        let mut extracted = Vec::with_capacity(examined);

        for (index, node) in snapshot.nodes().iter().enumerate().take(examined) {
            let outcome = resolver
                .resolve(index)
                .and_then(|xpath| extract_metadata(index, node, &limits).map(|metadata| (xpath, metadata)));

            match outcome {
                Ok((xpath, metadata)) => extracted.push(ExtractedNode { index, xpath, metadata }),
                Err(e) => {
                    log::warn!("Skipping element {}: {}", index, e);
                    job.stats.skipped += 1;
                    job.log(format!("Skipped element {}: {}", index, e));
                }
            }
        }

        job.stats.examined = examined;
        extracted
    }

    /// Classify every node with bounded concurrency. Results come back in
    /// completion order and are tagged with the node's enumeration index.
    async fn classify_all(&self, job: &mut ScrapeJob, extracted: Vec<ExtractedNode>) -> Vec<(usize, ElementRecord)> {
        let semaphore = Arc::new(Semaphore::new(self.config.classify_concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for (position, node) in extracted.iter().enumerate() {
            let classifier = Arc::clone(&self.classifier);
            let semaphore = Arc::clone(&semaphore);
            let metadata = node.metadata.clone();
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                (position, classifier.classify(&metadata).await)
            });
        }

        let mut categories: Vec<Option<Category>> = vec![None; extracted.len()];
        let mut first_failure = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, Ok(category))) => categories[position] = Some(category),
                Ok((position, Err(e))) => {
                    log::warn!("Classifier failed for {}: {}", extracted[position].xpath, e);
                    first_failure.get_or_insert_with(|| e.to_string());
                }
                Err(e) => {
                    log::error!("Classification task failed: {}", e);
                    first_failure.get_or_insert_with(|| "classification task failed".to_string());
                }
            }
        }

        let fallback = self.classifier.fallback();
        let failures = categories.iter().filter(|category| category.is_none()).count();
        job.stats.classification_failures = failures;
        job.log(format!("Classified {} elements with the {} strategy", extracted.len(), self.classifier.name()));
        if let Some(cause) = first_failure {
            job.log(format!("{} elements fell back to {} (first cause: {})", failures, fallback, cause));
        }

        extracted
            .into_iter()
            .zip(categories)
            .map(|(node, category)| {
                (node.index, ElementRecord::new(node.xpath, node.metadata, category.unwrap_or(fallback)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        use JobStatus::*;
        assert!(Pending.can_transition_to(Navigating));
        assert!(Navigating.can_transition_to(Extracting));
        assert!(Extracting.can_transition_to(Aggregating));
        assert!(Aggregating.can_transition_to(Done));
    }

    #[test]
    fn test_failed_reachable_from_active_states() {
        use JobStatus::*;
        for status in [Pending, Navigating, Extracting, Aggregating] {
            assert!(status.can_transition_to(Failed), "{} -> Failed", status);
        }
    }

    #[test]
    fn test_terminal_states_are_final() {
        use JobStatus::*;
        for from in [Done, Failed] {
            assert!(from.is_terminal());
            for to in [Pending, Navigating, Extracting, Aggregating, Done, Failed] {
                assert!(!from.can_transition_to(to), "{} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_no_skipping_states() {
        use JobStatus::*;
        assert!(!Pending.can_transition_to(Extracting));
        assert!(!Navigating.can_transition_to(Done));
        assert!(!Extracting.can_transition_to(Navigating));
    }

    #[test]
    fn test_fail_records_error() {
        let mut job = ScrapeJob::new("");
        job.fail(ScrapeError::InvalidInput("URL is required".into()));

        assert_eq!(job.status(), JobStatus::Failed);
        assert_eq!(job.error(), Some(&ScrapeError::InvalidInput("URL is required".into())));
        assert_eq!(job.logs().last().map(String::as_str), Some("Scraping failed: Invalid input: URL is required"));
        assert!(job.records().is_empty());
    }

    #[test]
    fn test_fail_after_done_is_ignored() {
        let mut job = ScrapeJob::new("https://example.com");
        for status in [JobStatus::Navigating, JobStatus::Extracting, JobStatus::Aggregating, JobStatus::Done] {
            job.transition(status).unwrap();
        }
        job.fail(ScrapeError::Cancelled);
        assert_eq!(job.status(), JobStatus::Done);
        assert!(job.error().is_none());
    }
}
