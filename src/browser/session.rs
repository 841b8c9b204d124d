use crate::browser::config::LaunchOptions;
use crate::dom::{DomSnapshot, snapshot_expression};
use crate::error::{Result, ScrapeError};
use headless_chrome::{Browser, Tab};
use serde::Deserialize;
use std::{ffi::OsStr, sync::Arc, thread, time::{Duration, Instant}};
use tokio_util::sync::CancellationToken;

/// How often the page is probed while waiting for the network to settle
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Reports load state and how many resources the page has requested so far
const IDLE_PROBE_JS: &str = r#"JSON.stringify({
    ready: document.readyState,
    resources: performance.getEntriesByType('resource').length
})"#;

#[derive(Debug, Deserialize)]
struct IdleProbe {
    ready: String,
    resources: usize,
}

/// One Chrome/Chromium process with a single tab, owned by one job.
///
/// Dropping the session closes the tab and shuts the browser process down,
/// so every exit path releases it.
pub struct BrowserSession {
    /// The underlying headless_chrome Browser instance
    browser: Browser,

    /// The tab the page is loaded into
    tab: Arc<Tab>,
}

impl BrowserSession {
    /// Launch a new browser instance with the given options
    pub fn launch(options: &LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));

        // Keep the connection alive through slow page loads
        launch_opts.idle_browser_timeout = Duration::from_secs(10 * 60);

        launch_opts.headless = options.headless;
        launch_opts.sandbox = options.sandbox;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.path = options.chrome_path.clone();
        launch_opts.user_data_dir = options.user_data_dir.clone();

        let browser = Browser::new(launch_opts).map_err(|e| ScrapeError::LaunchFailed(e.to_string()))?;

        let tab = browser
            .new_tab()
            .map_err(|e| ScrapeError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        Ok(Self { browser, tab })
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Get the underlying Browser instance
    pub fn browser(&self) -> &Browser {
        &self.browser
    }

    /// Navigate and wait for the load event, bounded by `timeout`
    pub fn navigate(&self, url: &str, timeout: Duration) -> Result<()> {
        let started = Instant::now();
        self.tab.set_default_timeout(timeout);

        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| {
                if started.elapsed() >= timeout {
                    ScrapeError::NavigationTimeout(timeout)
                } else {
                    ScrapeError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e))
                }
            })?;

        Ok(())
    }

    /// Wait until the document is complete and no new resource has been
    /// requested for `quiet`. Fails with a timeout once `deadline` passes,
    /// or with [`ScrapeError::Cancelled`] once `cancel` fires.
    pub fn wait_for_network_idle(
        &self,
        quiet: Duration,
        deadline: Instant,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let mut last_count = None;
        let mut last_change = Instant::now();

        loop {
            if cancel.is_cancelled() {
                return Err(ScrapeError::Cancelled);
            }

            let probe = self.probe_idle()?;
            let now = Instant::now();

            if last_count != Some(probe.resources) {
                last_count = Some(probe.resources);
                last_change = now;
            }

            if probe.ready == "complete" && now.duration_since(last_change) >= quiet {
                return Ok(());
            }

            if now >= deadline {
                return Err(ScrapeError::NavigationTimeout(timeout));
            }

            thread::sleep(IDLE_POLL_INTERVAL);
        }
    }

    fn probe_idle(&self) -> Result<IdleProbe> {
        let result = self
            .tab
            .evaluate(IDLE_PROBE_JS, false)
            .map_err(|e| ScrapeError::NavigationFailed(format!("Failed to probe page state: {}", e)))?;

        let json = result
            .value
            .and_then(|value| value.as_str().map(str::to_string))
            .ok_or_else(|| ScrapeError::NavigationFailed("Page state probe returned nothing".to_string()))?;

        serde_json::from_str(&json)
            .map_err(|e| ScrapeError::NavigationFailed(format!("Failed to parse page state: {}", e)))
    }

    /// Capture the first `max_nodes` elements in document order
    pub fn snapshot(&self, max_nodes: usize, html_cap: usize, display_text_cap: usize) -> Result<DomSnapshot> {
        let result = self
            .tab
            .evaluate(&snapshot_expression(max_nodes, html_cap, display_text_cap), false)
            .map_err(|e| ScrapeError::SnapshotFailed(format!("Failed to execute enumeration script: {}", e)))?;

        let json_value = result
            .value
            .ok_or_else(|| ScrapeError::SnapshotFailed("No value returned from enumeration script".to_string()))?;

        // The script returns a JSON string, so it is decoded twice
        let json_str: String = serde_json::from_value(json_value)
            .map_err(|e| ScrapeError::SnapshotFailed(format!("Failed to get JSON string: {}", e)))?;

        DomSnapshot::from_json(&json_str)
    }

    /// Close the tab; the browser process exits when the session is dropped
    pub fn close(&self) -> Result<()> {
        self.tab
            .close(false)
            .map_err(|e| ScrapeError::Internal(format!("Failed to close tab: {}", e)))?;
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            log::debug!("{}", e);
        }
    }
}
