//! # xpath-scraper
//!
//! Extracts a stable XPath locator and a UI-role category for every element
//! of a rendered web page, for test-automation authors.
//!
//! ## Features
//!
//! - **HTTP API**: `POST /api/scrape-xpaths` with `{"url": "..."}`
//! - **Browser Navigation**: Headless Chrome per job, with network-idle wait and hard timeouts
//! - **XPath Resolution**: Id-anchored or ancestor-indexed locators, unique within a page
//! - **Classification**: Deterministic rule table, or a remote label service with fallback
//! - **Aggregation**: Category buckets in a fixed order, document order inside each bucket
//!
//! ## Running the Server
//!
//! ```bash
//! # Rule-based classification on port 5000
//! cargo run --bin xpath-scraper
//!
//! # Remote label service
//! HF_API_KEY=... cargo run --bin xpath-scraper -- --classifier remote
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use xpath_scraper::{ChromeNavigator, JobController, LaunchOptions, ScrapeConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> xpath_scraper::Result<()> {
//! let config = ScrapeConfig::new().max_nodes(50);
//! let navigator = ChromeNavigator::new(LaunchOptions::default(), config.network_idle);
//! let controller = JobController::new(Arc::new(navigator), config)?;
//!
//! let job = controller.run("https://example.com").await;
//! for record in job.records() {
//!     println!("{} [{}] {}", record.xpath, record.category, record.display_name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Navigator adapter over headless Chrome
//! - [`dom`]: DOM snapshot, XPath resolution and metadata extraction
//! - [`classify`]: Category taxonomy and classification strategies
//! - [`aggregate`]: Category buckets and summary counts
//! - [`job`]: Job state machine and orchestration
//! - [`config`]: Job limits, timeouts and classifier selection
//! - [`error`]: Error types and result aliases
//! - [`http`]: axum router (requires the `server` feature)

pub mod aggregate;
pub mod browser;
pub mod classify;
pub mod config;
pub mod dom;
pub mod error;
pub mod job;

#[cfg(feature = "server")]
pub mod http;

pub use aggregate::{Aggregation, CategoryBucket, ElementRecord, Summary};
pub use browser::{BrowserSession, ChromeNavigator, LaunchOptions, Navigator, PageHandle};
pub use classify::{Category, Classifier, ClassifierKind, RemoteClassifierConfig};
pub use config::ScrapeConfig;
pub use dom::{DomNode, DomSnapshot, ElementMetadata, XPathResolver};
pub use error::{ClassificationError, ErrorKind, Result, ScrapeError};
pub use job::{JobController, JobStats, JobStatus, ScrapeJob};
