use std::time::Duration;
use thiserror::Error;

/// Errors that can end a scrape job or skip a single node
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScrapeError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Navigation timed out after {0:?}")]
    NavigationTimeout(Duration),

    #[error("Failed to snapshot DOM: {0}")]
    SnapshotFailed(String),

    #[error("Failed to extract node {index}: {reason}")]
    Extraction { index: usize, reason: String },

    #[error("Scrape cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse error classes reported to callers and job logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NavigationError,
    ExtractionError,
    Internal,
}

impl ScrapeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScrapeError::InvalidInput(_) => ErrorKind::InvalidInput,
            ScrapeError::LaunchFailed(_)
            | ScrapeError::NavigationFailed(_)
            | ScrapeError::NavigationTimeout(_) => ErrorKind::NavigationError,
            ScrapeError::Extraction { .. } => ErrorKind::ExtractionError,
            ScrapeError::SnapshotFailed(_) | ScrapeError::Cancelled | ScrapeError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }
}

/// Failure of a single remote label lookup. Never fatal for a job.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassificationError {
    #[error("Label service request failed: {0}")]
    Transport(String),

    #[error("Label service timed out after {0:?}")]
    Timeout(Duration),

    #[error("Label service returned status {0}")]
    Status(u16),

    #[error("Malformed label response: {0}")]
    MalformedResponse(String),

    #[error("Label '{0}' is not a known category")]
    UnknownLabel(String),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
