use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error as ThisError;

/// Why a cycle was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    Transport,
    Timeout,
    Format,
}

/// Failures while fetching or parsing the lot page. All of them skip the cycle.
#[derive(ThisError, Debug)]
pub enum ScraperError {
    #[error("Request timed out: {0}")]
    Timeout(reqwest::Error),
    #[error("Fetch error: {0}")]
    Transport(reqwest::Error),
    #[error("Failed to get {url}: status {status}")]
    Status { status: StatusCode, url: String },
    #[error("Page not formatted as expected: {0}")]
    Format(String),
    #[error("Selector error: {0}")]
    SelectorError(String),
}

impl From<reqwest::Error> for ScraperError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err)
        } else {
            Self::Transport(err)
        }
    }
}

impl ScraperError {
    pub fn reason(&self) -> FailureReason {
        match self {
            Self::Timeout(_) => FailureReason::Timeout,
            Self::Transport(_) | Self::Status { .. } => FailureReason::Transport,
            Self::Format(_) | Self::SelectorError(_) => FailureReason::Format,
        }
    }
}

/// Failures writing to or reading from the observation store. Never swallowed.
#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("SqliteConnectionError: {0}")]
    SqliteConnectionError(#[from] rusqlite::Error),
    #[error("Failed to create database directory {path}: {source}")]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(ThisError, Debug)]
pub enum MonitorError {
    #[error(transparent)]
    Scraper(#[from] ScraperError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
