use std::time::Duration;
use thiserror::Error;

/// Errors that can end a scrape run
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Failed to resolve contest: {0}")]
    Resolution(String),

    #[error("Failed to start browser session: {0}")]
    Session(String),

    #[error("Navigation to {url} timed out after {elapsed:?}")]
    NavigationTimeout { url: String, elapsed: Duration },

    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionFailure),

    #[error("Scrape worker aborted: {0}")]
    Aborted(String),
}

impl ScrapeError {
    /// Stable failure class, safe to show to HTTP clients
    pub fn kind(&self) -> &'static str {
        match self {
            ScrapeError::Resolution(_) => "resolution",
            ScrapeError::Session(_) => "session",
            ScrapeError::NavigationTimeout { .. } => "navigation_timeout",
            ScrapeError::Navigation { .. } => "navigation",
            ScrapeError::Extraction(_) => "extraction",
            ScrapeError::Aborted(_) => "aborted",
        }
    }
}

/// Sub-kinds of a failed table extraction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    /// Neither table selector matched an element
    #[error("table not found")]
    TableNotFound,

    /// A selector matched but the table body has no rows
    #[error("empty table")]
    EmptyTable,

    #[error("row script failed: {0}")]
    Script(String),
}

/// Teardown failure. Only ever logged, so it never hides the error that ended a run.
#[derive(Debug, Error)]
#[error("Failed to release browser session: {0}")]
pub struct ReleaseError(pub String);

/// Result type alias for scrape operations
pub type Result<T> = std::result::Result<T, ScrapeError>;
