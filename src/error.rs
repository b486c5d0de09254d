//! Error types for feed-scraper.
//!
//! The variants mirror the failure modes of scraping a live, re-rendering
//! page. Only `FatalSetup` is meant to end a run; everything else is
//! contained at the field, post, or slot level by the caller.

/// Error type for page automation and extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An expected UI region was not found.
    #[error("Element not found: {0}")]
    ElementAbsent(String),

    /// The element handle was invalidated by a re-render.
    #[error("Stale element: {0}")]
    ElementUnstable(String),

    /// The element is present but cannot be interacted with.
    #[error("Element not interactable: {0}")]
    ElementBlocked(String),

    /// Text was present but did not match the expected format.
    #[error("Failed to parse {what} from {input:?}")]
    ParseFailure {
        /// Which value was being parsed.
        what: &'static str,
        /// The offending input.
        input: String,
    },

    /// The feed container was never found.
    #[error("Feed setup failed: {0}")]
    FatalSetup(String),

    /// Writing CSV output failed.
    #[error("CSV output failed: {0}")]
    Csv(#[from] csv::Error),

    /// Reading or writing a file failed.
    #[error("I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Options or JSON output could not be (de)serialized.
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error is a missing-element condition.
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::ElementAbsent(_))
    }

    /// Whether this error is a stale-handle condition.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::ElementUnstable(_))
    }
}

/// Result type alias for feed-scraper operations.
pub type Result<T> = std::result::Result<T, Error>;
