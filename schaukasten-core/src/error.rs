//! Error types for schaukasten.

use thiserror::Error;

/// Errors that can occur while turning a calendar feed into an event span.
#[derive(Error, Debug)]
pub enum SchaukastenError {
    /// The fetched text is not a calendar document at all.
    #[error("ICS document error: {0}")]
    Document(String),

    /// A single entry's RRULE could not be parsed or evaluated.
    ///
    /// Recovered inside the materializer: the entry is skipped and the rest of
    /// the document is still processed.
    #[error("Invalid RRULE for event '{uid}': {reason}")]
    RecurrenceRule { uid: String, reason: String },

    #[error("Failed to fetch calendar from {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("Invalid date window: {0}")]
    InvalidWindow(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for schaukasten operations.
pub type SchaukastenResult<T> = Result<T, SchaukastenError>;
