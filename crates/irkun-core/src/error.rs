//! Error types for data operations.
//!
//! This module defines [`DataError`] which covers all error cases that can occur
//! when fetching, parsing, normalizing, or storing disclosure data.

use thiserror::Error;

/// Errors that can occur during data operations.
#[derive(Error, Debug)]
pub enum DataError {
    /// Connection-level failure (refused, reset, TLS handshake, connect timeout).
    ///
    /// This is the only class of error that is retried.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Other network failures (read timeouts, truncated bodies, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// The upstream service answered with an error status.
    #[error("HTTP {status} from {url}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Requested URL, without credentials.
        url: String,
    },

    /// Rate limit exceeded by a provider.
    #[error("Rate limited by {provider}: retry after {retry_after:?}")]
    RateLimited {
        /// The provider that rate limited the request.
        provider: String,
        /// Suggested time to wait before retrying.
        retry_after: Option<std::time::Duration>,
    },

    /// The API answered 200 but reported a failure in its own metadata.
    #[error("API error: {0}")]
    Api(String),

    /// Error parsing data from a provider.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The XBRL instance is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(String),

    /// The document archive could not be read.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Missing or invalid configuration (API keys, paths).
    #[error("Configuration error: {0}")]
    Config(String),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A date range whose start is after its end.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date of the range
        start: String,
        /// End date of the range
        end: String,
    },

    /// The company id is not in the registry.
    #[error("Unknown company: {0}")]
    UnknownCompany(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

impl DataError {
    /// Returns true for failures worth retrying with backoff.
    ///
    /// Only connection-level failures qualify; HTTP error statuses,
    /// including 429, propagate immediately.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_))
    }
}

/// Result type alias using [`DataError`].
pub type Result<T> = std::result::Result<T, DataError>;
