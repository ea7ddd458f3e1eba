//! Marketplace API errors.

use thiserror::Error;

/// Errors that can occur when talking to the marketplace backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed before a response arrived (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend reported that the resource or query has no match.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the backend.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Non-success status other than 404 and 429.
    #[error("HTTP {status}: {message}")]
    Status {
        /// Response status code.
        status: u16,
        /// Error text from the body, or a truncated body.
        message: String,
    },

    /// The response body did not match the expected schema.
    #[error("Malformed response from {endpoint}: {reason}")]
    Malformed {
        /// Endpoint path that produced the payload.
        endpoint: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl ApiError {
    /// Whether the backend said there is nothing to return.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
