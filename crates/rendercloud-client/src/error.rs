//! Client error types.

use thiserror::Error;

use crate::identifiers::IdKind;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// An identifier did not carry the prefix its resource requires.
    ///
    /// Raised before any request is built.
    #[error("Invalid {} ID format. Expected format: {}xxxxx, got: {value}", kind.label(), kind.prefix())]
    InvalidIdentifier {
        /// Which identifier family was expected.
        kind: IdKind,
        /// The offending value.
        value: String,
    },

    /// The provider answered HTTP 429.
    #[error("Rate limit exceeded. Retry after {reset} seconds.")]
    RateLimited {
        /// Value of the `ratelimit-reset` header, or `"unknown"`.
        reset: String,
    },

    /// The provider answered with any other non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the provider.
        message: String,
    },

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A path segment would be resolved away as `.` or `..`.
    #[error("Invalid request path: {0}")]
    InvalidPath(String),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if this is an authentication error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Api { status: 401 | 403, .. })
    }

    /// Check if this is a rate limit error.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Error::RateLimited { .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }

    /// Check if the request never left the client because an identifier was malformed.
    pub fn is_invalid_identifier(&self) -> bool {
        matches!(self, Error::InvalidIdentifier { .. })
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the provider.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    pub message: String,
}
