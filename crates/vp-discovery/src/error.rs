//! Error types for evidence fetching.
//!
//! Every variant maps to an `UNVERIFIABLE` verdict except `Status(404)` on
//! the well-known document, which the discovery flow reports as
//! `UNDECLARED`.

use thiserror::Error;

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, FetchError>;

/// Failures while fetching a JSON document.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// The request did not complete within the configured timeout.
    #[error("request timeout after {timeout_seconds}s")]
    Timeout {
        /// Configured timeout in seconds.
        timeout_seconds: u64,
    },

    /// Connection or transport failure.
    #[error("network error: {message}")]
    Network {
        /// Transport error message.
        message: String,
    },

    /// The body was not valid JSON.
    #[error("invalid JSON response: {message}")]
    Decode {
        /// Parser message.
        message: String,
    },

    /// The HTTP client could not be built.
    #[error("invalid client configuration: {message}")]
    Configuration {
        /// Builder error message.
        message: String,
    },
}

impl FetchError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// True for a 404 response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}
