//! CLI error types.

use thiserror::Error;

/// Errors that abort a command before it can produce a verdict.
#[derive(Error, Debug)]
pub enum CliError {
    /// Input file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Path, or `<stdin>`.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Input was not valid JSON.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        /// Path, or `<stdin>`.
        path: String,
        /// Parse error.
        source: serde_json::Error,
    },
    /// Configuration could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}
