use thiserror::Error;

/// Core error types.
#[derive(Error, Debug)]
pub enum CoreError {
    /// I/O failure while reading local evidence.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// Path being accessed.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// An external verification tool could not be run.
    #[error("{tool} unavailable: {reason}")]
    ToolUnavailable {
        /// Tool name.
        tool: &'static str,
        /// Why it could not be run.
        reason: String,
    },
    /// Schema decoding failed.
    #[error(transparent)]
    Schema(#[from] vp_schemas::SchemaError),
}
