//! Schema decoding errors.

use thiserror::Error;

/// Errors raised while decoding wire documents.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The document is not a JSON object.
    #[error("{0} is not a JSON object")]
    NotAnObject(&'static str),
    /// The document could not be parsed as JSON.
    #[error("invalid JSON in {document}: {source}")]
    Json {
        /// Which document failed.
        document: &'static str,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}
