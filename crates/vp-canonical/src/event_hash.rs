//! Event hash computation.
//!
//! An event's hash is `sha256(canonical_json(event \ {event_hash}))`, rendered
//! as lowercase hex. The `event_hash` member is removed before encoding so
//! that the declared commitment can live inside the object it commits to.

use crate::canonicalizer::{canonical_json, CanonicalizationError};
use crate::digest::HexDigest;
use serde::Serialize;
use serde_json::Value;

/// Name of the self-referential member excluded from the hash preimage.
pub const EVENT_HASH_FIELD: &str = "event_hash";

/// Computes the event hash for an event.
///
/// The event is serialized to JSON, its top-level `event_hash` member (if
/// any) is dropped, and the remainder is canonicalized and hashed. The
/// caller's value is never modified.
///
/// # Example
///
/// ```rust
/// use vp_canonical::compute_event_hash;
/// use serde_json::json;
///
/// let event = json!({"event_id": "e1", "event_hash": "ignored"});
/// let without = json!({"event_id": "e1"});
/// assert_eq!(compute_event_hash(&event)?, compute_event_hash(&without)?);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// # Errors
///
/// Returns [`EventHashError`] if serialization or canonicalization fails.
pub fn compute_event_hash<T: Serialize>(event: &T) -> Result<HexDigest, EventHashError> {
    let mut value: Value =
        serde_json::to_value(event).map_err(|e| EventHashError::Serialization(e.to_string()))?;

    if let Value::Object(map) = &mut value {
        map.remove(EVENT_HASH_FIELD);
    }

    let bytes = canonical_json(&value)?;
    Ok(HexDigest::of(&bytes))
}

/// Returns true when the recomputed hash equals `claimed`.
pub fn verify_event_hash<T: Serialize>(event: &T, claimed: &str) -> Result<bool, EventHashError> {
    Ok(compute_event_hash(event)? == claimed)
}

/// Error during event hash computation.
#[derive(thiserror::Error, Debug)]
pub enum EventHashError {
    /// Serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// Canonicalization failed.
    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}
