//! Canonical encoding primitives for Verified Provenance documents.
//!
//! Everything that participates in hashing or cross-implementation
//! comparison lives in this crate:
//! - canonical JSON (sorted keys, compact separators, raw UTF-8)
//! - SHA-256 hex digests
//! - artifact URL canonicalization
//! - event hash computation
//! - the golden-vector conformance runner
//!
#![deny(missing_docs)]

/// RFC 3986 style artifact URL canonicalization.
pub mod artifact_url;
/// Canonical JSON encoding.
pub mod canonicalizer;
/// Golden-vector conformance runner.
pub mod conformance;
/// SHA-256 hex digests.
pub mod digest;
/// Event hash computation.
pub mod event_hash;
/// RFC3339 timestamps normalized to UTC.
pub mod timestamp;
/// Validation helpers used by canonical types.
pub mod validation;

pub use artifact_url::{canonicalize_url, CanonicalUrl, UrlError};
pub use canonicalizer::{
    canonical_bytes_of, canonical_json, canonical_json_string, CanonicalizationError,
};
pub use conformance::{run_vectors, ConformanceError, ConformanceReport, VectorFailure, VectorSet};
pub use digest::{sha256_hex, sha256_hex_reader, HexDigest};
pub use event_hash::{compute_event_hash, verify_event_hash, EventHashError, EVENT_HASH_FIELD};
pub use timestamp::Timestamp;
pub use validation::ValidationError;
