//! Offline verification for the Verified Provenance protocol.
//!
//! This crate provides:
//! - Event chain verification: canonical ordering, hash linkage, event hash
//!   recomputation, policy compliance and active-attestation resolution
//! - The six-way verdict model and the JSON report shape
//! - Article-level authorship manifest checks with pluggable collaborators
//!
//! Core invariants:
//! - Canonical order depends only on `(recorded_at, event_id)`
//! - Every call yields exactly one verdict; nothing is escalated afterwards
//! - Verification is deterministic and holds no state between calls
//!
#![deny(missing_docs)]

/// Article-level authorship manifest checks.
pub mod authorship;
/// Error types for core operations.
pub mod errors;
/// Report document emitted for each verification.
pub mod report;
/// Chain verification and verdict types.
pub mod verification;

pub use authorship::{
    check_authorship, AuthorshipInput, AuthorshipReport, DetachedSignatureVerifier, Finding,
    FindingLevel, GitHeadReader, GpgSignatureVerifier, HeadReader,
};
pub use errors::CoreError;
pub use report::{VerificationReport, REPORT_SPEC_VERSION};
pub use verification::{VerificationResult, VerificationVerdict, Verifier};
