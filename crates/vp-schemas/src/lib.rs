//! Wire schemas for the Verified Provenance protocol.
//!
//! This crate decodes the documents a verifier consumes: domain policy
//! documents, event chains, legacy projection manifests and article-level
//! authorship manifests. Loosely typed members are resolved here so the
//! verification engine works with explicit types.

#![deny(missing_docs)]

pub mod chain;
pub mod errors;
pub mod event;
pub mod manifest;
pub mod policy;
pub mod value;

pub use chain::EventChain;
pub use errors::SchemaError;
pub use event::{ChainEvent, EventType, ATTESTATION_ISSUED, ATTESTATION_SUPERSEDED};
pub use manifest::{Anchor, AuthorshipManifest, ContentCommitment, ProjectionManifest, Timeline};
pub use policy::{
    DomainPolicyDocument, EvidencePolicy, ARTIFACT_URL_PLACEHOLDER, DEFAULT_MANIFEST_SUFFIX,
    DEFAULT_SPEC_VERSION,
};
pub use value::is_truthy;
