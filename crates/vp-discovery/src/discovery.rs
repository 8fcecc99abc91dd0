//! Live verification of a published artifact.
//!
//! Discovery starts from the artifact's origin: the domain's policy document
//! at `/.well-known/provenance` decides which protocol generation applies.
//! Protocol 1.1 domains serve an event chain per artifact and the chain goes to
//! the offline [`Verifier`]; protocol 1.0 domains serve a projection manifest
//! beside the artifact, which only gets structural checks here.

use serde_json::Value;
use tracing::{debug, info_span, warn, Instrument};
use vp_canonical::{canonicalize_url, CanonicalUrl, Timestamp};
use vp_core::{VerificationResult, VerificationVerdict, Verifier};
use vp_schemas::{
    DomainPolicyDocument, EventChain, EvidencePolicy, ProjectionManifest,
    ARTIFACT_URL_PLACEHOLDER,
};

use crate::client::{ClientConfig, FetchClient};
use crate::error::Result;

/// Path of the domain policy document.
pub const WELL_KNOWN_PATH: &str = "/.well-known/provenance";

/// Resolves and verifies artifacts over HTTP.
///
/// Holds no per-call state; share one instance across tasks. Dropping a
/// pending [`verify_remote_artifact`](Self::verify_remote_artifact) future
/// aborts its in-flight requests.
#[derive(Debug, Clone)]
pub struct DiscoveryClient {
    fetcher: FetchClient,
    verifier: Verifier,
}

impl DiscoveryClient {
    /// Creates a client with the given fetch configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            fetcher: FetchClient::new(config)?,
            verifier: Verifier::new(),
        })
    }

    /// Policy document URL for an artifact's origin.
    pub fn well_known_url(&self, artifact: &CanonicalUrl) -> String {
        format!(
            "{}://{}{}",
            self.fetcher.config().well_known_scheme,
            artifact.authority(),
            WELL_KNOWN_PATH
        )
    }

    /// Discovers and verifies the evidence for `url` as of `evaluated_at`.
    ///
    /// Never fails: every problem is folded into the returned verdict.
    pub async fn verify_remote_artifact(
        &self,
        url: &str,
        evaluated_at: &Timestamp,
    ) -> VerificationResult {
        let artifact = match CanonicalUrl::parse(url) {
            Ok(artifact) => artifact,
            Err(e) => return VerificationResult::failure(VerificationVerdict::InvalidInput, e.to_string()),
        };
        let canonical_url = artifact.to_string();
        let span = info_span!("verify_remote_artifact", artifact_url = %canonical_url);

        async move {
            let well_known_url = self.well_known_url(&artifact);
            let document = match self.fetcher.fetch_json(&well_known_url).await {
                Ok(document) => document,
                Err(e) if e.is_not_found() => {
                    debug!(url = %well_known_url, "domain publishes no policy");
                    return VerificationResult::failure(
                        VerificationVerdict::Undeclared,
                        format!("missing {}", well_known_url),
                    );
                }
                Err(e) => {
                    warn!(url = %well_known_url, error = %e, "domain policy unavailable");
                    return VerificationResult::failure(
                        VerificationVerdict::Unverifiable,
                        format!("domain policy fetch failed: {}", e),
                    );
                }
            };

            let policy_document = match DomainPolicyDocument::from_value(&document) {
                Ok(policy_document) => policy_document,
                Err(e) => {
                    return VerificationResult::failure(
                        VerificationVerdict::Unverifiable,
                        format!("domain policy fetch failed: {}", e),
                    );
                }
            };
            debug!(spec_version = policy_document.spec_version(), "domain policy loaded");

            match &policy_document {
                DomainPolicyDocument::EventChain {
                    policy,
                    events_by_artifact,
                    ..
                } => {
                    self.verify_event_chain(
                        policy,
                        events_by_artifact.as_deref(),
                        &canonical_url,
                        evaluated_at,
                    )
                    .await
                }
                DomainPolicyDocument::Legacy {
                    policy,
                    manifest_suffix,
                    ..
                } => {
                    self.verify_projection(policy, manifest_suffix, &canonical_url)
                        .await
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn verify_event_chain(
        &self,
        policy: &EvidencePolicy,
        template: Option<&str>,
        canonical_url: &str,
        evaluated_at: &Timestamp,
    ) -> VerificationResult {
        let Some(feed_url) = template.and_then(|t| events_url(t, canonical_url)) else {
            return VerificationResult::failure(
                VerificationVerdict::Unverifiable,
                "events_by_artifact URL template missing",
            );
        };

        let document = match self.fetcher.fetch_json(&feed_url).await {
            Ok(document) => document,
            Err(e) => {
                warn!(url = %feed_url, error = %e, "event feed unavailable");
                return VerificationResult::failure(
                    VerificationVerdict::Unverifiable,
                    format!("events fetch failed: {}", e),
                );
            }
        };

        let chain = EventChain::from_value(document);
        debug!(events = chain.len(), "event chain fetched");
        self.verifier.verify_chain(policy, &chain, evaluated_at)
    }

    async fn verify_projection(
        &self,
        policy: &EvidencePolicy,
        manifest_suffix: &str,
        canonical_url: &str,
    ) -> VerificationResult {
        let manifest_url = format!("{}{}", canonical_url, manifest_suffix);
        let document = match self.fetcher.fetch_json(&manifest_url).await {
            Ok(document) => document,
            Err(e) => {
                warn!(url = %manifest_url, error = %e, "manifest unavailable");
                return VerificationResult::failure(
                    VerificationVerdict::Unverifiable,
                    format!("manifest fetch failed: {}", e),
                );
            }
        };
        check_projection(policy, &document, canonical_url)
    }
}

/// Substitutes the percent-encoded artifact URL into an events template.
///
/// Returns `None` when the template has no placeholder.
pub fn events_url(template: &str, canonical_url: &str) -> Option<String> {
    if !template.contains(ARTIFACT_URL_PLACEHOLDER) {
        return None;
    }
    Some(template.replace(
        ARTIFACT_URL_PLACEHOLDER,
        &urlencoding::encode(canonical_url),
    ))
}

/// Structural checks on a protocol 1.0 projection manifest.
pub fn check_projection(
    policy: &EvidencePolicy,
    document: &Value,
    canonical_url: &str,
) -> VerificationResult {
    let manifest = match ProjectionManifest::from_value(document) {
        Ok(manifest) => manifest,
        Err(e) => return VerificationResult::failure(VerificationVerdict::InvalidInput, e.to_string()),
    };

    // An unparseable claimed URL can never equal a parsed one.
    let claimed = canonicalize_url(&manifest.artifact_url).ok();
    if claimed.as_deref() != Some(canonical_url) {
        return VerificationResult::failure(
            VerificationVerdict::InvalidInput,
            "manifest artifact_url mismatch",
        );
    }

    if !manifest.has_valid_content_hash() {
        return VerificationResult::failure(
            VerificationVerdict::InvalidInput,
            "manifest content_sha256 is not valid hex sha256",
        );
    }

    if policy.signature_required {
        if !manifest.has_signature {
            return VerificationResult::failure(
                VerificationVerdict::PolicyViolation,
                "signature required but missing",
            );
        }
        return VerificationResult::failure(
            VerificationVerdict::Unverifiable,
            "cryptographic signature verification is not implemented for v1.0 projection manifests",
        );
    }

    VerificationResult::verified()
}
