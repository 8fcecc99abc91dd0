//! Event chain verification.

use serde::Serialize;
use std::fmt;
use tracing::{debug, debug_span, warn};
use vp_canonical::{compute_event_hash, Timestamp, ValidationError};
use vp_schemas::{ChainEvent, EventChain, EvidencePolicy};

use crate::report::VerificationReport;

/// Verification verdict: the single outcome of one verification call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerificationVerdict {
    /// Evidence is well-formed, consistent and satisfies the domain policy.
    Verified,
    /// The domain publishes no provenance policy.
    Undeclared,
    /// Verification could not be completed (network, unimplemented crypto).
    Unverifiable,
    /// A timestamp, URL or manifest field is malformed.
    InvalidInput,
    /// Structural or hash-linkage violation in the event chain.
    InvalidChain,
    /// Evidence required by the domain policy is missing.
    PolicyViolation,
}

impl VerificationVerdict {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "VERIFIED",
            Self::Undeclared => "UNDECLARED",
            Self::Unverifiable => "UNVERIFIABLE",
            Self::InvalidInput => "INVALID_INPUT",
            Self::InvalidChain => "INVALID_CHAIN",
            Self::PolicyViolation => "POLICY_VIOLATION",
        }
    }
}

impl fmt::Display for VerificationVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal verdict plus everything learned on the way to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    /// Verdict.
    pub verdict: VerificationVerdict,
    /// Human-readable diagnostics.
    pub errors: Vec<String>,
    /// Number of events examined.
    pub checked_events: usize,
    /// Attestation in force at the evaluation time, if any.
    pub active_event_id: Option<String>,
}

impl VerificationResult {
    /// A clean `VERIFIED` result.
    pub fn verified() -> Self {
        Self {
            verdict: VerificationVerdict::Verified,
            errors: Vec::new(),
            checked_events: 0,
            active_event_id: None,
        }
    }

    /// A result carrying a single diagnostic.
    pub fn failure(verdict: VerificationVerdict, error: impl Into<String>) -> Self {
        Self {
            verdict,
            errors: vec![error.into()],
            checked_events: 0,
            active_event_id: None,
        }
    }

    /// Sets the checked-event count.
    pub fn with_checked(mut self, checked_events: usize) -> Self {
        self.checked_events = checked_events;
        self
    }

    /// True only for `VERIFIED`.
    pub fn is_verified(&self) -> bool {
        self.verdict == VerificationVerdict::Verified
    }

    /// Renders the result for output.
    pub fn to_report(
        &self,
        artifact_url: Option<String>,
        evaluated_at: &Timestamp,
    ) -> VerificationReport {
        VerificationReport::new(self, artifact_url, *evaluated_at)
    }
}

/// Offline verifier for event chains.
///
/// Holds no state between calls; one instance can serve any number of
/// concurrent verifications.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verifier;

impl Verifier {
    /// Creates a verifier.
    pub fn new() -> Self {
        Self
    }

    /// Verifies `chain` against `policy` as of `evaluated_at`.
    ///
    /// Events are put in canonical order by `(recorded_at, event_id)`, so the
    /// order in which a feed publishes them has no effect. The walk stops at
    /// the first fatal problem; the missing cryptographic check for a present
    /// signature is accumulated instead and downgrades an otherwise clean
    /// chain to `UNVERIFIABLE`.
    pub fn verify_chain(
        &self,
        policy: &EvidencePolicy,
        chain: &EventChain,
        evaluated_at: &Timestamp,
    ) -> VerificationResult {
        let span = debug_span!("verify_chain", events = chain.len());
        let _guard = span.enter();

        if chain.is_empty() {
            return VerificationResult::failure(
                VerificationVerdict::InvalidChain,
                "events array missing or empty",
            );
        }

        let mut ordered: Vec<&ChainEvent> = chain.events.iter().collect();
        ordered.sort_by_cached_key(|event| event.ordering_key());

        let mut prev_hash: Option<String> = None;
        let mut active_event_id = None;
        let mut diagnostics = Vec::new();

        for (index, event) in ordered.iter().enumerate() {
            let checked = index + 1;
            if !event.is_object() {
                return VerificationResult::failure(
                    VerificationVerdict::InvalidChain,
                    "event is not an object",
                )
                .with_checked(index);
            }
            let (Some(event_id), Some(event_hash)) = (event.event_id(), event.event_hash()) else {
                return VerificationResult::failure(
                    VerificationVerdict::InvalidChain,
                    "event_id or event_hash missing",
                )
                .with_checked(index);
            };

            if let Err(reason) = check_link(event, &event_id, prev_hash.as_deref()) {
                warn!(event_id = %event_id, "{}", reason);
                return VerificationResult::failure(VerificationVerdict::InvalidChain, reason)
                    .with_checked(checked);
            }

            if event.is_full_payload() {
                if let Err(reason) = check_event_hash(event, &event_id, &event_hash) {
                    warn!(event_id = %event_id, "{}", reason);
                    return VerificationResult::failure(VerificationVerdict::InvalidChain, reason)
                        .with_checked(checked);
                }
            }

            if event.event_type().is_attestation() {
                if let Err(reason) = check_policy(policy, event, &event_id) {
                    warn!(event_id = %event_id, "{}", reason);
                    return VerificationResult::failure(VerificationVerdict::PolicyViolation, reason)
                        .with_checked(checked);
                }
                if policy.signature_required && event.has_signature() {
                    diagnostics.push(format!(
                        "cryptographic signature verification not implemented for {}",
                        event_id
                    ));
                }
            }

            match is_in_force(event, evaluated_at) {
                Ok(true) => active_event_id = Some(event_id.clone()),
                Ok(false) => {}
                Err(e) => {
                    return VerificationResult::failure(VerificationVerdict::InvalidInput, e.to_string())
                        .with_checked(checked);
                }
            }

            debug!(event_id = %event_id, "event linked");
            prev_hash = Some(event_hash);
        }

        let verdict = if diagnostics.is_empty() {
            VerificationVerdict::Verified
        } else {
            VerificationVerdict::Unverifiable
        };
        VerificationResult {
            verdict,
            errors: diagnostics,
            checked_events: ordered.len(),
            active_event_id,
        }
    }
}

fn check_link(event: &ChainEvent, event_id: &str, prev_hash: Option<&str>) -> Result<(), String> {
    match prev_hash {
        None if !event.has_null_link() => Err(format!(
            "genesis event {} has non-null prev_event_hash",
            event_id
        )),
        None => Ok(()),
        Some(expected) if !event.links_to(expected) => {
            Err(format!("prev_event_hash mismatch at {}", event_id))
        }
        Some(_) => Ok(()),
    }
}

fn check_event_hash(event: &ChainEvent, event_id: &str, declared: &str) -> Result<(), String> {
    match compute_event_hash(event.as_value()) {
        Ok(recomputed) if recomputed == declared => Ok(()),
        Ok(_) => Err(format!("event_hash mismatch at {}", event_id)),
        Err(e) => Err(format!("event_hash recomputation failed at {}: {}", event_id, e)),
    }
}

fn check_policy(policy: &EvidencePolicy, event: &ChainEvent, event_id: &str) -> Result<(), String> {
    if policy.signature_required && !event.has_signature() {
        return Err(format!("signature missing for required event {}", event_id));
    }
    if policy.timestamp_required && !event.has_timestamp() {
        return Err(format!("timestamp missing for required event {}", event_id));
    }
    if policy.transparency_anchoring_required && !event.has_transparency_entry() {
        return Err(format!(
            "transparency proof missing for required event {}",
            event_id
        ));
    }
    Ok(())
}

/// An event is in force once both its effective and recorded instants have
/// passed. Events lacking either are never in force.
fn is_in_force(event: &ChainEvent, evaluated_at: &Timestamp) -> Result<bool, ValidationError> {
    let (Some(effective_at), Some(recorded_at)) = (event.effective_at(), event.recorded_at()) else {
        return Ok(false);
    };
    let effective_at = Timestamp::parse(&effective_at)?;
    let recorded_at = Timestamp::parse(&recorded_at)?;
    Ok(effective_at <= *evaluated_at && recorded_at <= *evaluated_at)
}
