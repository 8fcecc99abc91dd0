//! Domain policy documents published at `/.well-known/provenance`.

use serde::Serialize;
use serde_json::Value;

use crate::errors::SchemaError;
use crate::value::{is_truthy, scalar_text};

/// Suffix appended to an artifact URL to locate its legacy manifest.
pub const DEFAULT_MANIFEST_SUFFIX: &str = ".provenance.json";
/// Spec version assumed when a document does not declare one.
pub const DEFAULT_SPEC_VERSION: &str = "1.0";
/// Placeholder substituted in the `events_by_artifact` template.
pub const ARTIFACT_URL_PLACEHOLDER: &str = "{artifact_url}";

/// Evidence a domain requires on its attestations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvidencePolicy {
    /// Attestations must carry `signature.value`.
    pub signature_required: bool,
    /// Attestations must carry `timestamp.value`.
    pub timestamp_required: bool,
    /// Attestations must carry `transparency.entry_id`.
    pub transparency_anchoring_required: bool,
}

impl EvidencePolicy {
    /// Reads the `policy` member of a policy document. A missing or
    /// non-object member requires nothing.
    pub fn from_document(document: &Value) -> Self {
        let Some(policy) = document.get("policy").filter(|p| p.is_object()) else {
            return Self::default();
        };
        let flag = |name: &str| policy.get(name).is_some_and(is_truthy);
        Self {
            signature_required: flag("signature_required"),
            timestamp_required: flag("timestamp_required"),
            transparency_anchoring_required: flag("transparency_anchoring_required"),
        }
    }
}

/// A domain's declared provenance practice, one variant per protocol generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainPolicyDocument {
    /// Protocol 1.1 series: evidence is an event chain served per artifact.
    EventChain {
        /// Declared spec version.
        spec_version: String,
        /// Evidence requirements.
        policy: EvidencePolicy,
        /// `evidence_api.events_by_artifact` template, if it is a string.
        events_by_artifact: Option<String>,
    },
    /// Protocol 1.0: evidence is a manifest next to each artifact.
    Legacy {
        /// Declared spec version (defaults to `1.0`).
        spec_version: String,
        /// Evidence requirements.
        policy: EvidencePolicy,
        /// Manifest location suffix.
        manifest_suffix: String,
    },
}

impl DomainPolicyDocument {
    /// Decodes a policy document.
    ///
    /// A document selects the event-chain protocol when its `spec_version`
    /// starts with `1.1` and it has an `evidence_api` object; every other
    /// document is treated as legacy.
    pub fn from_value(document: &Value) -> Result<Self, SchemaError> {
        if !document.is_object() {
            return Err(SchemaError::NotAnObject("domain policy document"));
        }

        let spec_version = document
            .get("spec_version")
            .and_then(scalar_text)
            .unwrap_or_else(|| DEFAULT_SPEC_VERSION.to_string());
        let policy = EvidencePolicy::from_document(document);

        let evidence_api = document.get("evidence_api").filter(|v| v.is_object());
        if let (true, Some(api)) = (spec_version.starts_with("1.1"), evidence_api) {
            let events_by_artifact = api
                .get("events_by_artifact")
                .and_then(Value::as_str)
                .map(str::to_string);
            return Ok(Self::EventChain {
                spec_version,
                policy,
                events_by_artifact,
            });
        }

        let manifest_suffix = document
            .get("artifact_discovery")
            .and_then(|d| d.get("suffix"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_MANIFEST_SUFFIX)
            .to_string();
        Ok(Self::Legacy {
            spec_version,
            policy,
            manifest_suffix,
        })
    }

    /// Parses and decodes a policy document from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text).map_err(|source| SchemaError::Json {
            document: "domain policy document",
            source,
        })?;
        Self::from_value(&value)
    }

    /// Declared spec version.
    pub fn spec_version(&self) -> &str {
        match self {
            Self::EventChain { spec_version, .. } | Self::Legacy { spec_version, .. } => {
                spec_version
            }
        }
    }

    /// Evidence requirements.
    pub fn policy(&self) -> &EvidencePolicy {
        match self {
            Self::EventChain { policy, .. } | Self::Legacy { policy, .. } => policy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn v11_with_evidence_api_selects_event_chain() {
        let doc = DomainPolicyDocument::from_value(&json!({
            "spec_version": "1.1.0",
            "policy": {"signature_required": true},
            "evidence_api": {"events_by_artifact": "https://e.example/events?u={artifact_url}"}
        }))
        .unwrap();
        assert_eq!(
            doc,
            DomainPolicyDocument::EventChain {
                spec_version: "1.1.0".into(),
                policy: EvidencePolicy {
                    signature_required: true,
                    ..Default::default()
                },
                events_by_artifact: Some("https://e.example/events?u={artifact_url}".into()),
            }
        );
    }

    #[test]
    fn v11_without_evidence_api_falls_back_to_legacy() {
        let doc = DomainPolicyDocument::from_value(&json!({"spec_version": "1.1"})).unwrap();
        assert!(matches!(doc, DomainPolicyDocument::Legacy { .. }));
    }

    #[test]
    fn legacy_defaults() {
        let doc = DomainPolicyDocument::from_value(&json!({})).unwrap();
        assert_eq!(doc.spec_version(), "1.0");
        assert_eq!(
            doc,
            DomainPolicyDocument::Legacy {
                spec_version: "1.0".into(),
                policy: EvidencePolicy::default(),
                manifest_suffix: DEFAULT_MANIFEST_SUFFIX.into(),
            }
        );
    }

    #[test]
    fn legacy_custom_suffix_and_numeric_version() {
        let doc = DomainPolicyDocument::from_value(&json!({
            "spec_version": 1.0,
            "artifact_discovery": {"suffix": ".vp.json"}
        }))
        .unwrap();
        assert_eq!(doc.spec_version(), "1.0");
        assert!(matches!(
            doc,
            DomainPolicyDocument::Legacy { ref manifest_suffix, .. } if manifest_suffix == ".vp.json"
        ));
    }

    #[test]
    fn policy_flags_use_truthiness() {
        let policy = EvidencePolicy::from_document(&json!({
            "policy": {"signature_required": 1, "timestamp_required": "", "transparency_anchoring_required": "yes"}
        }));
        assert!(policy.signature_required);
        assert!(!policy.timestamp_required);
        assert!(policy.transparency_anchoring_required);
        assert_eq!(
            EvidencePolicy::from_document(&json!({"policy": true})),
            EvidencePolicy::default()
        );
    }

    #[test]
    fn non_object_documents_are_rejected() {
        assert!(DomainPolicyDocument::from_value(&json!([1])).is_err());
        assert!(DomainPolicyDocument::from_json("{not json").is_err());
    }
}
