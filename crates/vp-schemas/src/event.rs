//! Provenance event records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::value::{is_truthy, nested_truthy, scalar_text};

/// Event type string for a newly issued attestation.
pub const ATTESTATION_ISSUED: &str = "ATTESTATION_ISSUED";
/// Event type string for an attestation that replaces an earlier one.
pub const ATTESTATION_SUPERSEDED: &str = "ATTESTATION_SUPERSEDED";

/// Open set of event types. Only attestation types carry policy obligations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    /// `ATTESTATION_ISSUED`.
    AttestationIssued,
    /// `ATTESTATION_SUPERSEDED`.
    AttestationSuperseded,
    /// Any other type; linked into the chain but not policy-checked.
    Other(String),
}

impl EventType {
    /// Classifies a raw type string.
    pub fn parse(raw: &str) -> Self {
        match raw {
            ATTESTATION_ISSUED => Self::AttestationIssued,
            ATTESTATION_SUPERSEDED => Self::AttestationSuperseded,
            other => Self::Other(other.to_string()),
        }
    }

    /// True for attestation-type events.
    pub fn is_attestation(&self) -> bool {
        matches!(self, Self::AttestationIssued | Self::AttestationSuperseded)
    }

    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::AttestationIssued => ATTESTATION_ISSUED,
            Self::AttestationSuperseded => ATTESTATION_SUPERSEDED,
            Self::Other(other) => other,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single event as published in an evidence feed.
///
/// The raw JSON is kept intact: `event_hash` commits to every member of the
/// object, including members this crate does not know about, so typed
/// accessors read from the original value instead of a lossy struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainEvent(Value);

impl ChainEvent {
    /// Wraps a raw JSON value.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The raw JSON value, used as the hash preimage.
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Events must be JSON objects.
    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    fn text(&self, field: &str) -> Option<String> {
        self.0.get(field).and_then(scalar_text)
    }

    fn trimmed(&self, field: &str) -> Option<String> {
        self.text(field)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Opaque identifier, trimmed; `None` when absent or blank.
    pub fn event_id(&self) -> Option<String> {
        self.trimmed("event_id")
    }

    /// Declared hash commitment, trimmed; `None` when absent or blank.
    pub fn event_hash(&self) -> Option<String> {
        self.trimmed("event_hash")
    }

    /// Raw `prev_event_hash` member.
    pub fn prev_event_hash(&self) -> Option<&Value> {
        self.0.get("prev_event_hash")
    }

    /// True when `prev_event_hash` is absent, `null`, `""` or the string `"null"`.
    pub fn has_null_link(&self) -> bool {
        match self.prev_event_hash() {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.is_empty() || s == "null",
            Some(_) => false,
        }
    }

    /// True when `prev_event_hash` is exactly the string `expected`.
    pub fn links_to(&self, expected: &str) -> bool {
        self.prev_event_hash().and_then(Value::as_str) == Some(expected)
    }

    /// Classified event type; a missing type is `Other("")`.
    pub fn event_type(&self) -> EventType {
        EventType::parse(&self.text("event_type").unwrap_or_default())
    }

    /// `recorded_at` when present and truthy.
    pub fn recorded_at(&self) -> Option<String> {
        self.truthy_text("recorded_at")
    }

    /// `effective_at` when present and truthy.
    pub fn effective_at(&self) -> Option<String> {
        self.truthy_text("effective_at")
    }

    fn truthy_text(&self, field: &str) -> Option<String> {
        let value = self.0.get(field).filter(|v| is_truthy(v))?;
        Some(scalar_text(value).unwrap_or_else(|| value.to_string()))
    }

    /// Full events carry the payload needed to recompute `event_hash`.
    pub fn is_full_payload(&self) -> bool {
        ["issuer", "canonicalization", "artifact"]
            .iter()
            .all(|field| self.0.get(field).is_some())
    }

    /// `signature.value` is present and non-empty.
    pub fn has_signature(&self) -> bool {
        nested_truthy(&self.0, "signature", "value")
    }

    /// `timestamp.value` is present and non-empty.
    pub fn has_timestamp(&self) -> bool {
        nested_truthy(&self.0, "timestamp", "value")
    }

    /// `transparency.entry_id` is present and non-empty.
    pub fn has_transparency_entry(&self) -> bool {
        nested_truthy(&self.0, "transparency", "entry_id")
    }

    /// Sort key for canonical order: `(recorded_at, event_id)` as strings.
    pub fn ordering_key(&self) -> (String, String) {
        (
            self.text("recorded_at").unwrap_or_default(),
            self.text("event_id").unwrap_or_default(),
        )
    }
}

impl From<Value> for ChainEvent {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_link_variants() {
        for link in [json!(null), json!(""), json!("null")] {
            assert!(ChainEvent::new(json!({"prev_event_hash": link})).has_null_link());
        }
        assert!(ChainEvent::new(json!({})).has_null_link());
        assert!(!ChainEvent::new(json!({"prev_event_hash": "ab"})).has_null_link());
        assert!(!ChainEvent::new(json!({"prev_event_hash": 0})).has_null_link());
    }

    #[test]
    fn identifiers_are_trimmed() {
        let event = ChainEvent::new(json!({"event_id": "  e1 ", "event_hash": "   "}));
        assert_eq!(event.event_id().as_deref(), Some("e1"));
        assert_eq!(event.event_hash(), None);
    }

    #[test]
    fn full_payload_requires_all_three_members() {
        let full = ChainEvent::new(json!({"issuer": "a", "canonicalization": "b", "artifact": {}}));
        let pointer = ChainEvent::new(json!({"issuer": "a", "artifact": {}}));
        assert!(full.is_full_payload());
        assert!(!pointer.is_full_payload());
    }

    #[test]
    fn attestation_types_are_recognized() {
        assert!(EventType::parse("ATTESTATION_ISSUED").is_attestation());
        assert!(EventType::parse("ATTESTATION_SUPERSEDED").is_attestation());
        assert!(!EventType::parse("attestation_issued").is_attestation());
        assert_eq!(
            ChainEvent::new(json!({})).event_type(),
            EventType::Other(String::new())
        );
    }

    #[test]
    fn ordering_key_uses_raw_strings() {
        let event = ChainEvent::new(json!({"recorded_at": "2025-01-01T00:00:00Z", "event_id": "b"}));
        assert_eq!(
            event.ordering_key(),
            ("2025-01-01T00:00:00Z".to_string(), "b".to_string())
        );
    }
}
