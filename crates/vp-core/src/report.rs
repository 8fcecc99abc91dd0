//! Output document for a verification call.

use serde::Serialize;
use vp_canonical::Timestamp;

use crate::verification::{VerificationResult, VerificationVerdict};

/// Protocol version stamped on every report.
pub const REPORT_SPEC_VERSION: &str = "1.1";

/// Serializable verification outcome.
///
/// ```json
/// {"spec_version": "1.1", "verdict": "VERIFIED", "evaluated_at": "2025-01-01T00:00:00Z",
///  "artifact_url": "https://news.example.org/a", "active_event_id": "evt-1",
///  "checked_events": 2, "errors": []}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    /// Protocol version of the report format.
    pub spec_version: &'static str,
    /// Verdict.
    pub verdict: VerificationVerdict,
    /// Evaluation instant, second precision.
    pub evaluated_at: Timestamp,
    /// Artifact under verification, if known.
    pub artifact_url: Option<String>,
    /// Attestation in force at `evaluated_at`.
    pub active_event_id: Option<String>,
    /// Number of events examined.
    pub checked_events: usize,
    /// Diagnostics.
    pub errors: Vec<String>,
}

impl VerificationReport {
    /// Builds a report from a result.
    pub fn new(
        result: &VerificationResult,
        artifact_url: Option<String>,
        evaluated_at: Timestamp,
    ) -> Self {
        Self {
            spec_version: REPORT_SPEC_VERSION,
            verdict: result.verdict,
            evaluated_at,
            artifact_url,
            active_event_id: result.active_event_id.clone(),
            checked_events: result.checked_events,
            errors: result.errors.clone(),
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_has_expected_shape() {
        let result = VerificationResult::failure(VerificationVerdict::Undeclared, "missing policy");
        let at = Timestamp::parse("2025-03-04T05:06:07.891Z").unwrap();
        let report = result.to_report(None, &Timestamp::from_datetime(*at.as_datetime()));

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "spec_version": "1.1",
                "verdict": "UNDECLARED",
                "evaluated_at": "2025-03-04T05:06:07Z",
                "artifact_url": null,
                "active_event_id": null,
                "checked_events": 0,
                "errors": ["missing policy"]
            })
        );
    }
}
