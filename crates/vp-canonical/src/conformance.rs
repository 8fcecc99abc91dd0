//! Golden-vector conformance runner.
//!
//! A vector fixture holds three categories of cases. Every case is replayed
//! against this crate's codec and compared byte-for-byte (or hex-for-hex)
//! with the recorded expectation. Any mismatch fails the whole run.

use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::artifact_url::canonicalize_url;
use crate::canonicalizer::canonical_json_string;
use crate::digest::sha256_hex;
use crate::event_hash::compute_event_hash;

/// Errors raised while loading a fixture.
#[derive(Debug, Error)]
pub enum ConformanceError {
    /// Fixture could not be read.
    #[error("failed to read vectors {path}: {source}")]
    Io {
        /// Fixture path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Fixture is not valid JSON or has the wrong shape.
    #[error("invalid vectors file {path}: {source}")]
    Parse {
        /// Fixture path.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

/// Canonical JSON case: input value, expected encoding and its SHA-256.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonVector {
    /// Vector identifier.
    pub id: String,
    /// Value to encode.
    pub input: Value,
    /// Expected canonical encoding.
    pub expected_canonical_json: String,
    /// Expected SHA-256 of the encoding.
    pub expected_sha256: String,
}

/// URL canonicalization case.
#[derive(Debug, Clone, Deserialize)]
pub struct UrlVector {
    /// Vector identifier.
    pub id: String,
    /// Raw URL.
    pub input: String,
    /// Expected canonical URL.
    pub expected: String,
}

/// Event hash case.
#[derive(Debug, Clone, Deserialize)]
pub struct EventHashVector {
    /// Vector identifier.
    pub id: String,
    /// Event object, possibly carrying its own `event_hash`.
    pub input: Value,
    /// Expected event hash.
    pub expected_event_hash: String,
}

/// A full vector fixture. Missing categories are treated as empty.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VectorSet {
    /// Canonical JSON cases.
    #[serde(default)]
    pub json_canonicalization: Vec<JsonVector>,
    /// URL canonicalization cases.
    #[serde(default)]
    pub url_canonicalization: Vec<UrlVector>,
    /// Event hash cases.
    #[serde(default)]
    pub event_hash: Vec<EventHashVector>,
}

impl VectorSet {
    /// Loads a fixture from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConformanceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConformanceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConformanceError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Total number of cases across categories.
    pub fn len(&self) -> usize {
        self.json_canonicalization.len() + self.url_canonicalization.len() + self.event_hash.len()
    }

    /// Returns true when the fixture holds no cases.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A failed vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorFailure {
    /// Identifier of the failing vector.
    pub id: String,
    /// What did not match.
    pub reason: String,
}

impl fmt::Display for VectorFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.id, self.reason)
    }
}

/// Outcome of a conformance run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConformanceReport {
    /// Number of cases that matched.
    pub passed: usize,
    /// Cases that did not match, in fixture order.
    pub failures: Vec<VectorFailure>,
}

impl ConformanceReport {
    /// True when no vector failed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, id: &str, failure: Option<String>) {
        match failure {
            None => self.passed += 1,
            Some(reason) => self.failures.push(VectorFailure {
                id: id.to_string(),
                reason,
            }),
        }
    }
}

/// Replays every vector in `vectors`.
pub fn run_vectors(vectors: &VectorSet) -> ConformanceReport {
    let mut report = ConformanceReport::default();

    for case in &vectors.json_canonicalization {
        report.record(&case.id, check_json(case));
    }
    for case in &vectors.url_canonicalization {
        report.record(&case.id, check_url(case));
    }
    for case in &vectors.event_hash {
        report.record(&case.id, check_event_hash(case));
    }

    tracing::debug!(
        passed = report.passed,
        failed = report.failures.len(),
        "conformance run finished"
    );
    report
}

fn check_json(case: &JsonVector) -> Option<String> {
    let actual = match canonical_json_string(&case.input) {
        Ok(actual) => actual,
        Err(e) => return Some(format!("canonicalization raised {}", e)),
    };
    if actual != case.expected_canonical_json {
        return Some("canonical JSON mismatch".to_string());
    }
    if sha256_hex(actual.as_bytes()) != case.expected_sha256 {
        return Some("sha256 mismatch".to_string());
    }
    None
}

fn check_url(case: &UrlVector) -> Option<String> {
    match canonicalize_url(&case.input) {
        Ok(actual) if actual == case.expected => None,
        Ok(_) => Some("URL canonicalization mismatch".to_string()),
        Err(e) => Some(format!("canonicalization raised {}", e)),
    }
}

fn check_event_hash(case: &EventHashVector) -> Option<String> {
    match compute_event_hash(&case.input) {
        Ok(actual) if actual == case.expected_event_hash.as_str() => None,
        Ok(_) => Some("event hash mismatch".to_string()),
        Err(e) => Some(format!("event hash raised {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fixture(value: Value) -> VectorSet {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_categories_default_to_empty() {
        let set = fixture(json!({"url_canonicalization": [
            {"id": "u1", "input": "HTTP://A.example", "expected": "http://a.example/"}
        ]}));
        assert_eq!(set.len(), 1);
        let report = run_vectors(&set);
        assert!(report.is_success());
        assert_eq!(report.passed, 1);
    }

    #[test]
    fn sha_mismatch_is_reported_separately_from_encoding_mismatch() {
        let set = fixture(json!({"json_canonicalization": [
            {"id": "j1", "input": {"b": 1, "a": 2},
             "expected_canonical_json": "{\"a\":2,\"b\":1}", "expected_sha256": "00"},
            {"id": "j2", "input": {"a": 1},
             "expected_canonical_json": "{\"a\": 1}", "expected_sha256": "00"}
        ]}));
        let report = run_vectors(&set);
        assert_eq!(
            report.failures,
            vec![
                VectorFailure { id: "j1".into(), reason: "sha256 mismatch".into() },
                VectorFailure { id: "j2".into(), reason: "canonical JSON mismatch".into() },
            ]
        );
    }

    #[test]
    fn url_errors_are_failures_not_panics() {
        let set = fixture(json!({"url_canonicalization": [
            {"id": "bad", "input": "no-scheme", "expected": "x"}
        ]}));
        let report = run_vectors(&set);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(
            report.failures[0].to_string(),
            "bad: canonicalization raised URL must include scheme and host"
        );
    }
}
