//! Per-artifact manifests.

use serde::Deserialize;
use serde_json::Value;

use vp_canonical::HexDigest;

use crate::errors::SchemaError;
use crate::value::{nested_truthy, scalar_text};

/// Legacy (protocol 1.0) projection manifest served next to an artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionManifest {
    /// Artifact the manifest claims to describe; empty when absent.
    pub artifact_url: String,
    /// Claimed SHA-256 of the artifact content, trimmed.
    pub content_sha256: String,
    /// Whether `signature.value` is present and non-empty.
    pub has_signature: bool,
}

impl ProjectionManifest {
    /// Decodes a manifest document.
    pub fn from_value(document: &Value) -> Result<Self, SchemaError> {
        if !document.is_object() {
            return Err(SchemaError::NotAnObject("manifest"));
        }
        let text = |field: &str| document.get(field).and_then(scalar_text).unwrap_or_default();
        Ok(Self {
            artifact_url: text("artifact_url"),
            content_sha256: text("content_sha256").trim().to_string(),
            has_signature: nested_truthy(document, "signature", "value"),
        })
    }

    /// `content_sha256` is exactly 64 lowercase hex characters.
    pub fn has_valid_content_hash(&self) -> bool {
        HexDigest::is_valid(&self.content_sha256)
    }
}

/// Authorship manifest produced for a single article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuthorshipManifest {
    /// Content commitment.
    #[serde(default)]
    pub content: ContentCommitment,
    /// Repository timeline.
    #[serde(default)]
    pub timeline: Timeline,
}

/// `content` section of an authorship manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContentCommitment {
    /// SHA-256 hex of the article bytes.
    #[serde(default)]
    pub sha256: String,
}

/// `timeline` section of an authorship manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Timeline {
    /// Repository HEAD at generation time.
    #[serde(default)]
    pub repo_commit_head: String,
    /// Timestamp anchors over the repository history.
    #[serde(default)]
    pub anchors: Vec<Anchor>,
}

/// A timestamp anchor whose proof file lives alongside the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Anchor {
    /// Anchor kind, e.g. `opentimestamps`.
    #[serde(default, rename = "type")]
    pub kind: String,
    /// Local path of the proof file.
    #[serde(default)]
    pub proof_uri: String,
}

impl AuthorshipManifest {
    /// Parses a manifest from JSON text.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(text).map_err(|source| SchemaError::Json {
            document: "authorship manifest",
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn projection_manifest_reads_fields() {
        let manifest = ProjectionManifest::from_value(&json!({
            "artifact_url": "https://news.example.org/a",
            "content_sha256": " abc ",
            "signature": {"value": "sig"}
        }))
        .unwrap();
        assert_eq!(manifest.content_sha256, "abc");
        assert!(manifest.has_signature);
        assert!(!manifest.has_valid_content_hash());
    }

    #[test]
    fn projection_manifest_defaults_missing_fields() {
        let manifest = ProjectionManifest::from_value(&json!({"signature": {}})).unwrap();
        assert_eq!(manifest.artifact_url, "");
        assert!(!manifest.has_signature);
        assert!(ProjectionManifest::from_value(&json!(null)).is_err());
    }

    #[test]
    fn authorship_manifest_tolerates_missing_sections() {
        let manifest = AuthorshipManifest::from_json(r#"{"content": {"sha256": "ab"}}"#).unwrap();
        assert_eq!(manifest.content.sha256, "ab");
        assert!(manifest.timeline.anchors.is_empty());
    }
}
