//! Article-level authorship manifest checks.
//!
//! The manifest is produced by separate tooling. This module only checks
//! what can be checked locally: the content hash, the repository HEAD it was
//! generated at, the presence of a timestamp proof file, and (through an
//! external tool) a detached signature over the manifest.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;
use vp_canonical::sha256_hex_reader;
use vp_schemas::AuthorshipManifest;

use crate::errors::CoreError;

/// Reads the current version-control HEAD.
pub trait HeadReader {
    /// Current HEAD commit, or `None` when there is no repository.
    fn read_head(&self) -> Option<String>;
}

/// Verifies a detached signature over a file.
pub trait DetachedSignatureVerifier {
    /// Returns `Ok(true)` for a valid signature, `Ok(false)` for an invalid one.
    fn verify(&self, signature: &Path, signed_file: &Path) -> Result<bool, CoreError>;
}

/// `git rev-parse HEAD` in the working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitHeadReader;

impl HeadReader for GitHeadReader {
    fn read_head(&self) -> Option<String> {
        let output = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
        if !output.status.success() {
            return None;
        }
        let head = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!head.is_empty()).then_some(head)
    }
}

/// `gpg --verify <signature> <file>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GpgSignatureVerifier;

impl DetachedSignatureVerifier for GpgSignatureVerifier {
    fn verify(&self, signature: &Path, signed_file: &Path) -> Result<bool, CoreError> {
        let status = Command::new("gpg")
            .arg("--verify")
            .arg(signature)
            .arg(signed_file)
            .status()
            .map_err(|e| CoreError::ToolUnavailable {
                tool: "gpg",
                reason: e.to_string(),
            })?;
        Ok(status.success())
    }
}

/// Severity of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingLevel {
    /// Check passed.
    Ok,
    /// Informational; check skipped.
    Info,
    /// Check inconclusive or mismatched in a non-fatal way.
    Warn,
    /// Check failed; the manifest does not hold.
    Fail,
}

impl fmt::Display for FindingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "OK",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Fail => "FAIL",
        })
    }
}

/// One line of the authorship report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Severity.
    pub level: FindingLevel,
    /// Message.
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

/// Findings in check order. Checking stops at the first failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorshipReport {
    /// Findings.
    pub findings: Vec<Finding>,
}

impl AuthorshipReport {
    /// True when no finding failed.
    pub fn passed(&self) -> bool {
        self.findings.iter().all(|f| f.level != FindingLevel::Fail)
    }

    fn push(&mut self, level: FindingLevel, message: impl Into<String>) {
        self.findings.push(Finding {
            level,
            message: message.into(),
        });
    }
}

/// Inputs to an authorship check.
#[derive(Debug, Clone)]
pub struct AuthorshipInput {
    /// The article file.
    pub content: PathBuf,
    /// The authorship manifest.
    pub manifest: PathBuf,
    /// Optional detached signature over the manifest.
    pub signature: Option<PathBuf>,
}

/// Runs the authorship checks with the given collaborators.
pub fn check_authorship(
    input: &AuthorshipInput,
    head_reader: &dyn HeadReader,
    signature_verifier: &dyn DetachedSignatureVerifier,
) -> AuthorshipReport {
    let mut report = AuthorshipReport::default();

    let manifest = match load_manifest(&input.manifest) {
        Ok(manifest) => manifest,
        Err(e) => {
            report.push(FindingLevel::Fail, format!("manifest unusable: {}", e));
            return report;
        }
    };

    let content_hash = match File::open(&input.content).and_then(sha256_hex_reader) {
        Ok(hash) => hash,
        Err(_) => {
            report.push(
                FindingLevel::Fail,
                format!("file not found: {}", input.content.display()),
            );
            return report;
        }
    };
    if content_hash != manifest.content.sha256 {
        report.push(FindingLevel::Fail, "file hash does not match manifest");
        return report;
    }
    report.push(FindingLevel::Ok, "content hash matches");

    match head_reader.read_head() {
        Some(head) if head == manifest.timeline.repo_commit_head => {
            report.push(FindingLevel::Ok, "repository HEAD matches manifest")
        }
        Some(_) => report.push(FindingLevel::Warn, "repository HEAD differs from manifest"),
        None => report.push(FindingLevel::Info, "not a repository or git not available"),
    }

    match manifest.timeline.anchors.first() {
        Some(anchor) if !anchor.proof_uri.is_empty() && Path::new(&anchor.proof_uri).exists() => {
            report.push(
                FindingLevel::Ok,
                format!("timestamp proof present at {}", anchor.proof_uri),
            )
        }
        Some(_) => report.push(FindingLevel::Warn, "timestamp proof not found locally"),
        None => report.push(FindingLevel::Warn, "no anchors listed in manifest"),
    }

    if let Some(signature) = input.signature.as_deref().filter(|p| p.exists()) {
        match signature_verifier.verify(signature, &input.manifest) {
            Ok(true) => report.push(FindingLevel::Ok, "manifest signature valid"),
            Ok(false) => report.push(FindingLevel::Fail, "manifest signature invalid"),
            Err(e) => report.push(FindingLevel::Fail, format!("manifest signature unchecked: {}", e)),
        }
    }

    debug!(passed = report.passed(), findings = report.findings.len(), "authorship check finished");
    report
}

fn load_manifest(path: &Path) -> Result<AuthorshipManifest, CoreError> {
    let text = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(AuthorshipManifest::from_json(&text)?)
}
