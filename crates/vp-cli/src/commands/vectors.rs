//! run-vectors command implementation.

use std::path::PathBuf;

use vp_canonical::{run_vectors, VectorSet};

use super::CommandResult;
use crate::config::VerifierConfig;
use crate::output::print_conformance;

pub fn run(config: &VerifierConfig, vectors: Option<PathBuf>) -> CommandResult {
    let path = vectors.unwrap_or_else(|| config.vectors_path.clone());
    let set = VectorSet::load(&path)?;
    tracing::debug!(path = %path.display(), cases = set.len(), "running conformance vectors");

    let report = run_vectors(&set);
    print_conformance(&report);
    Ok(report.is_success())
}
