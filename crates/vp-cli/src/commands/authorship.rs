//! verify-authorship command implementation.

use std::path::PathBuf;

use vp_core::{check_authorship, AuthorshipInput, GitHeadReader, GpgSignatureVerifier};

use super::CommandResult;
use crate::output::print_findings;

pub fn run(file: PathBuf, manifest: PathBuf, sig: Option<PathBuf>) -> CommandResult {
    let input = AuthorshipInput {
        content: file,
        manifest,
        signature: sig,
    };
    let report = check_authorship(&input, &GitHeadReader, &GpgSignatureVerifier);

    print_findings(&report);
    Ok(report.passed())
}
