//! verify-chain command implementation.

use std::path::Path;

use vp_canonical::Timestamp;
use vp_core::{VerificationResult, VerificationVerdict, Verifier};
use vp_schemas::{DomainPolicyDocument, EventChain};

use super::{evaluation_time, read_json, CommandResult};
use crate::output::print_report;

pub fn run(domain_doc: &Path, chain_doc: &Path, evaluated_at: Option<&str>) -> CommandResult {
    let (result, artifact_url, evaluated_at) = match evaluation_time(evaluated_at) {
        Ok(evaluated_at) => {
            let (result, artifact_url) = verify_files(domain_doc, chain_doc, &evaluated_at);
            (result, artifact_url, evaluated_at)
        }
        Err(e) => (
            VerificationResult::failure(VerificationVerdict::InvalidInput, e.to_string()),
            None,
            Timestamp::now(),
        ),
    };

    print_report(&result.to_report(artifact_url, &evaluated_at));
    Ok(result.is_verified())
}

fn verify_files(
    domain_doc: &Path,
    chain_doc: &Path,
    evaluated_at: &Timestamp,
) -> (VerificationResult, Option<String>) {
    let invalid = |message: String| {
        (
            VerificationResult::failure(VerificationVerdict::InvalidInput, message),
            None,
        )
    };

    let policy_document = match read_json(Some(domain_doc)) {
        Ok(value) => match DomainPolicyDocument::from_value(&value) {
            Ok(document) => document,
            Err(e) => return invalid(e.to_string()),
        },
        Err(e) => return invalid(e.to_string()),
    };
    let chain = match read_json(Some(chain_doc)) {
        Ok(value) => EventChain::from_value(value),
        Err(e) => return invalid(e.to_string()),
    };

    let result = Verifier::new().verify_chain(policy_document.policy(), &chain, evaluated_at);
    (result, chain.artifact_url)
}
