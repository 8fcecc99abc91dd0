//! verify-url command implementation.

use tracing::info;
use vp_canonical::{canonicalize_url, Timestamp};
use vp_core::{VerificationResult, VerificationVerdict};
use vp_discovery::DiscoveryClient;

use super::{evaluation_time, CommandResult};
use crate::config::VerifierConfig;
use crate::output::print_report;

pub async fn run(
    config: &VerifierConfig,
    artifact_url: &str,
    timeout: Option<u64>,
    evaluated_at: Option<&str>,
) -> CommandResult {
    let canonical_url = canonicalize_url(artifact_url).ok();

    let (result, evaluated_at) = match evaluation_time(evaluated_at) {
        Ok(evaluated_at) => {
            let client = DiscoveryClient::new(config.to_client_config(timeout)?)?;
            info!(artifact_url = %artifact_url, "verifying artifact");
            let result = client.verify_remote_artifact(artifact_url, &evaluated_at).await;
            (result, evaluated_at)
        }
        Err(e) => (
            VerificationResult::failure(VerificationVerdict::InvalidInput, e.to_string()),
            Timestamp::now(),
        ),
    };

    print_report(&result.to_report(canonical_url, &evaluated_at));
    Ok(result.is_verified())
}
