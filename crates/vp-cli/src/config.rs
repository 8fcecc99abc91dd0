//! Verifier configuration.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};
use vp_discovery::{default_user_agent, ClientConfig};

use crate::errors::CliError;

const ENV_PREFIX: &str = "VP_";

/// Defaults for every command, overridable through the environment.
///
/// Loaded in priority order:
/// 1. `VP_`-prefixed environment variables (`VP_TIMEOUT_SECS`,
///    `VP_VECTORS_PATH`, `VP_WELL_KNOWN_SCHEME`, `VP_USER_AGENT`)
/// 2. Built-in defaults
///
/// Command-line flags override both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Per-request timeout for discovery fetches, in seconds.
    pub timeout_secs: u64,
    /// Conformance vector fixture used by `run-vectors`.
    pub vectors_path: PathBuf,
    /// Scheme for the well-known policy document.
    pub well_known_scheme: String,
    /// User agent sent with every fetch.
    pub user_agent: String,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            vectors_path: PathBuf::from("docs/spec/test-vectors/canonicalization-v1.1.json"),
            well_known_scheme: "https".to_string(),
            user_agent: default_user_agent(),
        }
    }
}

impl VerifierConfig {
    /// Loads defaults merged with `VP_*` environment variables.
    pub fn load() -> Result<Self, CliError> {
        Self::from_figment(Figment::new().merge(Env::prefixed(ENV_PREFIX)))
    }

    /// Extracts a configuration from `overrides` layered on the defaults.
    pub fn from_figment(overrides: Figment) -> Result<Self, CliError> {
        let config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(overrides)
            .extract()
            .map_err(|e| CliError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Fetch client settings, with an optional timeout override.
    ///
    /// The override is held to the same rules as the configured value.
    pub fn to_client_config(&self, timeout_secs: Option<u64>) -> Result<ClientConfig, CliError> {
        let timeout_secs = timeout_secs.unwrap_or(self.timeout_secs);
        check_timeout(timeout_secs)?;
        Ok(ClientConfig {
            timeout: Duration::from_secs(timeout_secs),
            user_agent: self.user_agent.clone(),
            well_known_scheme: self.well_known_scheme.clone(),
            ..ClientConfig::default()
        })
    }

    fn validate(&self) -> Result<(), CliError> {
        check_timeout(self.timeout_secs)?;
        if !matches!(self.well_known_scheme.as_str(), "http" | "https") {
            return Err(CliError::Config(format!(
                "unsupported well_known_scheme {}",
                self.well_known_scheme
            )));
        }
        Ok(())
    }
}

fn check_timeout(timeout_secs: u64) -> Result<(), CliError> {
    if timeout_secs == 0 {
        return Err(CliError::Config("timeout_secs must be greater than 0".into()));
    }
    Ok(())
}
