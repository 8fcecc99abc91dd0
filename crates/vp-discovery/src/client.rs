//! HTTP client for provenance documents.
//!
//! Thin wrapper over `reqwest` that applies the caller's timeout and user
//! agent to every request and sorts failures into the categories the
//! discovery flow reports.

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug_span, Instrument};

use crate::error::{FetchError, Result};

/// Configuration for the fetch client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Timeout applied to each request.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Scheme used for the well-known policy document. Always `https` in
    /// production; tests point it at a plain-HTTP mock server.
    pub well_known_scheme: String,
    /// Maximum number of redirects to follow.
    pub max_redirects: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            user_agent: default_user_agent(),
            well_known_scheme: "https".to_string(),
            max_redirects: 5,
        }
    }
}

/// `vp-verify/<crate version>`.
pub fn default_user_agent() -> String {
    format!("vp-verify/{}", env!("CARGO_PKG_VERSION"))
}

/// Fetches JSON documents with a fixed configuration.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl FetchClient {
    /// Builds a client.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Configuration` if the underlying HTTP client
    /// cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects as usize))
            .build()
            .map_err(|e| FetchError::configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// GETs `url` and decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// - `Timeout` when the configured timeout elapses
    /// - `Network` for connection and transport failures
    /// - `Status` for any non-2xx response
    /// - `Decode` when the body is not JSON
    pub async fn fetch_json(&self, url: &str) -> Result<Value> {
        let span = debug_span!("fetch_json", url = %url);

        async move {
            let response = self
                .client
                .get(url)
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(|e| self.categorize(e))?;

            let status = response.status();
            tracing::debug!(status = status.as_u16(), "received response");
            if !status.is_success() {
                tracing::warn!(status = status.as_u16(), "non-success response");
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }

            let body = response.bytes().await.map_err(|e| self.categorize(e))?;
            serde_json::from_slice(&body).map_err(|e| FetchError::Decode {
                message: e.to_string(),
            })
        }
        .instrument(span)
        .await
    }

    fn categorize(&self, error: reqwest::Error) -> FetchError {
        tracing::warn!("request failed: {}", error);
        if error.is_timeout() {
            return FetchError::Timeout {
                timeout_seconds: self.config.timeout.as_secs(),
            };
        }
        if error.is_connect() {
            return FetchError::network(format!("connection failed: {error}"));
        }
        FetchError::network(error.to_string())
    }
}
