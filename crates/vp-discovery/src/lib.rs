//! Discovery of Verified Provenance evidence over HTTP.
//!
//! Given an artifact URL, fetch the publishing domain's policy document,
//! follow it to the artifact's evidence and produce a verdict.
//!
//! ```no_run
//! use vp_canonical::Timestamp;
//! use vp_discovery::{ClientConfig, DiscoveryClient};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DiscoveryClient::new(ClientConfig::default())?;
//! let result = client
//!     .verify_remote_artifact("https://news.example.org/articles/a", &Timestamp::now())
//!     .await;
//! println!("{}", result.verdict);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

pub mod client;
pub mod discovery;
pub mod error;

pub use client::{default_user_agent, ClientConfig, FetchClient};
pub use discovery::{check_projection, events_url, DiscoveryClient, WELL_KNOWN_PATH};
pub use error::FetchError;
