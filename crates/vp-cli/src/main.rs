//! vp-verify - reference verifier for Verified Provenance artifacts.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod errors;
mod output;

use commands::{authorship, canonicalize, event_hash, vectors, verify_chain, verify_url};
use config::VerifierConfig;

/// Exit code for anything short of full success.
const EXIT_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(name = "vp-verify")]
#[command(version)]
#[command(about = "Verified Provenance reference verifier")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Verify an artifact URL using live discovery and evidence endpoints
    VerifyUrl {
        /// Artifact URL
        artifact_url: String,
        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Evaluation instant (RFC3339, default: now)
        #[arg(long)]
        evaluated_at: Option<String>,
    },
    /// Verify a local event chain against a domain policy document
    VerifyChain {
        /// Domain policy document (JSON)
        #[arg(long)]
        domain_doc: PathBuf,
        /// Event chain document (JSON array or {"events": [...]})
        #[arg(long)]
        chain_doc: PathBuf,
        /// Evaluation instant (RFC3339, default: now)
        #[arg(long)]
        evaluated_at: Option<String>,
    },
    /// Run canonicalization and event-hash conformance vectors
    RunVectors {
        /// Vector fixture (default from configuration)
        #[arg(long)]
        vectors: Option<PathBuf>,
    },
    /// Print the canonical JSON form of a document
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<PathBuf>,
    },
    /// Print the event hash of an event
    EventHash {
        /// Input JSON file (or stdin if not provided)
        input: Option<PathBuf>,
    },
    /// Check an article against its authorship manifest
    VerifyAuthorship {
        /// Content file
        #[arg(long)]
        file: PathBuf,
        /// Authorship manifest
        #[arg(long, default_value = "provenance.json")]
        manifest: PathBuf,
        /// Detached signature over the manifest
        #[arg(long)]
        sig: Option<PathBuf>,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let config = match VerifierConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_FAILURE);
        }
    };

    let result = match cli.command {
        Commands::VerifyUrl {
            artifact_url,
            timeout,
            evaluated_at,
        } => verify_url::run(&config, &artifact_url, timeout, evaluated_at.as_deref()).await,
        Commands::VerifyChain {
            domain_doc,
            chain_doc,
            evaluated_at,
        } => verify_chain::run(&domain_doc, &chain_doc, evaluated_at.as_deref()),
        Commands::RunVectors { vectors } => vectors::run(&config, vectors),
        Commands::Canonicalize { input } => canonicalize::run(input.as_deref()),
        Commands::EventHash { input } => event_hash::run(input.as_deref()),
        Commands::VerifyAuthorship {
            file,
            manifest,
            sig,
        } => authorship::run(file, manifest, sig),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_FAILURE),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
