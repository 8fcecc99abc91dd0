//! Subcommand implementations.
//!
//! Each command returns `Ok(true)` on success, `Ok(false)` when it ran but
//! the outcome is a failure, and `Err` when it could not run at all.

pub mod authorship;
pub mod canonicalize;
pub mod event_hash;
pub mod vectors;
pub mod verify_chain;
pub mod verify_url;

use std::io::{self, Read};
use std::path::Path;

use serde_json::Value;
use vp_canonical::{Timestamp, ValidationError};

use crate::errors::CliError;

/// Command result: whether the command succeeded.
pub type CommandResult = Result<bool, Box<dyn std::error::Error>>;

fn source_name(path: Option<&Path>) -> String {
    path.map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string())
}

/// Reads a file, or stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String, CliError> {
    let result = match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map(|_| buffer)
        }
    };
    result.map_err(|source| CliError::Read {
        path: source_name(path),
        source,
    })
}

/// Reads and parses a JSON document.
pub fn read_json(path: Option<&Path>) -> Result<Value, CliError> {
    let text = read_input(path)?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: source_name(path),
        source,
    })
}

/// Parses `--evaluated-at`, defaulting to the current second.
pub fn evaluation_time(raw: Option<&str>) -> Result<Timestamp, ValidationError> {
    match raw {
        Some(raw) => Timestamp::parse(raw),
        None => Ok(Timestamp::now()),
    }
}
