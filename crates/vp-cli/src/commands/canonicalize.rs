//! Canonicalize command implementation.

use std::path::Path;

use vp_canonical::canonical_json_string;

use super::{read_json, CommandResult};

pub fn run(input: Option<&Path>) -> CommandResult {
    let value = read_json(input)?;
    let canonical = canonical_json_string(&value)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;

    println!("{}", canonical);
    Ok(true)
}
