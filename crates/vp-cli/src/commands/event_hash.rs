//! event-hash command implementation.

use std::path::Path;

use vp_canonical::compute_event_hash;

use super::{read_json, CommandResult};

pub fn run(input: Option<&Path>) -> CommandResult {
    let event = read_json(input)?;
    if !event.is_object() {
        return Err("event must be a JSON object".into());
    }
    let hash = compute_event_hash(&event)?;

    println!("{}", hash);
    Ok(true)
}
