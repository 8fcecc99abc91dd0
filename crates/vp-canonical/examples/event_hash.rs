use serde_json::json;
use vp_canonical::{canonical_json_string, compute_event_hash};

fn main() {
    let event = json!({
        "event_id": "evt-0001",
        "event_type": "ATTESTATION_ISSUED",
        "recorded_at": "2025-01-01T00:00:00Z",
        "effective_at": "2025-01-01T00:00:00Z",
        "prev_event_hash": null,
        "issuer": "news.example.org",
        "canonicalization": "vp-jcs-1",
        "artifact": {
            "url": "https://news.example.org/a"
        }
    });

    let canonical = match canonical_json_string(&event) {
        Ok(canonical) => canonical,
        Err(err) => {
            eprintln!("canonicalization failed: {}", err);
            std::process::exit(1);
        }
    };
    println!("{}", canonical);

    match compute_event_hash(&event) {
        Ok(hash) => println!("event_hash: {}", hash),
        Err(err) => {
            eprintln!("event hash failed: {}", err);
            std::process::exit(1);
        }
    }
}
