use std::path::PathBuf;

use proptest::prelude::*;
use serde_json::json;
use vp_canonical::{
    canonical_json_string, canonicalize_url, compute_event_hash, run_vectors, HexDigest, VectorSet,
};

fn vectors_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/spec/test-vectors/canonicalization-v1.1.json")
}

#[test]
fn published_vectors_pass() {
    let vectors = VectorSet::load(vectors_path()).unwrap();
    assert!(!vectors.is_empty());
    let report = run_vectors(&vectors);
    assert!(report.is_success(), "failures: {:?}", report.failures);
    assert_eq!(report.passed, vectors.len());
}

#[test]
fn wrong_expected_hash_names_the_vector() {
    let mut vectors = VectorSet::load(vectors_path()).unwrap();
    vectors.event_hash[0].expected_event_hash = "0".repeat(64);
    let id = vectors.event_hash[0].id.clone();

    let report = run_vectors(&vectors);
    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].id, id);
    assert_eq!(report.failures[0].to_string(), format!("{}: event hash mismatch", id));
}

#[test]
fn canonical_json_is_compact_and_sorted() {
    let value = json!({"b": 1, "a": {"nested": 2}});
    assert_eq!(
        canonical_json_string(&value).unwrap(),
        r#"{"a":{"nested":2},"b":1}"#
    );
}

#[test]
fn event_hash_is_lowercase_hex() {
    let hash = compute_event_hash(&json!({"event_id": "e"})).unwrap();
    assert!(HexDigest::is_valid(hash.as_str()));
}

#[test]
fn mutating_any_field_changes_the_hash() {
    let event = json!({
        "event_id": "evt-1",
        "issuer": "news.example.org",
        "canonicalization": "vp-jcs-1",
        "artifact": {"url": "https://news.example.org/a"}
    });
    let original = compute_event_hash(&event).unwrap();

    for (field, replacement) in [
        ("event_id", json!("evt-2")),
        ("issuer", json!("news.example.net")),
        ("canonicalization", json!("vp-jcs-2")),
        ("artifact", json!({"url": "https://news.example.org/b"})),
    ] {
        let mut tampered = event.clone();
        tampered[field] = replacement;
        assert_ne!(compute_event_hash(&tampered).unwrap(), original, "{}", field);
    }
}

fn url_strategy() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["http", "HTTPS", "Http", "https"]),
        "[a-zA-Z]{1,8}(\\.[a-zA-Z]{2,5}){1,2}",
        prop::option::of(prop::sample::select(vec![80u16, 443, 8080, 8443])),
        prop::collection::vec(
            prop::sample::select(vec!["a", "B", ".", "..", "", "%2f", "x%e2"]),
            0..6,
        ),
        prop::option::of("[a-z]=[0-9%A-Fa-f]{0,4}"),
        any::<bool>(),
    )
        .prop_map(|(scheme, host, port, segments, query, trailing)| {
            let mut url = format!("{}://{}", scheme, host);
            if let Some(port) = port {
                url.push_str(&format!(":{}", port));
            }
            for segment in segments {
                url.push('/');
                url.push_str(segment);
            }
            if trailing {
                url.push('/');
            }
            if let Some(query) = query {
                url.push('?');
                url.push_str(&query);
            }
            url
        })
}

proptest! {
    #[test]
    fn url_canonicalization_is_idempotent(url in url_strategy()) {
        let once = canonicalize_url(&url).unwrap();
        let twice = canonicalize_url(&once).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn event_hash_is_deterministic_and_ignores_own_hash(
        id in "[a-z0-9-]{1,12}",
        issuer in "[a-z]{1,10}\\.example",
        declared in "[0-9a-f]{64}",
    ) {
        let bare = json!({"event_id": id, "issuer": issuer});
        let mut declared_event = bare.clone();
        declared_event["event_hash"] = json!(declared);
        prop_assert_eq!(
            compute_event_hash(&bare).unwrap(),
            compute_event_hash(&declared_event).unwrap()
        );
    }
}
