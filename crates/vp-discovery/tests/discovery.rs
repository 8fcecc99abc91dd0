//! Integration tests for live discovery against a mock origin.

use std::time::Duration;

use serde_json::{json, Value};
use vp_canonical::{compute_event_hash, Timestamp};
use vp_core::VerificationVerdict;
use vp_discovery::{default_user_agent, ClientConfig, DiscoveryClient};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn make_client(timeout: Duration) -> DiscoveryClient {
    DiscoveryClient::new(ClientConfig {
        timeout,
        well_known_scheme: "http".to_string(),
        ..Default::default()
    })
    .expect("client should build")
}

fn evaluated_at() -> Timestamp {
    Timestamp::parse("2026-01-01T00:00:00Z").unwrap()
}

fn article_url(server: &MockServer) -> String {
    format!("{}/articles/a", server.uri())
}

async fn serve_json(server: &MockServer, at: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn make_chain(artifact_url: &str) -> Value {
    let mut genesis = json!({
        "event_id": "evt-1",
        "event_type": "ATTESTATION_ISSUED",
        "recorded_at": "2025-01-01T00:00:00Z",
        "effective_at": "2025-01-01T00:00:00Z",
        "issuer": "news.example.org",
        "canonicalization": "vp-jcs-1",
        "artifact": {"url": artifact_url, "content_sha256": "d".repeat(64)},
        "prev_event_hash": null
    });
    let genesis_hash = compute_event_hash(&genesis).unwrap();
    genesis["event_hash"] = json!(genesis_hash.as_str());

    let note = json!({
        "event_id": "evt-2",
        "event_type": "CORRECTION_LINKED",
        "recorded_at": "2025-02-01T00:00:00Z",
        "prev_event_hash": genesis_hash.as_str(),
        "event_hash": "e".repeat(64)
    });
    // Published newest first; order must not matter.
    json!({"artifact_url": artifact_url, "events": [note, genesis]})
}

#[tokio::test]
async fn missing_policy_document_is_undeclared() {
    let server = MockServer::start().await;
    let client = make_client(Duration::from_secs(5));

    let result = client
        .verify_remote_artifact(&article_url(&server), &evaluated_at())
        .await;

    assert_eq!(result.verdict, VerificationVerdict::Undeclared);
    assert_eq!(
        result.errors,
        vec![format!("missing {}/.well-known/provenance", server.uri())]
    );
}

#[tokio::test]
async fn policy_server_error_is_unverifiable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/provenance"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = make_client(Duration::from_secs(5))
        .verify_remote_artifact(&article_url(&server), &evaluated_at())
        .await;

    assert_eq!(result.verdict, VerificationVerdict::Unverifiable);
    assert_eq!(result.errors, vec!["domain policy fetch failed: HTTP 500".to_string()]);
}

#[tokio::test]
async fn slow_policy_server_times_out_as_unverifiable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/provenance"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"spec_version": "1.0"}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let result = make_client(Duration::from_millis(200))
        .verify_remote_artifact(&article_url(&server), &evaluated_at())
        .await;

    assert_eq!(result.verdict, VerificationVerdict::Unverifiable);
    assert!(result.errors[0].starts_with("domain policy fetch failed: request timeout"));
}

#[tokio::test]
async fn invalid_policy_json_is_unverifiable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/.well-known/provenance"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let result = make_client(Duration::from_secs(5))
        .verify_remote_artifact(&article_url(&server), &evaluated_at())
        .await;

    assert_eq!(result.verdict, VerificationVerdict::Unverifiable);
    assert!(result.errors[0].starts_with("domain policy fetch failed: invalid JSON"));
}

#[tokio::test]
async fn malformed_url_is_invalid_input_without_fetching() {
    let result = make_client(Duration::from_secs(5))
        .verify_remote_artifact("not a url", &evaluated_at())
        .await;
    assert_eq!(result.verdict, VerificationVerdict::InvalidInput);
    assert_eq!(result.errors, vec!["URL must include scheme and host".to_string()]);
}

#[tokio::test]
async fn event_chain_domain_delegates_to_chain_verifier() {
    let server = MockServer::start().await;
    let artifact = article_url(&server);
    serve_json(
        &server,
        "/.well-known/provenance",
        json!({
            "spec_version": "1.1.0",
            "policy": {"signature_required": false},
            "evidence_api": {"events_by_artifact": format!("{}/events?artifact={{artifact_url}}", server.uri())}
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .and(query_param("artifact", artifact.as_str()))
        .and(header("accept", "application/json"))
        .and(header("user-agent", default_user_agent().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(make_chain(&artifact)))
        .expect(1)
        .mount(&server)
        .await;

    let result = make_client(Duration::from_secs(5))
        .verify_remote_artifact(&artifact, &evaluated_at())
        .await;

    assert_eq!(result.verdict, VerificationVerdict::Verified, "{:?}", result.errors);
    assert_eq!(result.checked_events, 2);
    assert_eq!(result.active_event_id.as_deref(), Some("evt-1"));
}

#[tokio::test]
async fn event_chain_domain_without_template_is_unverifiable() {
    let server = MockServer::start().await;
    serve_json(
        &server,
        "/.well-known/provenance",
        json!({"spec_version": "1.1", "evidence_api": {"events_by_artifact": "https://api.example.org/events"}}),
    )
    .await;

    let result = make_client(Duration::from_secs(5))
        .verify_remote_artifact(&article_url(&server), &evaluated_at())
        .await;

    assert_eq!(result.verdict, VerificationVerdict::Unverifiable);
    assert_eq!(result.errors, vec!["events_by_artifact URL template missing".to_string()]);
}

#[tokio::test]
async fn missing_event_feed_is_unverifiable() {
    let server = MockServer::start().await;
    serve_json(
        &server,
        "/.well-known/provenance",
        json!({
            "spec_version": "1.1",
            "evidence_api": {"events_by_artifact": format!("{}/events/{{artifact_url}}", server.uri())}
        }),
    )
    .await;

    let result = make_client(Duration::from_secs(5))
        .verify_remote_artifact(&article_url(&server), &evaluated_at())
        .await;

    assert_eq!(result.verdict, VerificationVerdict::Unverifiable);
    assert_eq!(result.errors, vec!["events fetch failed: HTTP 404".to_string()]);
}

#[tokio::test]
async fn legacy_manifest_verifies() {
    let server = MockServer::start().await;
    let artifact = article_url(&server);
    serve_json(&server, "/.well-known/provenance", json!({"spec_version": "1.0"})).await;
    serve_json(
        &server,
        "/articles/a.provenance.json",
        json!({"artifact_url": artifact, "content_sha256": "a".repeat(64)}),
    )
    .await;

    let result = make_client(Duration::from_secs(5))
        .verify_remote_artifact(&artifact, &evaluated_at())
        .await;

    assert_eq!(result.verdict, VerificationVerdict::Verified);
    assert!(result.errors.is_empty());
}

#[tokio::test]
async fn legacy_manifest_uses_declared_suffix() {
    let server = MockServer::start().await;
    let artifact = article_url(&server);
    serve_json(
        &server,
        "/.well-known/provenance",
        json!({"artifact_discovery": {"suffix": ".vp"}}),
    )
    .await;
    serve_json(
        &server,
        "/articles/a.vp",
        json!({"artifact_url": artifact, "content_sha256": "a".repeat(64)}),
    )
    .await;

    let result = make_client(Duration::from_secs(5))
        .verify_remote_artifact(&artifact, &evaluated_at())
        .await;
    assert_eq!(result.verdict, VerificationVerdict::Verified);
}

#[tokio::test]
async fn legacy_manifest_for_another_artifact_is_invalid_input() {
    let server = MockServer::start().await;
    serve_json(&server, "/.well-known/provenance", json!({"spec_version": "1.0"})).await;
    serve_json(
        &server,
        "/articles/a.provenance.json",
        json!({"artifact_url": "https://elsewhere.example/articles/a", "content_sha256": "a".repeat(64)}),
    )
    .await;

    let result = make_client(Duration::from_secs(5))
        .verify_remote_artifact(&article_url(&server), &evaluated_at())
        .await;

    assert_eq!(result.verdict, VerificationVerdict::InvalidInput);
    assert_eq!(result.errors, vec!["manifest artifact_url mismatch".to_string()]);
}

#[tokio::test]
async fn legacy_manifest_with_bad_hash_is_invalid_input() {
    let server = MockServer::start().await;
    let artifact = article_url(&server);
    serve_json(&server, "/.well-known/provenance", json!({"spec_version": "1.0"})).await;
    serve_json(
        &server,
        "/articles/a.provenance.json",
        json!({"artifact_url": artifact, "content_sha256": "not-a-hash"}),
    )
    .await;

    let result = make_client(Duration::from_secs(5))
        .verify_remote_artifact(&artifact, &evaluated_at())
        .await;

    assert_eq!(result.verdict, VerificationVerdict::InvalidInput);
    assert_eq!(
        result.errors,
        vec!["manifest content_sha256 is not valid hex sha256".to_string()]
    );
}

#[tokio::test]
async fn legacy_signature_requirements() {
    let server = MockServer::start().await;
    let artifact = article_url(&server);
    serve_json(
        &server,
        "/.well-known/provenance",
        json!({"spec_version": "1.0", "policy": {"signature_required": true}}),
    )
    .await;
    serve_json(
        &server,
        "/articles/a.provenance.json",
        json!({"artifact_url": artifact, "content_sha256": "a".repeat(64), "signature": {"value": "c2ln"}}),
    )
    .await;
    serve_json(
        &server,
        "/articles/b.provenance.json",
        json!({"artifact_url": format!("{}/articles/b", server.uri()), "content_sha256": "a".repeat(64)}),
    )
    .await;

    let client = make_client(Duration::from_secs(5));
    let signed = client.verify_remote_artifact(&artifact, &evaluated_at()).await;
    assert_eq!(signed.verdict, VerificationVerdict::Unverifiable);

    let unsigned = client
        .verify_remote_artifact(&format!("{}/articles/b", server.uri()), &evaluated_at())
        .await;
    assert_eq!(unsigned.verdict, VerificationVerdict::PolicyViolation);
    assert_eq!(unsigned.errors, vec!["signature required but missing".to_string()]);
}

#[tokio::test]
async fn missing_legacy_manifest_is_unverifiable() {
    let server = MockServer::start().await;
    serve_json(&server, "/.well-known/provenance", json!({"spec_version": "1.0"})).await;

    let result = make_client(Duration::from_secs(5))
        .verify_remote_artifact(&article_url(&server), &evaluated_at())
        .await;

    assert_eq!(result.verdict, VerificationVerdict::Unverifiable);
    assert_eq!(result.errors, vec!["manifest fetch failed: HTTP 404".to_string()]);
}
