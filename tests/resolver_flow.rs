//! End-to-end tests for the secret resolution flow.
//!
//! These tests exercise the full catalog → `SecretResolver` →
//! `HttpSecretStoreClient` pipeline against a wiremock HTTP server instead
//! of a real secret manager, so the whole path works without credentials
//! or network access.

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use configvault::catalog::{ConfigCatalog, EntityAttributes};
use configvault::secrets::{HttpSecretStoreClient, SecretFetchError, SecretResolver};

/// Catalog with one secret-backed property served by the mock store.
fn build_catalog(store_url: &str, api_key: Option<&str>) -> ConfigCatalog {
    let mut catalog = ConfigCatalog::from_document(json!({
        "properties": [
            {
                "propertyId": "db-cred",
                "name": "Database credential",
                "value": {"secret_type": "vault"},
                "entityOverrides": {
                    "E1": {"value": {"id": "sec-42"}},
                    "E2": {"value": {"id": "sec-43"}}
                },
                "rules": [
                    {
                        "attribute": "env",
                        "equals": "prod",
                        "value": {"value": {"id": "sec-prod"}}
                    }
                ]
            },
            {
                "propertyId": "plain-flag",
                "name": "Plain flag",
                "value": {"enabled": true},
                "defaultValue": {"value": {"id": "unreachable"}}
            }
        ]
    }))
    .expect("catalog document should parse");

    let mut client = HttpSecretStoreClient::new(store_url.to_string());
    if let Some(key) = api_key {
        client = client.with_api_key(key.to_string());
    }
    let client = Arc::new(client);
    catalog.register_secret_client("db-cred", client.clone());
    catalog.register_secret_client("plain-flag", client);
    catalog
}

#[tokio::test]
async fn resolves_secret_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/secrets/vault/sec-42"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"secret_value": "hunter2"}))
                .insert_header("x-request-id", "req-1"),
        )
        .mount(&server)
        .await;

    let catalog = Arc::new(build_catalog(&server.uri(), None));
    let resolver = SecretResolver::new("db-cred", catalog);

    let fetch = resolver
        .resolve("E1", &EntityAttributes::new())
        .expect("all gates should pass");
    let response = fetch.await.expect("fetch should succeed");

    assert_eq!(response.status_code, 200);
    assert_eq!(response.status_text, "OK");
    assert_eq!(response.body, json!({"secret_value": "hunter2"}));
    assert_eq!(
        response.headers.get("x-request-id").map(String::as_str),
        Some("req-1")
    );
}

#[tokio::test]
async fn backend_failure_passes_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/secrets/vault/sec-43"))
        .respond_with(ResponseTemplate::new(500).set_body_string("store on fire"))
        .mount(&server)
        .await;

    let catalog = Arc::new(build_catalog(&server.uri(), None));
    let resolver = SecretResolver::new("db-cred", catalog);

    // The resolver still yields a pending fetch: the failure belongs to
    // the caller, not to the resolution gates.
    let fetch = resolver
        .resolve("E2", &EntityAttributes::new())
        .expect("all gates should pass");

    match fetch.await.unwrap_err() {
        SecretFetchError::Status { status_code, body } => {
            assert_eq!(status_code, 500);
            assert_eq!(body, "store on fire");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/secrets/vault/sec-42"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let catalog = Arc::new(build_catalog(&server.uri(), Some("test-key")));
    let resolver = SecretResolver::new("db-cred", catalog);

    let fetch = resolver
        .resolve("E1", &EntityAttributes::new())
        .expect("all gates should pass");
    let response = fetch.await.expect("authenticated fetch should succeed");
    assert_eq!(response.body, json!({"ok": true}));
}

#[tokio::test]
async fn targeting_rule_selects_secret_instance() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/secrets/vault/sec-prod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"secret_value": "prod"})))
        .mount(&server)
        .await;

    let catalog = Arc::new(build_catalog(&server.uri(), None));
    let resolver = SecretResolver::new("db-cred", catalog);

    let mut attrs = EntityAttributes::new();
    attrs.insert("env".into(), json!("prod"));

    let fetch = resolver
        .resolve("E-unknown", &attrs)
        .expect("rule should produce a secret reference");
    let response = fetch.await.expect("fetch should succeed");
    assert_eq!(response.body["secret_value"], "prod");
}

#[tokio::test]
async fn non_secret_property_never_reaches_the_store() {
    let server = MockServer::start().await;
    // No mocks mounted: any request would 404 and fail the assertions below.

    let catalog = Arc::new(build_catalog(&server.uri(), None));
    let resolver = SecretResolver::new("plain-flag", catalog);

    assert!(resolver.resolve("E1", &EntityAttributes::new()).is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn non_json_payload_carried_as_string() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/secrets/vault/sec-42"))
        .respond_with(ResponseTemplate::new(200).set_body_string("-----BEGIN KEY-----"))
        .mount(&server)
        .await;

    let catalog = Arc::new(build_catalog(&server.uri(), None));
    let resolver = SecretResolver::new("db-cred", catalog);

    let fetch = resolver
        .resolve("E1", &EntityAttributes::new())
        .expect("all gates should pass");
    let response = fetch.await.expect("fetch should succeed");
    assert_eq!(response.body, json!("-----BEGIN KEY-----"));
}
