//! Integration tests for the resource endpoints.
//!
//! Requests are driven through the router with `oneshot`, no socket needed.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use ed25519_dalek::SigningKey;
use serde_json::{json, Value};
use tower::ServiceExt;
use webvh_crypto::{
    build_resource, content_map, did_key_verification_method, sign_attested_resource, AttestedResource, Keyring,
    ProofOptions, ResourceType,
};
use webvh_server::{create_router, ResourceStore};

/// Helper to read a response body.
async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body")
        .to_vec()
}

async fn json_body(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("Failed to parse JSON response")
}

/// Creates a resource signed by a did:key verification method.
fn create_secured_resource(seed: u8) -> AttestedResource {
    let signing_key = SigningKey::from_bytes(&[seed; 32]);
    let vm = did_key_verification_method(&signing_key.verifying_key());
    let keyring = Keyring::new().with_key(vm.clone(), signing_key);

    let resource = build_resource(
        "did:webvh:example.com",
        ResourceType::AnonCredsSchema,
        content_map(&json!({
            "issuerId": "did:webvh:example.com",
            "attrNames": ["name", "age"],
            "name": "PersonSchema",
            "version": "1.0"
        }))
        .unwrap(),
        vec![],
    )
    .unwrap();

    sign_attested_resource(&resource, &ProofOptions::default().with_verification_method(vm), &keyring).unwrap()
}

fn post_resource(body: &impl serde::Serialize) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/resources")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Percent-encodes a resource id as a single path segment.
fn encode_id(id: &str) -> String {
    id.replace('/', "%2F")
}

#[tokio::test]
async fn test_register_then_resolve() {
    let store = ResourceStore::new();
    let app = create_router(store.clone());
    let secured = create_secured_resource(0x42);

    let response = app.clone().oneshot(post_resource(&secured)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(json_body(response).await, json!({"id": secured.id}));

    let response = app
        .clone()
        .oneshot(get(&format!("/resources/{}", encode_id(&secured.id))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let resolved: AttestedResource = serde_json::from_value(json_body(response).await).unwrap();
    assert_eq!(resolved, secured);
}

#[tokio::test]
async fn test_resolve_by_digest_path() {
    let store = ResourceStore::new();
    let app = create_router(store.clone());
    let secured = create_secured_resource(0x42);
    store.insert(secured.clone()).await;

    let response = app
        .oneshot(get(&format!("/resources/{}.json", secured.digest())))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], secured.id);
}

#[tokio::test]
async fn test_resubmission_is_idempotent() {
    let store = ResourceStore::new();
    let app = create_router(store.clone());
    let secured = create_secured_resource(0x42);

    let first = app.clone().oneshot(post_resource(&secured)).await.unwrap();
    let second = app.clone().oneshot(post_resource(&secured)).await.unwrap();

    assert_eq!(first.status(), StatusCode::CREATED);
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(json_body(second).await, json!({"id": secured.id}));
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_rejects_tampered_content() {
    let store = ResourceStore::new();
    let app = create_router(store.clone());
    let mut secured = create_secured_resource(0x42);
    secured
        .resource_content
        .insert("version".to_string(), json!("2.0"));

    let response = app.oneshot(post_resource(&secured)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(message.contains("digest mismatch"), "got: {}", message);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_rejects_unsigned_resource() {
    let store = ResourceStore::new();
    let app = create_router(store.clone());
    let unsigned = create_secured_resource(0x42).unsecured();

    let response = app.oneshot(post_resource(&unsigned)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_rejects_forged_did_key_proof() {
    let store = ResourceStore::new();
    let app = create_router(store.clone());
    let mut secured = create_secured_resource(0x42);
    // claim a different did:key than the one that signed
    secured.proof[0].verification_method =
        did_key_verification_method(&SigningKey::from_bytes(&[0x07; 32]).verifying_key());

    let response = app.oneshot(post_resource(&secured)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let message = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(message.contains("signature verification failed"), "got: {}", message);
}

#[tokio::test]
async fn test_rejects_malformed_body() {
    let app = create_router(ResourceStore::new());

    let response = app
        .oneshot(post_resource(&json!({"id": "did:webvh:example.com/resources/zQm.json"})))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_unknown_resource_is_404() {
    let app = create_router(ResourceStore::new());

    let response = app
        .clone()
        .oneshot(get(&format!(
            "/resources/{}",
            encode_id("did:webvh:example.com/resources/zQmMissing.json")
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get("/resources/zQmMissing.json")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health() {
    let app = create_router(ResourceStore::new());

    let response = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"status": "ok"}));
}
