// Roundtrip test for building, signing and verifying attested resources
//
// This test validates that:
// 1. A fresh identity can secure a resource
// 2. The proof verifies immediately, including after a JSON round trip
// 3. Tampered resources fail verification

use chrono::Utc;
use serde_json::json;
use webvh_crypto::{
    build_resource, check_integrity, content_map, did_key_verification_method, digest_multibase,
    generate_keypair, sign_attested_resource, verify_attested_resource, verify_proof, verifying_key_for,
    AttestedResource, Keyring, ProofOptions, ResourceError, ResourceType,
};

const ISSUER: &str = "did:webvh:example.com";

fn secure(content: serde_json::Value) -> (AttestedResource, ed25519_dalek::VerifyingKey) {
    let (signing_key, verifying_key) = generate_keypair();
    let vm = did_key_verification_method(&verifying_key);
    let keyring = Keyring::new().with_key(vm.clone(), signing_key);

    let resource = build_resource(
        ISSUER,
        ResourceType::AnonCredsSchema,
        content_map(&content).expect("object content"),
        vec![],
    )
    .expect("build should succeed");

    let secured = sign_attested_resource(
        &resource,
        &ProofOptions::default().with_verification_method(vm),
        &keyring,
    )
    .expect("signing should succeed");

    (secured, verifying_key)
}

#[test]
fn test_signing_roundtrip() {
    let content = json!({
        "issuerId": ISSUER,
        "attrNames": ["name", "age"],
        "name": "PersonSchema",
        "version": "1.0"
    });
    let (secured, verifying_key) = secure(content.clone());

    assert_eq!(
        secured.id,
        format!("{}/resources/{}.json", ISSUER, digest_multibase(&content).unwrap())
    );
    assert!(check_integrity(&secured).is_ok());

    verify_proof(&secured, &secured.proof[0], &verifying_key).expect("proof should verify");
}

#[test]
fn test_roundtrip_through_json() {
    let (secured, _) = secure(json!({"name": "PersonSchema", "version": "1.0"}));

    let wire = serde_json::to_string_pretty(&secured).expect("serialize");
    let parsed: AttestedResource = serde_json::from_str(&wire).expect("deserialize");

    assert_eq!(parsed, secured);
    verify_attested_resource(&parsed, verifying_key_for).expect("proof should survive JSON round trip");
}

#[test]
fn test_tampered_content_fails_verification() {
    let (mut secured, verifying_key) = secure(json!({"name": "PersonSchema", "version": "1.0"}));

    secured
        .resource_content
        .insert("name".to_string(), json!("EvilSchema"));

    // the content no longer matches the address
    assert!(matches!(
        verify_attested_resource(&secured, verifying_key_for),
        Err(ResourceError::DigestMismatch { .. })
    ));
    // and the signature no longer covers the document
    assert!(verify_proof(&secured, &secured.proof[0], &verifying_key).is_err());
}

#[test]
fn test_different_keys_produce_different_proofs() {
    let content = json!({"name": "PersonSchema", "version": "1.0"});
    let (first, _) = secure(content.clone());
    let (second, _) = secure(content);

    // same content, same address
    assert_eq!(first.id, second.id);
    assert_ne!(first.proof[0].proof_value, second.proof[0].proof_value);
    assert_ne!(
        first.proof[0].verification_method,
        second.proof[0].verification_method
    );
}

#[test]
fn test_proof_created_is_recent() {
    let (secured, _) = secure(json!({"name": "PersonSchema"}));
    let created = chrono::DateTime::parse_from_rfc3339(secured.proof[0].created.as_deref().expect("created is set")).expect("rfc3339");
    assert!((Utc::now() - created.with_timezone(&Utc)).num_seconds() < 60);
}
