// Golden vector integration test for attested resources
//
// Validates the implementation against the canonical test vector in
// fixtures/golden_vectors.json. If any value differs the test MUST fail;
// other implementations of the registry check against the same file.

use chrono::{DateTime, Utc};
use ed25519_dalek::SigningKey;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use webvh_crypto::{
    build_resource, digest_multibase, jcs_canonical_bytes, public_key_multibase, sign_attested_resource,
    verify_attested_resource, verifying_key_for, Keyring, ProofOptions, ResourceType,
};

/// Structure for parsing the golden vector file
#[derive(Deserialize)]
struct GoldenVector {
    seed_hex: String,
    public_key_hex: String,
    public_key_multibase: String,
    verification_method: String,
    issuer_id: String,
    resource_content: Map<String, Value>,
    canonical_content: String,
    digest_multibase: String,
    resource_id: String,
    created: String,
    canonical_document: String,
    proof_value: String,
}

fn load_golden_vector() -> GoldenVector {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/golden_vectors.json");
    let content = fs::read_to_string(path).expect("Failed to read golden_vectors.json");
    serde_json::from_str(&content).expect("Failed to parse golden_vectors.json")
}

fn signing_key(golden: &GoldenVector) -> SigningKey {
    let seed_bytes: [u8; 32] = hex::decode(&golden.seed_hex)
        .expect("valid seed hex")
        .try_into()
        .expect("32 bytes");
    SigningKey::from_bytes(&seed_bytes)
}

fn proof_options(golden: &GoldenVector) -> ProofOptions {
    let created: DateTime<Utc> = golden.created.parse().expect("valid created timestamp");
    ProofOptions::default()
        .with_verification_method(golden.verification_method.clone())
        .with_created(created)
}

#[test]
fn test_public_key_encoding() {
    let golden = load_golden_vector();
    let verifying_key = signing_key(&golden).verifying_key();

    assert_eq!(
        hex::encode(verifying_key.as_bytes()),
        golden.public_key_hex,
        "Public key derivation mismatch"
    );
    assert_eq!(
        public_key_multibase(&verifying_key),
        golden.public_key_multibase,
        "Multikey encoding mismatch"
    );
}

#[test]
fn test_content_canonicalization_and_digest() {
    let golden = load_golden_vector();

    let canonical = jcs_canonical_bytes(&golden.resource_content).expect("canonicalization");
    assert_eq!(
        String::from_utf8(canonical).expect("utf8"),
        golden.canonical_content,
        "JCS canonicalization mismatch"
    );

    assert_eq!(
        digest_multibase(&golden.resource_content).expect("digest"),
        golden.digest_multibase,
        "Content digest mismatch"
    );
}

#[test]
fn test_resource_identifier() {
    let golden = load_golden_vector();

    let resource = build_resource(
        &golden.issuer_id,
        ResourceType::AnonCredsSchema,
        golden.resource_content.clone(),
        vec![],
    )
    .expect("build");

    assert_eq!(resource.id, golden.resource_id);

    let canonical = jcs_canonical_bytes(&resource).expect("canonicalization");
    assert_eq!(
        String::from_utf8(canonical).expect("utf8"),
        golden.canonical_document,
        "Unsigned document canonicalization mismatch"
    );
}

#[test]
fn test_proof_generation() {
    let golden = load_golden_vector();
    let keyring = Keyring::new().with_key(golden.verification_method.clone(), signing_key(&golden));

    let resource = build_resource(
        &golden.issuer_id,
        ResourceType::AnonCredsSchema,
        golden.resource_content.clone(),
        vec![],
    )
    .expect("build");

    let secured = sign_attested_resource(&resource, &proof_options(&golden), &keyring).expect("sign");

    assert_eq!(
        secured.proof[0].proof_value, golden.proof_value,
        "proofValue mismatch - this is critical for cross-implementation compatibility"
    );
}

#[test]
fn test_proof_verification() {
    let golden = load_golden_vector();

    let mut resource = build_resource(
        &golden.issuer_id,
        ResourceType::AnonCredsSchema,
        golden.resource_content.clone(),
        vec![],
    )
    .expect("build");

    // attach the golden proof by hand, then verify it from scratch
    resource.proof.push(webvh_crypto::DataIntegrityProof {
        proof_type: "DataIntegrityProof".to_string(),
        cryptosuite: "eddsa-jcs-2022".to_string(),
        created: Some(golden.created.clone()),
        verification_method: golden.verification_method.clone(),
        proof_purpose: "assertionMethod".to_string(),
        proof_value: golden.proof_value.clone(),
        extra: Default::default(),
    });

    verify_attested_resource(&resource, verifying_key_for)
        .expect("Proof verification should succeed with golden vector");
}
