// Proof creation for attested resources
//
// This module implements the eddsa-jcs-2022 signing contract over the
// canonical form of an unsigned resource.

use chrono::{SecondsFormat, Utc};
use ed25519_dalek::Signer;
use serde_json::{Map, Value};

use crate::error::ResourceError;
use crate::hash::sha256;
use crate::jcs::jcs_canonical_bytes;
use crate::keys::KeyStore;
use crate::types::{AttestedResource, DataIntegrityProof, ProofOptions, DATA_INTEGRITY_PROOF, EDDSA_JCS_2022};

/// Computes the bytes a proof signs: `SHA256(JCS(proof config)) || SHA256(JCS(document))`.
///
/// The proof config is `proof` with an empty `proofValue`; the document is
/// `resource` with every proof removed.
pub(crate) fn proof_hash_data(
    resource: &AttestedResource,
    proof: &DataIntegrityProof,
) -> Result<Vec<u8>, ResourceError> {
    let mut proof_config = proof.clone();
    proof_config.proof_value = String::new();

    let config_hash = sha256(&jcs_canonical_bytes(&proof_config)?);
    let document_hash = sha256(&jcs_canonical_bytes(&resource.unsecured())?);

    let mut hash_data = Vec::with_capacity(config_hash.len() + document_hash.len());
    hash_data.extend_from_slice(&config_hash);
    hash_data.extend_from_slice(&document_hash);
    Ok(hash_data)
}

/// Signs a resource and returns the secured copy with the new proof appended.
///
/// This function:
/// 1. Checks that a verification method was supplied and the suite is supported
/// 2. Looks up the signing key for that verification method
/// 3. Builds the proof configuration (`created` defaults to now; `domain` and
///    `expires` are copied when set)
/// 4. Hashes the canonical proof configuration and unsigned resource
/// 5. Signs with Ed25519 and stores the base58btc multibase signature as `proofValue`
///
/// Signing is deterministic for identical inputs and `created`.
///
/// # Errors
/// * [`ResourceError::MissingVerificationMethod`] if the option is absent or blank
/// * [`ResourceError::UnknownVerificationMethod`] if `keys` has no key for it
/// * [`ResourceError::InvalidProofOptions`] for an unsupported type or cryptosuite
pub fn sign_attested_resource<K: KeyStore + ?Sized>(
    resource: &AttestedResource,
    options: &ProofOptions,
    keys: &K,
) -> Result<AttestedResource, ResourceError> {
    let verification_method = options
        .verification_method
        .as_deref()
        .map(str::trim)
        .filter(|vm| !vm.is_empty())
        .ok_or(ResourceError::MissingVerificationMethod)?;

    if options.proof_type != DATA_INTEGRITY_PROOF {
        return Err(ResourceError::InvalidProofOptions(format!(
            "unsupported proof type '{}' (expected '{}')",
            options.proof_type, DATA_INTEGRITY_PROOF
        )));
    }
    if options.cryptosuite != EDDSA_JCS_2022 {
        return Err(ResourceError::InvalidProofOptions(format!(
            "unsupported cryptosuite '{}' (expected '{}')",
            options.cryptosuite, EDDSA_JCS_2022
        )));
    }

    let signing_key = keys
        .signing_key(verification_method)
        .ok_or_else(|| ResourceError::UnknownVerificationMethod(verification_method.to_string()))?;

    let created = options
        .created
        .unwrap_or_else(Utc::now)
        .to_rfc3339_opts(SecondsFormat::Secs, true);

    let mut extra = Map::new();
    if let Some(domain) = &options.domain {
        extra.insert("domain".to_string(), Value::String(domain.clone()));
    }
    if let Some(expires) = options.expires {
        extra.insert(
            "expires".to_string(),
            Value::String(expires.to_rfc3339_opts(SecondsFormat::Secs, true)),
        );
    }

    let mut proof = DataIntegrityProof {
        proof_type: options.proof_type.clone(),
        cryptosuite: options.cryptosuite.clone(),
        created: Some(created),
        verification_method: verification_method.to_string(),
        proof_purpose: options.proof_purpose.clone(),
        proof_value: String::new(),
        extra,
    };

    let hash_data = proof_hash_data(resource, &proof)?;
    let signature = signing_key.sign(&hash_data);
    proof.proof_value = format!("z{}", bs58::encode(signature.to_bytes()).into_string());

    tracing::debug!(id = %resource.id, %verification_method, "attached proof");

    let mut secured = resource.clone();
    secured.proof.push(proof);
    Ok(secured)
}
