// Proof verification for attested resources
//
// Verification is the caller's policy decision; the registry itself never
// runs it on resolution. This module gives callers the matching half of the
// signing contract in sign.rs.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use crate::did::did_to_verifying_key;
use crate::error::ResourceError;
use crate::resource::check_integrity;
use crate::sign::proof_hash_data;
use crate::types::{AttestedResource, DataIntegrityProof, DATA_INTEGRITY_PROOF, EDDSA_JCS_2022};

/// Verifies one proof of `resource` against `verifying_key`.
///
/// This function:
/// 1. Checks the proof type and cryptosuite
/// 2. Decodes the multibase `proofValue` into a 64-byte signature
/// 3. Recomputes the hash data over the unsigned resource
/// 4. Verifies the Ed25519 signature
pub fn verify_proof(
    resource: &AttestedResource,
    proof: &DataIntegrityProof,
    verifying_key: &VerifyingKey,
) -> Result<(), ResourceError> {
    if proof.proof_type != DATA_INTEGRITY_PROOF {
        return Err(ResourceError::InvalidProof(format!(
            "unsupported proof type '{}' (expected '{}')",
            proof.proof_type, DATA_INTEGRITY_PROOF
        )));
    }

    if proof.cryptosuite != EDDSA_JCS_2022 {
        return Err(ResourceError::InvalidProof(format!(
            "unsupported cryptosuite '{}' (expected '{}')",
            proof.cryptosuite, EDDSA_JCS_2022
        )));
    }

    let encoded = proof
        .proof_value
        .strip_prefix('z')
        .ok_or_else(|| ResourceError::InvalidProof("proofValue is not base58btc multibase".to_string()))?;

    let signature_bytes = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| ResourceError::InvalidProof(format!("invalid base58 proofValue: {}", e)))?;

    let signature_array: [u8; 64] = signature_bytes
        .try_into()
        .map_err(|_| ResourceError::InvalidProof("invalid signature length: expected 64 bytes".to_string()))?;

    let signature = Signature::from_bytes(&signature_array);
    let hash_data = proof_hash_data(resource, proof)?;

    verifying_key
        .verify(&hash_data, &signature)
        .map_err(|_| ResourceError::InvalidProof("signature verification failed".to_string()))
}

/// Checks content integrity and verifies every proof on `resource`.
///
/// `resolve_key` maps each proof's verification method to its public key;
/// DID document resolution is left to the caller.
pub fn verify_attested_resource<F>(resource: &AttestedResource, resolve_key: F) -> Result<(), ResourceError>
where
    F: Fn(&str) -> Result<VerifyingKey, ResourceError>,
{
    check_integrity(resource)?;

    if resource.proof.is_empty() {
        return Err(ResourceError::InvalidProof("resource carries no proof".to_string()));
    }

    for proof in &resource.proof {
        let verifying_key = resolve_key(&proof.verification_method)?;
        verify_proof(resource, proof, &verifying_key)?;
    }

    Ok(())
}

/// Resolves a verification method to a key without network access.
///
/// Only did:key methods are self-describing; anything else needs the
/// issuer's DID document.
pub fn verifying_key_for(verification_method: &str) -> Result<VerifyingKey, ResourceError> {
    did_to_verifying_key(verification_method)
}
