// did:key and Multikey encodings for Ed25519 verification methods
// Multicodec 0xed01, multibase base58btc

use ed25519_dalek::VerifyingKey;

use crate::error::ResourceError;

/// Multicodec prefix for Ed25519 public keys
/// 0xed = Ed25519, 0x01 = varint encoding of the codec
const ED25519_MULTICODEC_PREFIX: [u8; 2] = [0xed, 0x01];

const DID_KEY_PREFIX: &str = "did:key:";

/// Encodes an Ed25519 public key as a Multikey `publicKeyMultibase` value (`z6Mk...`).
pub fn public_key_multibase(public_key: &VerifyingKey) -> String {
    let pubkey_bytes = public_key.as_bytes();

    let mut multicodec_bytes = Vec::with_capacity(2 + pubkey_bytes.len());
    multicodec_bytes.extend_from_slice(&ED25519_MULTICODEC_PREFIX);
    multicodec_bytes.extend_from_slice(pubkey_bytes);

    format!("z{}", bs58::encode(&multicodec_bytes).into_string())
}

/// Converts an Ed25519 public key to a did:key identifier.
pub fn pubkey_to_did(public_key: &VerifyingKey) -> String {
    format!("{}{}", DID_KEY_PREFIX, public_key_multibase(public_key))
}

/// The did:key verification method for a key: `did:key:z6Mk...#z6Mk...`.
pub fn did_key_verification_method(public_key: &VerifyingKey) -> String {
    let multibase = public_key_multibase(public_key);
    format!("{}{}#{}", DID_KEY_PREFIX, multibase, multibase)
}

/// Decodes a Multikey `publicKeyMultibase` value back into a verifying key.
pub fn multibase_to_verifying_key(multibase: &str) -> Result<VerifyingKey, ResourceError> {
    let encoded = multibase.strip_prefix('z').ok_or_else(|| {
        ResourceError::InvalidKey(format!("'{}' is not base58btc multibase", multibase))
    })?;

    let decoded = bs58::decode(encoded)
        .into_vec()
        .map_err(|e| ResourceError::InvalidKey(format!("invalid base58: {}", e)))?;

    let key_bytes = decoded
        .strip_prefix(&ED25519_MULTICODEC_PREFIX)
        .ok_or_else(|| ResourceError::InvalidKey("not an Ed25519 multikey".to_string()))?;

    let key_array: [u8; 32] = key_bytes
        .try_into()
        .map_err(|_| ResourceError::InvalidKey("Ed25519 keys are 32 bytes".to_string()))?;

    VerifyingKey::from_bytes(&key_array).map_err(|e| ResourceError::InvalidKey(e.to_string()))
}

/// Resolves a did:key identifier or verification method (fragment allowed) to its key.
pub fn did_to_verifying_key(did: &str) -> Result<VerifyingKey, ResourceError> {
    let method_specific = did
        .strip_prefix(DID_KEY_PREFIX)
        .ok_or_else(|| ResourceError::InvalidKey(format!("'{}' is not a did:key", did)))?;
    let multibase = method_specific.split('#').next().unwrap_or_default();
    multibase_to_verifying_key(multibase)
}
