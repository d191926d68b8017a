// Content digests for attested resources

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::ResourceError;
use crate::jcs::jcs_canonical_bytes;

/// Multihash header for SHA2-256: 0x12 = sha2-256, 0x20 = 32-byte length.
const SHA2_256_MULTIHASH_PREFIX: [u8; 2] = [0x12, 0x20];

/// Multibase prefix for base58btc.
const BASE58BTC_PREFIX: char = 'z';

/// Computes the SHA-256 hash of the input bytes.
pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}

/// Computes the SHA-256 hash of the input bytes and returns it as a lowercase hex string.
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(sha256(bytes))
}

/// Hashes `bytes` with SHA-256 and encodes the result as a base58btc multibase multihash.
///
/// The output always starts with `zQm`, which tells a resolver the hash
/// function without any external context.
pub fn multihash_multibase(bytes: &[u8]) -> String {
    let mut multihash = Vec::with_capacity(SHA2_256_MULTIHASH_PREFIX.len() + 32);
    multihash.extend_from_slice(&SHA2_256_MULTIHASH_PREFIX);
    multihash.extend_from_slice(&sha256(bytes));

    format!("{}{}", BASE58BTC_PREFIX, bs58::encode(multihash).into_string())
}

/// Computes the content digest of a resource payload.
///
/// The payload is canonicalized with JCS first, so logically equal mappings
/// produce the same digest regardless of key order.
pub fn digest_multibase<T: Serialize + ?Sized>(content: &T) -> Result<String, ResourceError> {
    let canonical = jcs_canonical_bytes(content)?;
    Ok(multihash_multibase(&canonical))
}
