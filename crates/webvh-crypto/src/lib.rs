// webvh-crypto - Content addressing and Data Integrity proofs for did:webvh attested resources

pub mod did;
pub mod error;
pub mod hash;
pub mod identifier;
pub mod jcs;
pub mod keys;
pub mod resource;
pub mod sign;
pub mod types;
pub mod verify;

pub use did::{did_key_verification_method, did_to_verifying_key, public_key_multibase, pubkey_to_did};
pub use error::ResourceError;
pub use hash::{digest_multibase, multihash_multibase, sha256_hex};
pub use identifier::{matches, parse_resource_id, resource_id, resource_url, ResourceId, WEBVH_DID_PATTERN};
pub use jcs::jcs_canonical_bytes;
pub use keys::{generate_keypair, KeyStore, Keyring};
pub use resource::{build_resource, check_integrity, content_map};
pub use sign::sign_attested_resource;
pub use types::{AttestedResource, DataIntegrityProof, ProofOptions, ResourceMetadata, ResourceType};
pub use verify::{verify_attested_resource, verify_proof, verifying_key_for};
