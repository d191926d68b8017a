//! Error type for resource construction, signing and verification.

/// Errors raised while building, signing or checking an attested resource.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// An issuer or resource identifier does not follow the did:webvh scheme.
    #[error("invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    #[error("resource content must be a JSON object")]
    ContentNotObject,

    #[error("signing requires a verification method")]
    MissingVerificationMethod,

    /// The key store holds no signing key for the requested verification method.
    #[error("no signing key available for verification method '{0}'")]
    UnknownVerificationMethod(String),

    #[error("invalid proof options: {0}")]
    InvalidProofOptions(String),

    #[error("digest mismatch: resource declares {declared}, content hashes to {computed}")]
    DigestMismatch { declared: String, computed: String },

    #[error("identifier mismatch: expected '{expected}', found '{found}'")]
    IdentifierMismatch { expected: String, found: String },

    #[error("invalid proof: {0}")]
    InvalidProof(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("canonicalization failed: {0}")]
    Canonicalization(#[from] serde_json::Error),
}
