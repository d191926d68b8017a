// Signing key access for proof creation
//
// Key custody lives outside this crate. The signer only asks a KeyStore for
// the key behind a verification method.

use std::collections::HashMap;

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand_core::OsRng;

/// Generates a new Ed25519 keypair using secure random bytes from the OS.
pub fn generate_keypair() -> (SigningKey, VerifyingKey) {
    let signing_key = SigningKey::generate(&mut OsRng);
    let verifying_key = signing_key.verifying_key();
    (signing_key, verifying_key)
}

/// Source of signing keys, addressed by verification method.
pub trait KeyStore: Send + Sync {
    /// Returns the signing key for `verification_method`, if this store holds it.
    fn signing_key(&self, verification_method: &str) -> Option<SigningKey>;
}

impl<K: KeyStore + ?Sized> KeyStore for std::sync::Arc<K> {
    fn signing_key(&self, verification_method: &str) -> Option<SigningKey> {
        (**self).signing_key(verification_method)
    }
}

/// In-memory key store.
#[derive(Default, Clone)]
pub struct Keyring {
    keys: HashMap<String, SigningKey>,
}

impl Keyring {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `signing_key` under `verification_method`, replacing any previous key.
    pub fn insert(&mut self, verification_method: impl Into<String>, signing_key: SigningKey) {
        self.keys.insert(verification_method.into(), signing_key);
    }

    pub fn with_key(mut self, verification_method: impl Into<String>, signing_key: SigningKey) -> Self {
        self.insert(verification_method, signing_key);
        self
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl std::fmt::Debug for Keyring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // never print key material
        f.debug_struct("Keyring")
            .field("verification_methods", &self.keys.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl KeyStore for Keyring {
    fn signing_key(&self, verification_method: &str) -> Option<SigningKey> {
        self.keys.get(verification_method).cloned()
    }
}
