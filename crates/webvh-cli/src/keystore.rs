// Keystore module - manages the signing identity on disk using age encryption
//
// Layout under ~/.webvh/identity/ (or $WEBVH_HOME/identity/):
//   identity.json      public identity info
//   identity.key.age   passphrase-encrypted Ed25519 seed

use age::secrecy::SecretString;
use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use ed25519_dalek::SigningKey;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use webvh_crypto::{did_key_verification_method, generate_keypair, identifier, public_key_multibase};

const IDENTITY_FILE: &str = "identity.json";
const KEY_FILE: &str = "identity.key.age";

/// Public half of the local identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityInfo {
    /// did:webvh identifier resources are published under.
    pub issuer_id: String,
    /// Verification method written into proofs.
    pub verification_method: String,
    pub public_key_multibase: String,
    pub created_at: DateTime<Utc>,
}

/// Default identity directory: `$WEBVH_HOME/identity` or `~/.webvh/identity`.
pub fn identity_dir() -> Result<PathBuf> {
    if let Ok(home) = std::env::var("WEBVH_HOME") {
        return Ok(PathBuf::from(home).join("identity"));
    }

    #[cfg(unix)]
    let home = std::env::var("HOME").map_err(|_| anyhow!("HOME environment variable not set"))?;

    #[cfg(windows)]
    let home = std::env::var("USERPROFILE").map_err(|_| anyhow!("USERPROFILE environment variable not set"))?;

    Ok(PathBuf::from(home).join(".webvh").join("identity"))
}

/// Encrypts private key bytes with a passphrase using age encryption.
pub fn encrypt_key(key_bytes: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    let encryptor = age::Encryptor::with_user_passphrase(SecretString::from(passphrase.to_string()));

    let mut encrypted = vec![];
    let mut writer = encryptor
        .wrap_output(&mut encrypted)
        .context("Failed to create age encryptor")?;

    writer
        .write_all(key_bytes)
        .context("Failed to write key bytes to encryptor")?;

    writer.finish().context("Failed to finalize encryption")?;

    Ok(encrypted)
}

/// Decrypts bytes produced by [`encrypt_key`].
pub fn decrypt_key(encrypted: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    let decryptor = match age::Decryptor::new(encrypted).context("Failed to read encrypted key")? {
        age::Decryptor::Passphrase(d) => d,
        _ => bail!("Key file is not passphrase-encrypted"),
    };

    let mut decrypted = vec![];
    let mut reader = decryptor
        .decrypt(&SecretString::from(passphrase.to_string()), None)
        .map_err(|_| anyhow!("Wrong passphrase or corrupted key file"))?;

    reader
        .read_to_end(&mut decrypted)
        .context("Failed to read decrypted bytes")?;

    Ok(decrypted)
}

/// Creates a new identity in `dir`.
///
/// With `key_id`, proofs name `{issuer_id}#{key_id}`; the issuer's DID
/// document must then list the key. Without it the did:key method is used,
/// which any verifier can resolve offline.
pub fn init_identity_at(
    dir: &Path,
    issuer_id: &str,
    key_id: Option<&str>,
    passphrase: &str,
    force: bool,
) -> Result<IdentityInfo> {
    let issuer_id = issuer_id.trim();
    if identifier::ensure_issuer_did(issuer_id).is_err() {
        bail!("'{}' is not a did:webvh issuer identifier", issuer_id);
    }

    let info_path = dir.join(IDENTITY_FILE);
    if info_path.exists() && !force {
        bail!(
            "Identity already exists at {}. Use --force to overwrite.",
            dir.display()
        );
    }

    let (signing_key, verifying_key) = generate_keypair();
    let verification_method = match key_id {
        Some(key_id) => format!("{}#{}", issuer_id, key_id.trim_start_matches('#')),
        None => did_key_verification_method(&verifying_key),
    };

    let info = IdentityInfo {
        issuer_id: issuer_id.to_string(),
        verification_method,
        public_key_multibase: public_key_multibase(&verifying_key),
        created_at: Utc::now(),
    };

    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let encrypted = encrypt_key(&signing_key.to_bytes(), passphrase)?;
    write_private(&dir.join(KEY_FILE), &encrypted)?;
    std::fs::write(&info_path, serde_json::to_string_pretty(&info)?)
        .with_context(|| format!("Failed to write {}", info_path.display()))?;

    Ok(info)
}

fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    std::fs::write(path, bytes).with_context(|| format!("Failed to write {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(())
}

pub fn load_identity_info_from(dir: &Path) -> Result<IdentityInfo> {
    let path = dir.join(IDENTITY_FILE);
    let content = std::fs::read_to_string(&path).map_err(|_| {
        anyhow!(
            "No identity found at {}. Run 'webvh identity init' first.",
            dir.display()
        )
    })?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Decrypts the signing key and checks it matches the stored public key.
pub fn load_signing_key_from(dir: &Path, passphrase: &str) -> Result<SigningKey> {
    let info = load_identity_info_from(dir)?;
    let encrypted = std::fs::read(dir.join(KEY_FILE)).context("Failed to read encrypted key")?;

    let seed: [u8; 32] = decrypt_key(&encrypted, passphrase)?
        .try_into()
        .map_err(|_| anyhow!("Decrypted key has the wrong length"))?;
    let signing_key = SigningKey::from_bytes(&seed);

    if public_key_multibase(&signing_key.verifying_key()) != info.public_key_multibase {
        bail!("Key file does not match identity.json");
    }

    Ok(signing_key)
}

pub fn load_identity_info() -> Result<IdentityInfo> {
    load_identity_info_from(&identity_dir()?)
}

pub fn load_signing_key(passphrase: &str) -> Result<SigningKey> {
    load_signing_key_from(&identity_dir()?, passphrase)
}

/// Prompts for a new passphrase twice.
pub fn prompt_new_passphrase() -> Result<String> {
    let passphrase = rpassword::prompt_password("Enter passphrase: ")?;
    if passphrase.is_empty() {
        bail!("Passphrase must not be empty");
    }
    let confirm = rpassword::prompt_password("Confirm passphrase: ")?;
    if passphrase != confirm {
        bail!("Passphrases do not match");
    }
    Ok(passphrase)
}

pub fn prompt_passphrase() -> Result<String> {
    Ok(rpassword::prompt_password("Passphrase: ")?)
}
