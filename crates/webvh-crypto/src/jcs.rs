// JCS (JSON Canonicalization Scheme) - RFC 8785

use serde::Serialize;

use crate::error::ResourceError;

/// Canonicalizes a serializable value according to RFC 8785 (JCS) and returns the UTF-8 bytes.
///
/// Both the content digest and the proof hash data are computed over these bytes:
/// - Object keys are sorted lexicographically at every depth
/// - No insignificant whitespace
/// - Numbers are serialized in their shortest round-trip form
pub fn jcs_canonical_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ResourceError> {
    let canonical = serde_jcs::to_string(value)?;
    Ok(canonical.into_bytes())
}
