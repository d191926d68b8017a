//! did:webvh identifier validation and resource identifier handling.
//!
//! Issuer identifiers follow
//! `did:webvh:<label>(.<label>)*[:<port>][/<path>][#<fragment>]`.
//! Resource identifiers are always `{issuer}/resources/{digest}.json`.

use std::sync::OnceLock;

use regex_lite::Regex;

use crate::error::ResourceError;

/// Pattern for identifiers this registry accepts.
pub const WEBVH_DID_PATTERN: &str =
    r"^did:webvh:[a-z0-9]+(?:\.[a-z0-9]+)*(?::\d+)?(?:/[^#\s]*)?(?:#.*)?\s*$";

const RESOURCES_SEGMENT: &str = "/resources/";
const RESOURCE_EXTENSION: &str = ".json";
const WEBVH_PREFIX: &str = "did:webvh:";

/// Compiled form of [`WEBVH_DID_PATTERN`].
pub fn webvh_did_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(WEBVH_DID_PATTERN).expect("WEBVH_DID_PATTERN is a valid regex"))
}

/// Returns true when `candidate` is a well-formed did:webvh identifier.
pub fn matches(candidate: &str) -> bool {
    webvh_did_regex().is_match(candidate)
}

/// Fails with [`ResourceError::InvalidIdentifier`] unless `candidate` matches.
pub fn ensure_webvh_did(candidate: &str) -> Result<(), ResourceError> {
    if matches(candidate) {
        Ok(())
    } else {
        Err(ResourceError::InvalidIdentifier(candidate.to_string()))
    }
}

/// Fails with [`ResourceError::InvalidIdentifier`] unless `candidate` can
/// prefix a resource identifier: a did:webvh identifier without fragment or
/// whitespace.
pub fn ensure_issuer_did(candidate: &str) -> Result<(), ResourceError> {
    if candidate.contains('#') || candidate.contains(char::is_whitespace) {
        return Err(ResourceError::InvalidIdentifier(candidate.to_string()));
    }
    ensure_webvh_did(candidate)
}

/// The two halves of a resource identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceId {
    pub issuer_id: String,
    pub digest: String,
}

/// Builds `{issuer_id}/resources/{digest}.json`.
pub fn resource_id(issuer_id: &str, digest: &str) -> String {
    format!("{}{}{}{}", issuer_id, RESOURCES_SEGMENT, digest, RESOURCE_EXTENSION)
}

/// Splits a resource identifier into issuer and digest, validating both.
pub fn parse_resource_id(id: &str) -> Result<ResourceId, ResourceError> {
    let invalid = || ResourceError::InvalidIdentifier(id.to_string());

    let (issuer_id, file) = id.rsplit_once(RESOURCES_SEGMENT).ok_or_else(invalid)?;
    let digest = file.strip_suffix(RESOURCE_EXTENSION).ok_or_else(invalid)?;

    if digest.is_empty() || !digest.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(invalid());
    }
    ensure_issuer_did(issuer_id).map_err(|_| invalid())?;

    Ok(ResourceId {
        issuer_id: issuer_id.to_string(),
        digest: digest.to_string(),
    })
}

/// Replaces a URL-encoded `:` (`%3A`) in a domain with the literal character.
pub fn url_decoded_domain(domain: &str) -> String {
    domain.replace("%3A", ":").replace("%3a", ":")
}

/// Maps a did:webvh identifier to the HTTPS location it is served from.
///
/// `did:webvh:example.com:8080/resources/zQm.json` becomes
/// `https://example.com:8080/resources/zQm.json`. Any fragment is dropped.
pub fn resource_url(id: &str) -> Result<String, ResourceError> {
    let rest = id
        .trim_end()
        .strip_prefix(WEBVH_PREFIX)
        .filter(|_| matches(id))
        .ok_or_else(|| ResourceError::InvalidIdentifier(id.to_string()))?;

    let without_fragment = rest.split('#').next().unwrap_or_default();
    let (authority, path) = match without_fragment.find('/') {
        Some(index) => without_fragment.split_at(index),
        None => (without_fragment, ""),
    };

    Ok(format!("https://{}{}", url_decoded_domain(authority), path))
}
