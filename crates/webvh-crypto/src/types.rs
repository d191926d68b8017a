//! Type definitions for did:webvh attested resources.
//!
//! An attested resource is a content-addressed JSON document: its `id` ends in
//! the multibase digest of `resourceContent`, and an optional set of
//! Data Integrity proofs binds it to the issuing identity. Proofs are computed
//! over the RFC 8785 (JCS) canonical form of the resource with `proof` removed.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::ResourceError;

/// JSON-LD context carried by every attested resource.
pub const DATA_INTEGRITY_CONTEXT: &str = "https://w3id.org/security/data-integrity/v2";

/// Value of the resource-level `type` array.
pub const ATTESTED_RESOURCE_TYPE: &str = "AttestedResource";

/// Proof `type` produced by this crate.
pub const DATA_INTEGRITY_PROOF: &str = "DataIntegrityProof";

/// The only cryptosuite this crate signs and verifies with.
pub const EDDSA_JCS_2022: &str = "eddsa-jcs-2022";

/// Default proof purpose.
pub const ASSERTION_METHOD: &str = "assertionMethod";

/// Kind of artifact carried in `resourceContent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    #[serde(rename = "anonCredsSchema")]
    AnonCredsSchema,
    #[serde(rename = "anonCredsCredDef")]
    AnonCredsCredDef,
    #[serde(rename = "anonCredsRevocRegDef")]
    AnonCredsRevocRegDef,
    #[serde(rename = "anonCredsStatusList")]
    AnonCredsStatusList,
}

impl ResourceType {
    /// Wire tag, as it appears in `resourceMetadata.resourceType`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::AnonCredsSchema => "anonCredsSchema",
            ResourceType::AnonCredsCredDef => "anonCredsCredDef",
            ResourceType::AnonCredsRevocRegDef => "anonCredsRevocRegDef",
            ResourceType::AnonCredsStatusList => "anonCredsStatusList",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata embedded in every attested resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMetadata {
    /// Multibase digest of `resourceContent`; also the last path segment of the id.
    pub resource_id: String,
    pub resource_type: ResourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    /// Members this crate does not model, carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A Data Integrity proof attached to a secured resource.
///
/// `proof_value` is left empty while the proof configuration is hashed and
/// is omitted from the serialized form in that state. Members such as
/// `expires`, `domain` or `@context` land in `extra` and stay part of the
/// hashed proof configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataIntegrityProof {
    #[serde(rename = "type")]
    pub proof_type: String,
    pub cryptosuite: String,
    /// RFC 3339 creation time. Always set on proofs this crate creates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    pub verification_method: String,
    pub proof_purpose: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub proof_value: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options recognized by the proof signer.
///
/// Every field except `verification_method` has a default, so a caller
/// supplied JSON mapping only needs to name what it overrides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProofOptions {
    #[serde(rename = "type", default = "default_proof_type")]
    pub proof_type: String,
    #[serde(default = "default_cryptosuite")]
    pub cryptosuite: String,
    #[serde(default = "default_proof_purpose")]
    pub proof_purpose: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<String>,
    /// Proof creation time; the signer uses the current time when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Copied into the proof as `domain` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    /// Copied into the proof as `expires` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires: Option<DateTime<Utc>>,
}

fn default_proof_type() -> String {
    DATA_INTEGRITY_PROOF.to_string()
}

fn default_cryptosuite() -> String {
    EDDSA_JCS_2022.to_string()
}

fn default_proof_purpose() -> String {
    ASSERTION_METHOD.to_string()
}

impl Default for ProofOptions {
    fn default() -> Self {
        Self {
            proof_type: default_proof_type(),
            cryptosuite: default_cryptosuite(),
            proof_purpose: default_proof_purpose(),
            verification_method: None,
            created: None,
            domain: None,
            expires: None,
        }
    }
}

impl ProofOptions {
    /// Returns a copy with the verification method set.
    pub fn with_verification_method(mut self, verification_method: impl Into<String>) -> Self {
        self.verification_method = Some(verification_method.into());
        self
    }

    /// Returns a copy with a fixed creation time.
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self
    }

    /// Overlays a caller-supplied mapping on top of these options.
    ///
    /// Keys present in `overrides` win; a `null` value resets a key to its
    /// default. Unknown keys are ignored.
    pub fn merged(&self, overrides: &Map<String, Value>) -> Result<Self, ResourceError> {
        let mut base = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            _ => return Err(ResourceError::InvalidProofOptions("options are not a mapping".into())),
        };
        for (key, value) in overrides {
            if value.is_null() {
                base.remove(key);
            } else {
                base.insert(key.clone(), value.clone());
            }
        }
        serde_json::from_value(Value::Object(base))
            .map_err(|e| ResourceError::InvalidProofOptions(e.to_string()))
    }
}

/// A content-addressed resource, optionally secured with proofs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttestedResource {
    #[serde(rename = "@context", default = "default_context")]
    pub context: Vec<String>,

    #[serde(rename = "type", default = "default_types")]
    pub types: Vec<String>,

    /// `{issuerId}/resources/{digest}.json`
    pub id: String,

    #[serde(rename = "resourceContent")]
    pub resource_content: Map<String, Value>,

    #[serde(rename = "resourceMetadata")]
    pub resource_metadata: ResourceMetadata,

    #[serde(rename = "relatedResource", default)]
    pub related_resource: Vec<String>,

    /// Empty on an unsigned resource. Accepts a single object or an array on input.
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "one_or_many"
    )]
    pub proof: Vec<DataIntegrityProof>,

    /// Top-level members this crate does not model. They are part of the
    /// signed document.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn default_context() -> Vec<String> {
    vec![DATA_INTEGRITY_CONTEXT.to_string()]
}

fn default_types() -> Vec<String> {
    vec![ATTESTED_RESOURCE_TYPE.to_string()]
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<DataIntegrityProof>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(Box<DataIntegrityProof>),
        Many(Vec<DataIntegrityProof>),
    }

    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(proof)) => vec![*proof],
        Some(OneOrMany::Many(proofs)) => proofs,
    })
}

impl AttestedResource {
    /// Creates an unsigned resource. Callers normally go through
    /// [`crate::build_resource`], which derives `id` and `metadata` from the content.
    pub fn new(
        id: String,
        resource_content: Map<String, Value>,
        resource_metadata: ResourceMetadata,
        related_resource: Vec<String>,
    ) -> Self {
        Self {
            context: default_context(),
            types: default_types(),
            id,
            resource_content,
            resource_metadata,
            related_resource,
            proof: Vec::new(),
            extra: Map::new(),
        }
    }

    /// True once at least one proof is attached.
    pub fn is_secured(&self) -> bool {
        !self.proof.is_empty()
    }

    /// The resource as it was before any proof was attached.
    pub fn unsecured(&self) -> AttestedResource {
        let mut unsecured = self.clone();
        unsecured.proof.clear();
        unsecured
    }

    /// Sets `resourceMetadata.resourceName`. The name is not part of the digest.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.resource_metadata.resource_name = Some(name.into());
        self
    }

    /// Digest segment of the identifier.
    pub fn digest(&self) -> &str {
        &self.resource_metadata.resource_id
    }
}
