//! AnonCreds artifact shapes and lifecycle results.
//!
//! Artifacts are stored as the `resourceContent` of an attested resource,
//! serialized in camelCase.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use webvh_crypto::{ResourceMetadata, ResourceType};

/// Lifecycle state of a register call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationState {
    /// Awaiting asynchronous registrar confirmation.
    Pending,
    Finished,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonCredsSchema {
    pub issuer_id: String,
    pub attr_names: Vec<String>,
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredDef {
    pub issuer_id: String,
    pub schema_id: String,
    #[serde(rename = "type")]
    pub cred_def_type: String,
    pub tag: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevRegDef {
    pub issuer_id: String,
    #[serde(rename = "revocDefType")]
    pub revoc_def_type: String,
    pub cred_def_id: String,
    pub tag: String,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevList {
    pub issuer_id: String,
    pub rev_reg_def_id: String,
    pub revocation_list: Vec<u8>,
    pub current_accumulator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

/// Where a registered artifact ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationMetadata {
    /// Digest segment of the resource identifier.
    pub resource_id: String,
    pub resource_name: Option<String>,
    pub resource_type: ResourceType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactState<T> {
    pub state: RegistrationState,
    /// Identifier of the attested resource holding the artifact.
    pub id: String,
    pub artifact: T,
}

/// Outcome of a register call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrationResult<T> {
    /// Set only when confirmation is asynchronous.
    pub job_id: Option<String>,
    pub artifact_state: ArtifactState<T>,
    pub registration_metadata: RegistrationMetadata,
}

/// Outcome of a read call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetResult<T> {
    pub id: String,
    pub artifact: T,
    pub metadata: ResourceMetadata,
    pub resolution_metadata: Map<String, Value>,
}

pub type SchemaResult = RegistrationResult<AnonCredsSchema>;
pub type GetSchemaResult = GetResult<AnonCredsSchema>;
pub type CredDefResult = RegistrationResult<CredDef>;
pub type GetCredDefResult = GetResult<CredDef>;
pub type RevRegDefResult = RegistrationResult<RevRegDef>;
pub type GetRevRegDefResult = GetResult<RevRegDef>;
pub type RevListResult = RegistrationResult<RevList>;
pub type GetRevListResult = GetResult<RevList>;

impl SchemaResult {
    pub fn schema_id(&self) -> &str {
        &self.artifact_state.id
    }

    pub fn state(&self) -> RegistrationState {
        self.artifact_state.state
    }
}

impl GetSchemaResult {
    pub fn schema(&self) -> &AnonCredsSchema {
        &self.artifact
    }
}

/// Summary used by hosts that only need to label a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaInfo {
    pub issuer_id: String,
    pub name: String,
    pub version: String,
}

impl From<&AnonCredsSchema> for SchemaInfo {
    fn from(schema: &AnonCredsSchema) -> Self {
        Self {
            issuer_id: schema.issuer_id.clone(),
            name: schema.name.clone(),
            version: schema.version.clone(),
        }
    }
}
