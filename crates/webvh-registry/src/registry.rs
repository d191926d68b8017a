//! did:webvh AnonCreds registry.
//!
//! Every write runs the same pipeline: build the attested resource, sign it,
//! publish it. Reads resolve the resource and unpack its content. A register
//! call moves through `building → signing → publishing` and either finishes
//! or fails at the stage that raised the error. Nothing is retried here.

use std::time::Duration;

use regex_lite::Regex;
use serde_json::{Map, Value};
use webvh_crypto::identifier::webvh_did_regex;
use webvh_crypto::{
    build_resource, content_map, matches, sign_attested_resource, AttestedResource, KeyStore, ResourceType,
};

use crate::anoncreds::{
    AnonCredsSchema, ArtifactState, CredDef, CredDefResult, GetCredDefResult, GetRevListResult,
    GetRevRegDefResult, GetSchemaResult, RegistrationMetadata, RegistrationResult, RegistrationState,
    RevList, RevListResult, RevRegDef, RevRegDefResult, SchemaInfo, SchemaResult,
};
use crate::config::{RegistrationOptions, RegistryConfig};
use crate::error::{AnonCredsError, PipelineError, RegistrationStage, TransportError};
use crate::publisher::publish_resource;
use crate::resolver::resolve_resource;
use crate::transport::{HttpTransport, ResourceTransport};

/// Input to [`DidWebvhRegistry::create_attested_resource`].
#[derive(Debug, Clone)]
pub struct NewResource {
    pub issuer_id: String,
    pub resource_type: ResourceType,
    pub content: Map<String, Value>,
    pub related_resource: Vec<String>,
    /// Stored as `resourceMetadata.resourceName`; not part of the digest.
    pub resource_name: Option<String>,
}

/// Registrar and resolver for AnonCreds artifacts held as did:webvh attested resources.
pub struct DidWebvhRegistry<T, K> {
    config: RegistryConfig,
    transport: T,
    keys: K,
}

/// Creates a registry that talks HTTP to the configured endpoints.
pub fn setup<K: KeyStore>(config: RegistryConfig, keys: K) -> Result<DidWebvhRegistry<HttpTransport, K>, TransportError> {
    let transport = HttpTransport::new(Duration::from_secs(config.timeout_secs))?;
    tracing::info!(registrar = %config.registrar_url, "did:webvh registry ready");
    Ok(DidWebvhRegistry::new(config, transport, keys))
}

impl<T, K> std::fmt::Debug for DidWebvhRegistry<T, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DidWebvhRegistry")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: ResourceTransport, K: KeyStore> DidWebvhRegistry<T, K> {
    pub fn new(config: RegistryConfig, transport: T, keys: K) -> Self {
        Self {
            config,
            transport,
            keys,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Pattern for identifiers this registry handles.
    pub fn supported_identifiers_regex(&self) -> &'static Regex {
        webvh_did_regex()
    }

    pub fn supports(&self, identifier: &str) -> bool {
        matches(identifier)
    }

    /// Builds, signs and publishes one attested resource.
    ///
    /// Returns the secured resource once the registrar has confirmed its identifier.
    pub async fn create_attested_resource(
        &self,
        resource: NewResource,
        options: &RegistrationOptions,
    ) -> Result<AttestedResource, AnonCredsError> {
        let failed = |stage: RegistrationStage| {
            move |source: PipelineError| {
                tracing::warn!(%stage, error = %source, "registration failed");
                AnonCredsError::RegistrationFailed { stage, source }
            }
        };

        tracing::debug!(issuer = %resource.issuer_id, resource_type = %resource.resource_type, "building");
        let mut unsigned = build_resource(
            &resource.issuer_id,
            resource.resource_type,
            resource.content,
            resource.related_resource,
        )
        .map_err(|e| failed(RegistrationStage::Building)(e.into()))?;
        if let Some(name) = resource.resource_name {
            unsigned = unsigned.with_name(name);
        }

        tracing::debug!(id = %unsigned.id, "signing");
        let secured = options
            .resolve_proof_options(&self.config.proof_options)
            .and_then(|proof_options| sign_attested_resource(&unsigned, &proof_options, &self.keys))
            .map_err(|e| failed(RegistrationStage::Signing)(e.into()))?;

        let registrar = options
            .service_endpoint
            .as_ref()
            .unwrap_or(&self.config.registrar_url);
        tracing::debug!(id = %secured.id, %registrar, "publishing");
        publish_resource(&self.transport, &secured, registrar)
            .await
            .map_err(failed(RegistrationStage::Publishing))?;

        Ok(secured)
    }

    /// Resolves an attested resource without unpacking it.
    pub async fn resolve(&self, resource_id: &str) -> Result<AttestedResource, AnonCredsError> {
        resolve_resource(&self.transport, self.config.resolver_url.as_ref(), resource_id)
            .await
            .map_err(|source| AnonCredsError::ResolutionFailed {
                id: resource_id.to_string(),
                source,
            })
    }

    pub async fn register_schema(
        &self,
        schema: &AnonCredsSchema,
        options: &RegistrationOptions,
    ) -> Result<SchemaResult, AnonCredsError> {
        let content = content_map(schema).map_err(|e| AnonCredsError::RegistrationFailed {
            stage: RegistrationStage::Building,
            source: e.into(),
        })?;

        let secured = self
            .create_attested_resource(
                NewResource {
                    issuer_id: schema.issuer_id.clone(),
                    resource_type: ResourceType::AnonCredsSchema,
                    content,
                    related_resource: Vec::new(),
                    resource_name: Some(schema.name.clone()),
                },
                options,
            )
            .await?;

        tracing::info!(schema_id = %secured.id, name = %schema.name, "registered schema");

        Ok(RegistrationResult {
            job_id: None,
            artifact_state: ArtifactState {
                state: RegistrationState::Finished,
                id: secured.id.clone(),
                artifact: schema.clone(),
            },
            registration_metadata: RegistrationMetadata {
                resource_id: secured.resource_metadata.resource_id,
                resource_name: secured.resource_metadata.resource_name,
                resource_type: ResourceType::AnonCredsSchema,
            },
        })
    }

    pub async fn get_schema(&self, schema_id: &str) -> Result<GetSchemaResult, AnonCredsError> {
        let resource = self.resolve(schema_id).await?;

        if resource.resource_metadata.resource_type != ResourceType::AnonCredsSchema {
            return Err(AnonCredsError::MalformedArtifact {
                id: schema_id.to_string(),
                kind: "schema",
                reason: format!("resource type is {}", resource.resource_metadata.resource_type),
            });
        }

        let schema: AnonCredsSchema = serde_json::from_value(Value::Object(resource.resource_content))
            .map_err(|e| AnonCredsError::MalformedArtifact {
                id: schema_id.to_string(),
                kind: "schema",
                reason: e.to_string(),
            })?;

        Ok(GetSchemaResult {
            id: resource.id,
            artifact: schema,
            metadata: resource.resource_metadata,
            resolution_metadata: Map::new(),
        })
    }

    pub async fn get_schema_info_by_id(&self, schema_id: &str) -> Result<SchemaInfo, AnonCredsError> {
        let result = self.get_schema(schema_id).await?;
        Ok(SchemaInfo::from(result.schema()))
    }

    pub async fn get_credential_definition(&self, _credential_definition_id: &str) -> Result<GetCredDefResult, AnonCredsError> {
        Err(AnonCredsError::OperationNotSupported("get_credential_definition"))
    }

    pub async fn register_credential_definition(
        &self,
        _schema: &GetSchemaResult,
        _credential_definition: &CredDef,
        _options: &RegistrationOptions,
    ) -> Result<CredDefResult, AnonCredsError> {
        Err(AnonCredsError::OperationNotSupported("register_credential_definition"))
    }

    pub async fn get_revocation_registry_definition(
        &self,
        _revocation_registry_id: &str,
    ) -> Result<GetRevRegDefResult, AnonCredsError> {
        Err(AnonCredsError::OperationNotSupported("get_revocation_registry_definition"))
    }

    pub async fn register_revocation_registry_definition(
        &self,
        _revocation_registry_definition: &RevRegDef,
        _options: &RegistrationOptions,
    ) -> Result<RevRegDefResult, AnonCredsError> {
        Err(AnonCredsError::OperationNotSupported("register_revocation_registry_definition"))
    }

    pub async fn get_revocation_list(
        &self,
        _revocation_registry_id: &str,
        _timestamp: i64,
    ) -> Result<GetRevListResult, AnonCredsError> {
        Err(AnonCredsError::OperationNotSupported("get_revocation_list"))
    }

    pub async fn register_revocation_list(
        &self,
        _rev_reg_def: &RevRegDef,
        _rev_list: &RevList,
        _options: &RegistrationOptions,
    ) -> Result<RevListResult, AnonCredsError> {
        Err(AnonCredsError::OperationNotSupported("register_revocation_list"))
    }

    pub async fn update_revocation_list(
        &self,
        _rev_reg_def: &RevRegDef,
        _prev_list: &RevList,
        _curr_list: &RevList,
        _revoked: &[u32],
        _options: &RegistrationOptions,
    ) -> Result<RevListResult, AnonCredsError> {
        Err(AnonCredsError::OperationNotSupported("update_revocation_list"))
    }
}
