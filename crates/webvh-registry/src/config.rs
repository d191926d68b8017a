//! Registry configuration.
//!
//! Endpoints and proof defaults come from the environment, from a stored
//! webvh configuration record, or from explicit construction in tests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use url::Url;
use webvh_crypto::ProofOptions;

pub use crate::error::ConfigError;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for a [`crate::DidWebvhRegistry`].
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Base URL of the registrar; resources are submitted to `{registrar_url}/resources`.
    pub registrar_url: Url,
    /// Base URL of a resolver. When unset, resources are fetched from the
    /// web location their identifier maps to.
    pub resolver_url: Option<Url>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Proof options every registration starts from.
    pub proof_options: ProofOptions,
}

impl RegistryConfig {
    pub fn new(registrar_url: Url) -> Self {
        Self {
            registrar_url,
            resolver_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            proof_options: ProofOptions::default(),
        }
    }

    pub fn with_resolver(mut self, resolver_url: Url) -> Self {
        self.resolver_url = Some(resolver_url);
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `WEBVH_REGISTRAR_URL` (required)
    /// - `WEBVH_RESOLVER_URL` (optional)
    /// - `WEBVH_TIMEOUT_SECS` (default: 30, must be positive)
    /// - `WEBVH_PROOF_PURPOSE` (default: `assertionMethod`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`RegistryConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let registrar = lookup("WEBVH_REGISTRAR_URL").ok_or(ConfigError::Missing("WEBVH_REGISTRAR_URL"))?;
        let mut config = Self::new(parse_url("WEBVH_REGISTRAR_URL", &registrar)?);

        if let Some(resolver) = lookup("WEBVH_RESOLVER_URL").filter(|v| !v.trim().is_empty()) {
            config.resolver_url = Some(parse_url("WEBVH_RESOLVER_URL", &resolver)?);
        }

        if let Some(timeout) = lookup("WEBVH_TIMEOUT_SECS") {
            config.timeout_secs = timeout
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue("WEBVH_TIMEOUT_SECS".to_string(), timeout.clone()))?;
        }

        if let Some(purpose) = lookup("WEBVH_PROOF_PURPOSE").filter(|v| !v.trim().is_empty()) {
            config.proof_options.proof_purpose = purpose.trim().to_string();
        }

        Ok(config)
    }

    /// Builds a configuration from a stored webvh configuration record.
    ///
    /// The record's `server_url` serves as both registrar and resolver.
    pub fn from_record(record: &WebvhConfigRecord) -> Result<Self, ConfigError> {
        let server_url = parse_url("server_url", &record.config.server_url)?;
        Ok(Self::new(server_url.clone()).with_resolver(server_url))
    }
}

fn parse_url(name: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidUrl(name.to_string(), e.to_string()))
}

/// Persisted webvh configuration, owned by the host's record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebvhConfigRecord {
    pub record_id: String,
    pub config: WebvhConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebvhConfig {
    pub server_url: String,
    /// `controller` or `witness`.
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "controller".to_string()
}

/// Per-call options for register operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOptions {
    /// Verification method whose key signs the resource.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_method: Option<String>,
    /// Merged over the registry's default proof options.
    #[serde(default)]
    pub proof_options: Map<String, Value>,
    /// Registrar to publish to instead of the configured one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_endpoint: Option<Url>,
}

impl RegistrationOptions {
    pub fn with_verification_method(verification_method: impl Into<String>) -> Self {
        Self {
            verification_method: Some(verification_method.into()),
            ..Self::default()
        }
    }

    /// Effective proof options: registry defaults, then `proofOptions`, then
    /// `verificationMethod`.
    pub fn resolve_proof_options(&self, defaults: &ProofOptions) -> Result<ProofOptions, webvh_crypto::ResourceError> {
        let merged = defaults.merged(&self.proof_options)?;
        Ok(match &self.verification_method {
            Some(vm) => merged.with_verification_method(vm.clone()),
            None => merged,
        })
    }
}
