//! # webvh-registry
//!
//! Publishes AnonCreds artifacts as did:webvh attested resources and resolves
//! them back into typed values.
//!
//! Register path: [`DidWebvhRegistry`] builds the resource, signs it with a
//! key from a [`webvh_crypto::KeyStore`], and hands it to [`publish_resource`].
//! Read path: [`resolve_resource`] fetches the document, re-checks its digest,
//! and the registry unpacks the content.
//!
//! Transport is pluggable through [`ResourceTransport`]; [`HttpTransport`]
//! is the reqwest implementation used by [`setup`].

pub mod anoncreds;
pub mod config;
pub mod error;
pub mod publisher;
pub mod registry;
pub mod resolver;
pub mod transport;

pub use anoncreds::{
    AnonCredsSchema, CredDef, GetSchemaResult, RegistrationMetadata, RegistrationResult, RegistrationState,
    RevList, RevRegDef, SchemaInfo, SchemaResult,
};
pub use config::{RegistrationOptions, RegistryConfig, WebvhConfig, WebvhConfigRecord};
pub use error::{AnonCredsError, ConfigError, PipelineError, RegistrationStage, TransportError};
pub use publisher::publish_resource;
pub use registry::{setup, DidWebvhRegistry, NewResource};
pub use resolver::{resolution_url, resolve_resource};
pub use transport::{HttpTransport, ResourceTransport, Submission};
