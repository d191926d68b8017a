//! Error types for the publication pipeline and the artifact API.

use std::fmt;

use webvh_crypto::ResourceError;

use crate::anoncreds::RegistrationState;

/// Failure talking to a registrar or resolver endpoint.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request to {endpoint} failed: {source}")]
    Http {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} returned {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("unreadable response from {endpoint}: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("cannot build request URL from '{0}'")]
    InvalidUrl(String),
}

impl TransportError {
    /// True when repeating the same request may succeed.
    ///
    /// Connection failures, timeouts, 5xx and 429 responses qualify; a
    /// registrar that rejected the payload will reject it again.
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::Http { .. } => true,
            TransportError::Status { status, .. } => *status >= 500 || *status == 429,
            TransportError::Decode { .. } | TransportError::InvalidUrl(_) => false,
        }
    }
}

/// Errors raised by the individual pipeline stages.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Building, signing or the local integrity check failed.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    #[error("resource {0} carries no proof")]
    NotSecured(String),

    /// The registrar confirmed a different identifier than the one submitted.
    #[error("registrar stored '{returned}' but '{submitted}' was submitted")]
    PublicationIntegrity { submitted: String, returned: String },

    #[error("publication failed: {0}")]
    PublicationTransport(#[source] TransportError),

    /// The resolved document does not match the identifier it was fetched under.
    #[error("resource {id} failed integrity check: {reason}")]
    ResourceIntegrity { id: String, reason: String },

    #[error("resource {0} not found")]
    ResourceNotFound(String),

    #[error("resolution failed: {0}")]
    ResolverTransport(#[source] TransportError),
}

impl PipelineError {
    /// True for transport failures where resubmitting may help.
    /// Integrity failures are never retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::PublicationTransport(e) | PipelineError::ResolverTransport(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Stage of a register call, reported when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStage {
    Building,
    Signing,
    Publishing,
}

impl fmt::Display for RegistrationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RegistrationStage::Building => "building",
            RegistrationStage::Signing => "signing",
            RegistrationStage::Publishing => "publishing",
        })
    }
}

/// Errors surfaced at the artifact API boundary.
#[derive(Debug, thiserror::Error)]
pub enum AnonCredsError {
    #[error("registration failed while {stage}: {source}")]
    RegistrationFailed {
        stage: RegistrationStage,
        #[source]
        source: PipelineError,
    },

    #[error("could not resolve {id}: {source}")]
    ResolutionFailed {
        id: String,
        #[source]
        source: PipelineError,
    },

    /// The resource resolved but its content is not the expected artifact shape.
    #[error("{id} does not hold a valid {kind}: {reason}")]
    MalformedArtifact {
        id: String,
        kind: &'static str,
        reason: String,
    },

    #[error("{0} is not supported by the did:webvh registry")]
    OperationNotSupported(&'static str),
}

impl AnonCredsError {
    /// Lifecycle state reported for a failed register call.
    pub fn state(&self) -> RegistrationState {
        RegistrationState::Failed
    }

    /// The pipeline error behind a registration or resolution failure.
    pub fn pipeline_error(&self) -> Option<&PipelineError> {
        match self {
            AnonCredsError::RegistrationFailed { source, .. } | AnonCredsError::ResolutionFailed { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
