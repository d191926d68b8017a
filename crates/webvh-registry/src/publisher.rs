// Publication of secured resources to a registrar
//
// A resource that fails the local integrity check never leaves the process.
// The registrar must confirm the exact identifier that was submitted.

use url::Url;
use webvh_crypto::{check_integrity, AttestedResource};

use crate::error::PipelineError;
use crate::transport::{resources_endpoint, ResourceTransport, Submission};

/// Publishes a secured resource and returns the identifier the registrar confirmed.
///
/// Re-publishing a resource the registrar already holds is a success.
///
/// # Errors
/// * [`PipelineError::Resource`] if the digest or identifier invariant does not hold
/// * [`PipelineError::NotSecured`] if the resource carries no proof
/// * [`PipelineError::PublicationTransport`] if the registrar could not be reached or refused
/// * [`PipelineError::PublicationIntegrity`] if the registrar confirmed a different identifier
pub async fn publish_resource<T: ResourceTransport + ?Sized>(
    transport: &T,
    secured: &AttestedResource,
    registrar: &Url,
) -> Result<String, PipelineError> {
    check_integrity(secured)?;
    if !secured.is_secured() {
        return Err(PipelineError::NotSecured(secured.id.clone()));
    }

    let endpoint = resources_endpoint(registrar).map_err(PipelineError::PublicationTransport)?;
    let submission = transport
        .post_resource(&endpoint, secured)
        .await
        .map_err(PipelineError::PublicationTransport)?;

    if submission.id() != secured.id {
        tracing::warn!(
            submitted = %secured.id,
            returned = %submission.id(),
            "registrar confirmed a different identifier"
        );
        return Err(PipelineError::PublicationIntegrity {
            submitted: secured.id.clone(),
            returned: submission.id().to_string(),
        });
    }

    match submission {
        Submission::Stored(id) => {
            tracing::info!(%id, "published resource");
            Ok(id)
        }
        Submission::AlreadyStored(id) => {
            tracing::info!(%id, "resource already published");
            Ok(id)
        }
    }
}
