// Resolution of attested resources by identifier
//
// Every resolved document is re-digested and checked against the identifier
// it was requested under. Proofs are returned untouched; verifying them is
// left to the caller.

use url::Url;
use webvh_crypto::{digest_multibase, parse_resource_id, resource_url, AttestedResource};

use crate::error::{PipelineError, TransportError};
use crate::transport::{resource_endpoint, ResourceTransport};

/// Where a resource identifier is fetched from.
///
/// With a resolver configured: `{resolver}/resources/{id}`. Without one:
/// the HTTPS location the identifier itself maps to.
pub fn resolution_url(resolver: Option<&Url>, resource_id: &str) -> Result<Url, PipelineError> {
    match resolver {
        Some(base) => resource_endpoint(base, resource_id).map_err(PipelineError::ResolverTransport),
        None => {
            let location = resource_url(resource_id)?;
            Url::parse(&location)
                .map_err(|_| PipelineError::ResolverTransport(TransportError::InvalidUrl(location)))
        }
    }
}

/// Fetches a resource and checks it against `resource_id`.
///
/// # Errors
/// * [`PipelineError::Resource`] wrapping `InvalidIdentifier` before any I/O
/// * [`PipelineError::ResourceNotFound`] if the endpoint has no such resource
/// * [`PipelineError::ResolverTransport`] on network or endpoint failure
/// * [`PipelineError::ResourceIntegrity`] if the document is malformed, unsigned,
///   or its content does not hash to the requested digest
pub async fn resolve_resource<T: ResourceTransport + ?Sized>(
    transport: &T,
    resolver: Option<&Url>,
    resource_id: &str,
) -> Result<AttestedResource, PipelineError> {
    let resource_id = resource_id.trim();
    let parsed = parse_resource_id(resource_id)?;
    let url = resolution_url(resolver, resource_id)?;

    let document = transport
        .get_resource(&url)
        .await
        .map_err(PipelineError::ResolverTransport)?
        .ok_or_else(|| PipelineError::ResourceNotFound(resource_id.to_string()))?;

    let integrity = |reason: String| {
        tracing::warn!(id = %resource_id, %reason, "rejected resolved resource");
        PipelineError::ResourceIntegrity {
            id: resource_id.to_string(),
            reason,
        }
    };

    let resource: AttestedResource =
        serde_json::from_value(document).map_err(|e| integrity(format!("malformed resource: {}", e)))?;

    let computed = digest_multibase(&resource.resource_content)?;
    if computed != parsed.digest {
        return Err(integrity(format!(
            "content hashes to {} but {} was requested",
            computed, parsed.digest
        )));
    }
    if resource.resource_metadata.resource_id != computed {
        return Err(integrity(format!(
            "metadata declares {} but content hashes to {}",
            resource.resource_metadata.resource_id, computed
        )));
    }
    if resource.id != resource_id {
        return Err(integrity(format!("document is identified as {}", resource.id)));
    }
    if !resource.is_secured() {
        return Err(integrity("document carries no proof".to_string()));
    }

    tracing::info!(id = %resource_id, "resolved resource");
    Ok(resource)
}
