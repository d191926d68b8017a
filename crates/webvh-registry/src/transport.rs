//! Transport to registrar and resolver endpoints.
//!
//! The pipeline only needs two calls: submit a secured resource and fetch a
//! resource document. [`HttpTransport`] is the reqwest implementation.
//!
//! ## Wire contract
//!
//! | Method | Path | Answer |
//! |--------|------|--------|
//! | POST   | `{registrar}/resources` | `{"id": ...}`; 409 with `{"id": ...}` when already stored |
//! | GET    | `{resolver}/resources/{percent-encoded id}` | resource JSON, 404 when absent |

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use url::Url;
use webvh_crypto::AttestedResource;

use crate::error::TransportError;

const RESOURCES_PATH: &str = "resources";

/// Registrar answer to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Newly stored under this identifier.
    Stored(String),
    /// A resource was already stored under this identifier.
    AlreadyStored(String),
}

impl Submission {
    pub fn id(&self) -> &str {
        match self {
            Submission::Stored(id) | Submission::AlreadyStored(id) => id,
        }
    }
}

/// Calls the pipeline makes against remote endpoints.
pub trait ResourceTransport: Send + Sync {
    /// Submits a secured resource to a registrar collection endpoint.
    fn post_resource(
        &self,
        endpoint: &Url,
        resource: &AttestedResource,
    ) -> impl Future<Output = Result<Submission, TransportError>> + Send;

    /// Fetches a resource document. `Ok(None)` means the endpoint reported it absent.
    fn get_resource(&self, endpoint: &Url) -> impl Future<Output = Result<Option<Value>, TransportError>> + Send;
}

impl<T: ResourceTransport + ?Sized> ResourceTransport for std::sync::Arc<T> {
    fn post_resource(
        &self,
        endpoint: &Url,
        resource: &AttestedResource,
    ) -> impl Future<Output = Result<Submission, TransportError>> + Send {
        (**self).post_resource(endpoint, resource)
    }

    fn get_resource(&self, endpoint: &Url) -> impl Future<Output = Result<Option<Value>, TransportError>> + Send {
        (**self).get_resource(endpoint)
    }
}

/// `{base}/resources`
pub fn resources_endpoint(base: &Url) -> Result<Url, TransportError> {
    with_segments(base, &[RESOURCES_PATH])
}

/// `{base}/resources/{id}`, with `id` percent-encoded as a single path segment.
pub fn resource_endpoint(base: &Url, resource_id: &str) -> Result<Url, TransportError> {
    with_segments(base, &[RESOURCES_PATH, resource_id.trim()])
}

fn with_segments(base: &Url, segments: &[&str]) -> Result<Url, TransportError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| TransportError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[derive(Deserialize)]
struct RegistrarResponse {
    id: String,
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// Creates a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Http {
                endpoint: "client_init".into(),
                source: e,
            })?;
        Ok(Self { http })
    }

    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
    endpoint: &str,
) -> Result<T, TransportError> {
    resp.json().await.map_err(|e| TransportError::Decode {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })
}

impl ResourceTransport for HttpTransport {
    async fn post_resource(&self, endpoint: &Url, resource: &AttestedResource) -> Result<Submission, TransportError> {
        let label = format!("POST {}", endpoint);

        let resp = self
            .http
            .post(endpoint.clone())
            .json(resource)
            .send()
            .await
            .map_err(|e| TransportError::Http {
                endpoint: label.clone(),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::CONFLICT {
            let body: RegistrarResponse = decode(resp, &label).await?;
            return Ok(Submission::AlreadyStored(body.id));
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                endpoint: label,
                status,
                body,
            });
        }

        let body: RegistrarResponse = decode(resp, &label).await?;
        Ok(Submission::Stored(body.id))
    }

    async fn get_resource(&self, endpoint: &Url) -> Result<Option<Value>, TransportError> {
        let label = format!("GET {}", endpoint);

        let resp = self
            .http
            .get(endpoint.clone())
            .send()
            .await
            .map_err(|e| TransportError::Http {
                endpoint: label.clone(),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                endpoint: label,
                status,
                body,
            });
        }

        decode(resp, &label).await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resources_endpoint() {
        let base = Url::parse("http://127.0.0.1:8080").unwrap();
        assert_eq!(resources_endpoint(&base).unwrap().as_str(), "http://127.0.0.1:8080/resources");

        let nested = Url::parse("https://registrar.example.com/api/").unwrap();
        assert_eq!(
            resources_endpoint(&nested).unwrap().as_str(),
            "https://registrar.example.com/api/resources"
        );
    }

    #[test]
    fn test_resource_endpoint_encodes_id_as_one_segment() {
        let base = Url::parse("http://127.0.0.1:8080").unwrap();
        let url = resource_endpoint(&base, "did:webvh:example.com/resources/zQmAbc.json").unwrap();

        assert_eq!(url.path_segments().map(|s| s.count()), Some(2));
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8080/resources/did:webvh:example.com%2Fresources%2FzQmAbc.json"
        );
    }

    #[test]
    fn test_cannot_be_a_base_url_is_rejected() {
        let base = Url::parse("mailto:registrar@example.com").unwrap();
        assert!(matches!(resources_endpoint(&base), Err(TransportError::InvalidUrl(_))));
    }

    #[test]
    fn test_submission_id() {
        assert_eq!(Submission::Stored("a".into()).id(), "a");
        assert_eq!(Submission::AlreadyStored("b".into()).id(), "b");
    }
}
