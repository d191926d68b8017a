//! Attested resource registration and resolution endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use webvh_crypto::{check_integrity, did_to_verifying_key, verify_proof, AttestedResource};

use crate::error::AppError;
use crate::store::{ResourceStore, Stored};

const DID_KEY_PREFIX: &str = "did:key:";

/// Registrar answer: the identifier the resource is stored under.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResourceResponse {
    pub id: String,
}

/// Creates the resources router.
pub fn router(store: ResourceStore) -> Router {
    Router::new()
        .route("/resources", post(register_resource))
        .route("/resources/{id}", get(get_resource))
        .with_state(store)
}

/// POST /resources
///
/// Stores a secured attested resource.
/// Returns 201 with the identifier when stored, 200 when it was already held.
async fn register_resource(
    State(store): State<ResourceStore>,
    Json(resource): Json<AttestedResource>,
) -> Result<(StatusCode, Json<RegisterResourceResponse>), AppError> {
    validate_resource(&resource)?;

    match store.insert(resource).await {
        Stored::Created(id) => {
            tracing::info!(%id, "stored resource");
            Ok((StatusCode::CREATED, Json(RegisterResourceResponse { id })))
        }
        Stored::Existing(id) => {
            tracing::debug!(%id, "resource already stored");
            Ok((StatusCode::OK, Json(RegisterResourceResponse { id })))
        }
    }
}

/// Rejects resources that break content addressing or carry no valid proof.
///
/// Proofs by did:key methods are verified here. Other methods need DID
/// document resolution and are accepted as submitted.
fn validate_resource(resource: &AttestedResource) -> Result<(), AppError> {
    check_integrity(resource)?;

    if !resource.is_secured() {
        return Err(AppError::BadRequest(format!(
            "resource {} carries no proof",
            resource.id
        )));
    }

    for proof in &resource.proof {
        if proof.verification_method.starts_with(DID_KEY_PREFIX) {
            let verifying_key = did_to_verifying_key(&proof.verification_method)?;
            verify_proof(resource, proof, &verifying_key)?;
        }
    }

    Ok(())
}

/// GET /resources/{id}
///
/// `id` is either a percent-encoded resource identifier or `{digest}.json`.
async fn get_resource(
    State(store): State<ResourceStore>,
    Path(id): Path<String>,
) -> Result<Json<AttestedResource>, AppError> {
    let found = if id.starts_with("did:") {
        store.get(&id).await
    } else {
        let digest = id.strip_suffix(".json").unwrap_or(&id);
        store.get_by_digest(digest).await
    };

    found
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("resource {} not found", id)))
}
