// Attested resource assembly and integrity checks
//
// Building is pure: validate the issuer, digest the content, derive the id.
// No network access and no signing happens here.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ResourceError;
use crate::hash::digest_multibase;
use crate::identifier::{ensure_issuer_did, resource_id};
use crate::types::{AttestedResource, ResourceMetadata, ResourceType};

/// Converts a serializable payload into the JSON mapping stored in `resourceContent`.
pub fn content_map<T: Serialize + ?Sized>(content: &T) -> Result<Map<String, Value>, ResourceError> {
    match serde_json::to_value(content)? {
        Value::Object(map) => Ok(map),
        _ => Err(ResourceError::ContentNotObject),
    }
}

/// Builds an unsigned attested resource.
///
/// The identifier is `{issuer_id}/resources/{digest}.json`, where `digest` is
/// the multibase digest of the canonical content.
///
/// # Errors
/// * [`ResourceError::InvalidIdentifier`] if `issuer_id` is not a did:webvh
///   identifier or carries a fragment
pub fn build_resource(
    issuer_id: &str,
    resource_type: ResourceType,
    content: Map<String, Value>,
    related_resource: Vec<String>,
) -> Result<AttestedResource, ResourceError> {
    ensure_issuer_did(issuer_id)?;

    let digest = digest_multibase(&content)?;
    let id = resource_id(issuer_id, &digest);

    tracing::debug!(%id, %resource_type, "built attested resource");

    Ok(AttestedResource::new(
        id,
        content,
        ResourceMetadata {
            resource_id: digest,
            resource_type,
            resource_name: None,
            extra: Map::new(),
        },
        related_resource,
    ))
}

/// Re-derives the digest and identifier of `resource` and checks both.
///
/// A resource that fails here must not be published or accepted.
pub fn check_integrity(resource: &AttestedResource) -> Result<(), ResourceError> {
    let computed = digest_multibase(&resource.resource_content)?;
    if resource.resource_metadata.resource_id != computed {
        return Err(ResourceError::DigestMismatch {
            declared: resource.resource_metadata.resource_id.clone(),
            computed,
        });
    }

    let (issuer_id, _) = resource
        .id
        .rsplit_once("/resources/")
        .ok_or_else(|| ResourceError::InvalidIdentifier(resource.id.clone()))?;
    ensure_issuer_did(issuer_id)?;

    let expected = resource_id(issuer_id, &computed);
    if resource.id != expected {
        return Err(ResourceError::IdentifierMismatch {
            expected,
            found: resource.id.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ISSUER: &str = "did:webvh:example.com";

    fn person_schema() -> Map<String, Value> {
        content_map(&json!({
            "issuerId": ISSUER,
            "attrNames": ["name", "age"],
            "name": "PersonSchema",
            "version": "1.0"
        }))
        .unwrap()
    }

    #[test]
    fn test_build_derives_id_from_digest() {
        let content = person_schema();
        let digest = digest_multibase(&content).unwrap();

        let resource =
            build_resource(ISSUER, ResourceType::AnonCredsSchema, content.clone(), vec![]).unwrap();

        assert_eq!(resource.id, format!("{}/resources/{}.json", ISSUER, digest));
        assert_eq!(resource.resource_metadata.resource_id, digest);
        assert_eq!(resource.resource_metadata.resource_type, ResourceType::AnonCredsSchema);
        assert_eq!(resource.resource_content, content);
        assert!(resource.related_resource.is_empty());
        assert!(!resource.is_secured());
    }

    #[test]
    fn test_build_keeps_related_resources_in_order() {
        let related = vec![
            format!("{}/resources/zQmCredDef.json", ISSUER),
            format!("{}/resources/zQmSchema.json", ISSUER),
        ];
        let resource = build_resource(
            ISSUER,
            ResourceType::AnonCredsRevocRegDef,
            content_map(&json!({"tag": "default"})).unwrap(),
            related.clone(),
        )
        .unwrap();

        assert_eq!(resource.related_resource, related);
    }

    #[test]
    fn test_build_rejects_invalid_issuer() {
        for issuer in [
            "did:key:abc",
            "not-an-identifier",
            "",
            "did:webvh:example.com:8080/path#frag",
        ] {
            let result = build_resource(issuer, ResourceType::AnonCredsSchema, person_schema(), vec![]);
            assert!(
                matches!(result, Err(ResourceError::InvalidIdentifier(_))),
                "{} should be rejected",
                issuer
            );
        }
    }

    #[test]
    fn test_id_is_independent_of_issuer_key_order() {
        let a = build_resource(ISSUER, ResourceType::AnonCredsSchema, person_schema(), vec![]).unwrap();
        let reordered: Map<String, Value> = serde_json::from_str(
            r#"{"version":"1.0","name":"PersonSchema","attrNames":["name","age"],"issuerId":"did:webvh:example.com"}"#,
        )
        .unwrap();
        let b = build_resource(ISSUER, ResourceType::AnonCredsSchema, reordered, vec![]).unwrap();

        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_content_map_rejects_non_objects() {
        assert!(matches!(content_map(&json!(["a"])), Err(ResourceError::ContentNotObject)));
        assert!(matches!(content_map(&"text"), Err(ResourceError::ContentNotObject)));
    }

    #[test]
    fn test_check_integrity_accepts_built_resource() {
        let resource = build_resource(ISSUER, ResourceType::AnonCredsSchema, person_schema(), vec![])
            .unwrap()
            .with_name("PersonSchema");
        assert!(check_integrity(&resource).is_ok());
    }

    #[test]
    fn test_check_integrity_detects_tampered_content() {
        let mut resource =
            build_resource(ISSUER, ResourceType::AnonCredsSchema, person_schema(), vec![]).unwrap();
        resource
            .resource_content
            .insert("version".to_string(), json!("2.0"));

        assert!(matches!(
            check_integrity(&resource),
            Err(ResourceError::DigestMismatch { .. })
        ));
    }

    #[test]
    fn test_check_integrity_detects_foreign_id() {
        let mut resource =
            build_resource(ISSUER, ResourceType::AnonCredsSchema, person_schema(), vec![]).unwrap();
        resource.id = format!("{}/resources/zQmSomethingElse.json", ISSUER);

        assert!(matches!(
            check_integrity(&resource),
            Err(ResourceError::IdentifierMismatch { .. })
        ));
    }

    #[test]
    fn test_check_integrity_detects_invalid_issuer() {
        let mut resource =
            build_resource(ISSUER, ResourceType::AnonCredsSchema, person_schema(), vec![]).unwrap();
        resource.id = resource.id.replace("did:webvh:", "did:key:");

        assert!(matches!(
            check_integrity(&resource),
            Err(ResourceError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_check_integrity_rejects_fragment_issuer() {
        let mut resource =
            build_resource(ISSUER, ResourceType::AnonCredsSchema, person_schema(), vec![]).unwrap();
        resource.id = resource.id.replace(ISSUER, "did:webvh:example.com#frag");

        assert!(matches!(
            check_integrity(&resource),
            Err(ResourceError::InvalidIdentifier(_))
        ));
    }
}
