//! In-memory resource store.
//!
//! Resources are keyed by their full identifier. A digest index serves the
//! path-style `/resources/{digest}.json` lookups used by direct resolution.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use webvh_crypto::AttestedResource;

/// Result of storing a resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stored {
    Created(String),
    /// A resource with this identifier was already held; the store is unchanged.
    Existing(String),
}

#[derive(Default)]
struct Inner {
    by_id: HashMap<String, AttestedResource>,
    by_digest: HashMap<String, String>,
}

/// Shared handle to the store. Clones refer to the same resources.
#[derive(Clone, Default)]
pub struct ResourceStore {
    inner: Arc<RwLock<Inner>>,
}

impl ResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `resource` unless its identifier is already present.
    ///
    /// The check and the insert happen under one write lock, so concurrent
    /// duplicate submissions store exactly one copy.
    pub async fn insert(&self, resource: AttestedResource) -> Stored {
        let mut inner = self.inner.write().await;
        if inner.by_id.contains_key(&resource.id) {
            return Stored::Existing(resource.id);
        }

        let id = resource.id.clone();
        inner
            .by_digest
            .entry(resource.digest().to_string())
            .or_insert_with(|| id.clone());
        inner.by_id.insert(id.clone(), resource);
        Stored::Created(id)
    }

    pub async fn get(&self, id: &str) -> Option<AttestedResource> {
        self.inner.read().await.by_id.get(id).cloned()
    }

    /// First resource stored with this content digest.
    pub async fn get_by_digest(&self, digest: &str) -> Option<AttestedResource> {
        let inner = self.inner.read().await;
        inner
            .by_digest
            .get(digest)
            .and_then(|id| inner.by_id.get(id))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
