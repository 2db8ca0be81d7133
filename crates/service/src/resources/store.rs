use async_trait::async_trait;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{Resource, ResourceInput};
use crate::errors::ServiceError;
use crate::storage::memory_map_store::MemoryMapStore;

/// Trait abstraction for resource storage. The HTTP layer only sees this seam.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Fetch a copy of the resource with the given id.
    async fn get(&self, id: &str) -> Result<Resource, ServiceError>;
    /// Store a new resource under a freshly generated id and return that id.
    async fn create(&self, input: ResourceInput) -> String;
    /// Replace an existing resource wholesale; `resource.id` selects the target.
    async fn update(&self, resource: Resource) -> Result<(), ServiceError>;
    /// Remove the resource if present. Unknown ids are not an error.
    async fn delete(&self, id: &str);
    async fn len(&self) -> usize;
    async fn is_empty(&self) -> bool;
}

/// `ResourceStore` backed by a locked `HashMap` keyed by id.
#[derive(Clone, Default)]
pub struct InMemoryResourceStore {
    store: MemoryMapStore<String, Resource>,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding the sample resource; returns the store and the sample's id.
    pub async fn with_sample() -> (Self, String) {
        let store = Self::new();
        let id = store.create(ResourceInput::sample()).await;
        info!(%id, "seeded sample resource");
        (store, id)
    }

    fn next_id() -> String {
        Uuid::new_v4().to_string()
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn get(&self, id: &str) -> Result<Resource, ServiceError> {
        self.store
            .get(&id.to_string())
            .await
            .ok_or_else(|| ServiceError::not_found("resource"))
    }

    #[instrument(skip_all)]
    async fn create(&self, input: ResourceInput) -> String {
        let id = Self::next_id();
        self.store.insert(id.clone(), input.into_resource(id.clone())).await;
        info!(%id, "resource created");
        id
    }

    async fn update(&self, resource: Resource) -> Result<(), ServiceError> {
        let id = resource.id.clone();
        self.store
            .update_map(move |map| {
                if resource.id.is_empty() {
                    return Err(ServiceError::not_found("resource"));
                }
                let existing = map
                    .get_mut(&resource.id)
                    .ok_or_else(|| ServiceError::not_found("resource"))?;
                *existing = resource;
                Ok(())
            })
            .await?;
        debug!(%id, "resource updated");
        Ok(())
    }

    async fn delete(&self, id: &str) {
        let existed = self.store.remove(&id.to_string()).await;
        debug!(%id, existed, "resource delete");
    }

    async fn len(&self) -> usize {
        self.store.len().await
    }

    async fn is_empty(&self) -> bool {
        self.store.is_empty().await
    }
}
