use std::{collections::HashMap, hash::Hash, sync::Arc};
use tokio::sync::RwLock;

use crate::errors::ServiceError;

/// Generic in-memory key-value map store.
///
/// Wraps a `HashMap<K, V>` in a Tokio `RwLock`; every method holds the lock for
/// its whole duration, so each call is atomic relative to the others.
/// Values are cloned in and out; callers never hold references into the map.
#[derive(Clone)]
pub struct MemoryMapStore<K, V> {
    inner: Arc<RwLock<HashMap<K, V>>>,
}

impl<K, V> Default for MemoryMapStore<K, V> {
    fn default() -> Self {
        Self { inner: Arc::new(RwLock::new(HashMap::new())) }
    }
}

impl<K, V> MemoryMapStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Get value by key.
    pub async fn get(&self, key: &K) -> Option<V> {
        let map = self.inner.read().await;
        map.get(key).cloned()
    }

    /// Insert or overwrite a value by key.
    pub async fn insert(&self, key: K, value: V) {
        let mut map = self.inner.write().await;
        map.insert(key, value);
    }

    /// Remove a key; returns whether it existed.
    pub async fn remove(&self, key: &K) -> bool {
        let mut map = self.inner.write().await;
        map.remove(key).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Apply a mutation to the underlying map while holding the write lock.
    pub async fn update_map<F, R>(&self, f: F) -> Result<R, ServiceError>
    where
        F: FnOnce(&mut HashMap<K, V>) -> Result<R, ServiceError>,
    {
        let mut map = self.inner.write().await;
        f(&mut map)
    }
}
