//! In-memory object store.

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

use mandal_core::AppResult;
use mandal_core::traits::ObjectStore;

/// In-memory [`ObjectStore`]; URLs use a fake `memory://` scheme.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: DashMap<String, Bytes>,
}

impl MemoryObjectStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an object exists at the path.
    pub fn contains(&self, path: &str) -> bool {
        self.objects.contains_key(path)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, path: &str, data: Bytes) -> AppResult<String> {
        self.objects.insert(path.to_string(), data);
        Ok(format!("memory://gallery/{path}"))
    }

    async fn remove(&self, path: &str) -> AppResult<()> {
        self.objects.remove(path);
        Ok(())
    }
}
