use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

use super::{Collection, CollectionStore, StoreError};

/// Process-local store. Used for tests and single-instance runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<Collection, serde_json::Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CollectionStore for MemoryStore {
    async fn load(&self, collection: Collection) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.collections.read().get(&collection).cloned())
    }

    async fn save(&self, collection: Collection, data: serde_json::Value) -> Result<(), StoreError> {
        self.collections.write().insert(collection, data);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
