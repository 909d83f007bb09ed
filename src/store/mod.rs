//! Collection storage
//!
//! The catalog persists three collections, each loaded and saved as one
//! JSON document. Saving replaces the whole collection; the last write wins.

pub mod memory;
pub mod postgres;
pub mod redis;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use self::memory::MemoryStore;
pub use self::postgres::PgStore;
pub use self::redis::RedisStore;

/// Logical collection names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Specialties,
    PricingComponents,
    Products,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Specialties => "specialties",
            Self::PricingComponents => "pricing_components",
            Self::Products => "products",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Collection '{collection}' could not be decoded: {source}")]
    Decode {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },

    #[error("Collection '{collection}' could not be encoded: {source}")]
    Encode {
        collection: Collection,
        #[source]
        source: serde_json::Error,
    },
}

/// Load/save facility keyed by collection name.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Returns the stored document, or `None` if the collection was never saved.
    async fn load(&self, collection: Collection) -> Result<Option<serde_json::Value>, StoreError>;

    /// Replaces the whole collection atomically.
    async fn save(&self, collection: Collection, data: serde_json::Value) -> Result<(), StoreError>;

    async fn health_check(&self) -> bool;

    fn backend_name(&self) -> &'static str;
}

/// Loads a collection as a typed list; a missing collection is empty.
pub async fn load_list<T>(store: &dyn CollectionStore, collection: Collection) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
{
    match store.load(collection).await? {
        Some(value) => serde_json::from_value(value).map_err(|source| StoreError::Decode { collection, source }),
        None => Ok(Vec::new()),
    }
}

/// Loads a collection item by item. Items that fail to decode are skipped
/// with a warning and are dropped the next time the collection is saved.
pub async fn load_valid_items<T>(store: &dyn CollectionStore, collection: Collection) -> Result<Vec<T>, StoreError>
where
    T: DeserializeOwned,
{
    let items = match store.load(collection).await? {
        Some(serde_json::Value::Array(items)) => items,
        Some(other) => {
            return serde_json::from_value(other).map_err(|source| StoreError::Decode { collection, source });
        }
        None => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(position, item)| match serde_json::from_value(item) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(
                    collection = %collection,
                    position,
                    error = %err,
                    "Skipping item that could not be decoded"
                );
                None
            }
        })
        .collect())
}

pub async fn save_list<T>(store: &dyn CollectionStore, collection: Collection, items: &[T]) -> Result<(), StoreError>
where
    T: Serialize + Sync,
{
    let value = serde_json::to_value(items).map_err(|source| StoreError::Encode { collection, source })?;
    store.save(collection, value).await?;
    tracing::debug!(collection = %collection, items = items.len(), "Saved collection");
    Ok(())
}
