//! Redis-backed collection store.
//!
//! Each collection is a single JSON string value, written without TTL.

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, instrument};

use super::{Collection, CollectionStore, StoreError};

/// Redis client with connection pooling.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    /// Create a new Redis store connection.
    pub async fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url).context("Failed to create Redis client")?;

        let conn = ConnectionManager::new(client)
            .await
            .context("Failed to connect to Redis")?;

        tracing::info!("Redis store connected");

        Ok(Self { conn })
    }
}

/// Key builders for consistent key formats.
pub mod keys {
    use super::Collection;

    pub fn collection(collection: Collection) -> String {
        format!("pricing:collection:{}", collection.name())
    }
}

#[async_trait]
impl CollectionStore for RedisStore {
    #[instrument(skip(self))]
    async fn load(&self, collection: Collection) -> Result<Option<serde_json::Value>, StoreError> {
        let mut conn = self.conn.clone();
        let key = keys::collection(collection);

        let Some(raw) = conn.get::<_, Option<String>>(&key).await? else {
            debug!(key = %key, "Collection not stored yet");
            return Ok(None);
        };

        let value = serde_json::from_str(&raw).map_err(|source| StoreError::Decode { collection, source })?;
        Ok(Some(value))
    }

    #[instrument(skip(self, data))]
    async fn save(&self, collection: Collection, data: serde_json::Value) -> Result<(), StoreError> {
        let mut conn = self.conn.clone();
        let key = keys::collection(collection);

        let raw = serde_json::to_string(&data).map_err(|source| StoreError::Encode { collection, source })?;
        conn.set::<_, _, ()>(&key, raw).await?;

        debug!(key = %key, "Stored collection");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.conn.clone();
        let pong: redis::RedisResult<String> = redis::cmd("PING").query_async(&mut conn).await;
        pong.is_ok()
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_keys() {
        assert_eq!(keys::collection(Collection::Products), "pricing:collection:products");
        assert_eq!(
            keys::collection(Collection::PricingComponents),
            "pricing:collection:pricing_components"
        );
    }
}
