use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{Collection, CollectionStore, StoreError};

/// PostgreSQL store: one JSONB row per collection in `pricing_collections`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollectionStore for PgStore {
    async fn load(&self, collection: Collection) -> Result<Option<serde_json::Value>, StoreError> {
        let row: Option<(Json<serde_json::Value>,)> =
            sqlx::query_as("SELECT data FROM pricing_collections WHERE name = $1")
                .bind(collection.name())
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(Json(data),)| data))
    }

    async fn save(&self, collection: Collection, data: serde_json::Value) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO pricing_collections (name, data, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (name) DO UPDATE
            SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(collection.name())
        .bind(Json(data))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn health_check(&self) -> bool {
        crate::db::health_check(&self.pool).await
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
