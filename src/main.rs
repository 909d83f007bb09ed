use anyhow::Result;
use std::sync::Arc;

use freelance_pricing::{
    app, config, db, logging,
    store::{CollectionStore, MemoryStore, PgStore, RedisStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        recompute_on_config_change = settings.recompute_on_config_change,
        "Starting freelance pricing backend"
    );

    // Create the collection store
    let store: Arc<dyn CollectionStore> = match &settings.store {
        config::StoreBackend::Memory => {
            tracing::warn!("Using in-memory store - data is lost on restart");
            Arc::new(MemoryStore::new())
        }
        config::StoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            let pool = db::create_pool(database_url, *max_connections).await?;
            Arc::new(PgStore::new(pool))
        }
        config::StoreBackend::Redis { redis_url } => {
            let store = RedisStore::new(redis_url).await?;
            tracing::info!("Redis store initialized");
            Arc::new(store)
        }
    };

    // Create application state
    let server_addr = settings.server_addr.clone();
    let state = app::AppState::new(settings, store);

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&server_addr).await?;
    tracing::info!("Listening on {}", server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
