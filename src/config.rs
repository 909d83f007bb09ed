use anyhow::{bail, Context, Result};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

/// Where the three catalog collections are persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Postgres { database_url: String, max_connections: u32 },
    Redis { redis_url: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,
    pub store: StoreBackend,

    // CORS
    pub cors_allow_origins: Vec<String>,

    /// Re-price every stored product after a specialty or component change
    pub recompute_on_config_change: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Environment::from_str(&lookup("ENV").unwrap_or_else(|| "dev".to_string()));
        let server_addr = lookup("SERVER_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string());

        let store = match lookup("STORE_BACKEND")
            .unwrap_or_else(|| "memory".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StoreBackend::Memory,
            "postgres" | "postgresql" => {
                let database_url = lookup("DATABASE_URL")
                    .context("DATABASE_URL must be set when STORE_BACKEND=postgres")?;
                let max_connections = lookup("DATABASE_MAX_CONNECTIONS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10);
                StoreBackend::Postgres {
                    database_url,
                    max_connections,
                }
            }
            "redis" => StoreBackend::Redis {
                redis_url: lookup("REDIS_URL").unwrap_or_else(|| "redis://127.0.0.1:6379/0".to_string()),
            },
            other => bail!("Unknown STORE_BACKEND '{}' (expected memory, postgres or redis)", other),
        };

        // CORS
        let cors_allow_origins = lookup("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let recompute_on_config_change = lookup("RECOMPUTE_ON_CONFIG_CHANGE")
            .map(|s| matches!(s.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Settings {
            env,
            server_addr,
            store,
            cors_allow_origins,
            recompute_on_config_change,
        })
    }
}
