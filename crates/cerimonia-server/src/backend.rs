//! Backend selection: Supabase when configured, in-memory otherwise.

use crate::config::BackendConfig;
use anyhow::{Context, Result};
use cerimonia_core::{MemoryStore, Stores};
use std::sync::Arc;
use supabase_client::SupabaseClient;
use tracing::{info, warn};

/// The data backend serving the stores.
#[derive(Clone)]
pub enum Backend {
    Memory(Arc<MemoryStore>),
    Supabase(Arc<SupabaseClient>),
}

impl Backend {
    /// Build the backend described by the configuration.
    pub async fn from_config(config: &BackendConfig) -> Result<Self> {
        if let Some((url, key)) = config.supabase() {
            let client = SupabaseClient::new(url, key, config.timeout())
                .context("Failed to create Supabase client")?;
            info!(url, "Using Supabase backend");
            return Ok(Backend::Supabase(Arc::new(client)));
        }

        warn!("Supabase not configured, using in-memory backend");
        let store = Arc::new(MemoryStore::new());
        if let Some(path) = &config.seed_events {
            store
                .load_events(path)
                .await
                .context("Failed to seed events")?;
        }
        Ok(Backend::Memory(store))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Memory(_) => "memory",
            Backend::Supabase(_) => "supabase",
        }
    }

    pub fn stores(&self) -> Stores {
        match self {
            Backend::Memory(store) => Stores::from_backend(store.clone()),
            Backend::Supabase(client) => Stores::from_backend(client.clone()),
        }
    }

    pub async fn health_check(&self) -> bool {
        match self {
            Backend::Memory(_) => true,
            Backend::Supabase(client) => client.health_check().await,
        }
    }
}
