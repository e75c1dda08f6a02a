//! Application state shared across routes

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::registry::StoreRegistry;
use crate::store::{self, StoreRepository};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub registry: StoreRegistry,
    pub started_at: Instant,
}

impl AppState {
    /// Build state with the backend named in `config`
    pub fn new(config: Config) -> Self {
        let repo = store::connect(&config.backend);
        Self::with_repository(config, repo)
    }

    pub fn with_repository(config: Config, repo: Arc<dyn StoreRepository>) -> Self {
        Self {
            config: Arc::new(config),
            registry: StoreRegistry::new(repo),
            started_at: Instant::now(),
        }
    }
}
