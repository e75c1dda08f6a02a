//! Store registry - create, list, toggle, delete and the public status check

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::model::{NewStore, NewStoreError, StatusCheck, Store, StoreStatus};
use super::site_key::SiteKey;
use crate::store::{RepositoryError, StoreRepository};

/// Fresh keys tried before giving up on a create
pub const MAX_KEY_ATTEMPTS: usize = 5;

/// Registry of storefronts and their kill switch state
#[derive(Clone)]
pub struct StoreRegistry {
    repo: Arc<dyn StoreRepository>,
}

impl StoreRegistry {
    pub fn new(repo: Arc<dyn StoreRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Store>, RegistryError> {
        Ok(self.repo.list().await?)
    }

    /// Persist a new store under a freshly generated site key
    pub async fn create(&self, new_store: NewStore) -> Result<Store, RegistryError> {
        for attempt in 1..=MAX_KEY_ATTEMPTS {
            let key = SiteKey::generate();
            let store = new_store.clone().into_store(key, Utc::now());

            match self.repo.insert(store).await {
                Ok(created) => {
                    info!(
                        site_key = %created.site_key,
                        client = %created.client_name,
                        store = %created.store_name,
                        "Store created"
                    );
                    return Ok(created);
                }
                Err(RepositoryError::DuplicateKey(key)) => {
                    warn!(site_key = %key, attempt, "Generated site key collided, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(RegistryError::KeySpaceExhausted)
    }

    /// Overwrite the status of a store. `status` is the raw requested value.
    pub async fn set_status(&self, raw_key: &str, status: &str) -> Result<Store, RegistryError> {
        let key = SiteKey::parse(raw_key)
            .ok_or_else(|| RegistryError::Validation(format!("Invalid site key '{}'", raw_key)))?;
        let status = status
            .parse::<StoreStatus>()
            .map_err(|e| RegistryError::Validation(e.to_string()))?;

        let updated = self
            .repo
            .update_status(&key, status)
            .await?
            .ok_or(RegistryError::NotFound)?;

        info!(site_key = %key, status = %status, "Store status updated");
        Ok(updated)
    }

    /// Remove a store, returning the deleted record
    pub async fn delete(&self, raw_key: &str) -> Result<Store, RegistryError> {
        let key = SiteKey::parse(raw_key).ok_or(RegistryError::NotFound)?;
        let removed = self.repo.delete(&key).await?.ok_or(RegistryError::NotFound)?;

        info!(site_key = %key, "Store deleted");
        Ok(removed)
    }

    /// Public lookup. Never fails: anything that cannot be resolved is ON.
    pub async fn check_status(&self, raw_key: &str) -> StatusCheck {
        let Some(key) = SiteKey::parse(raw_key) else {
            return StatusCheck::fail_open();
        };

        match self.repo.find(&key).await {
            Ok(Some(store)) => StatusCheck::from(&store),
            Ok(None) => StatusCheck::fail_open(),
            Err(e) => {
                warn!(site_key = %key, error = %e, "Status lookup failed, failing open");
                StatusCheck::fail_open()
            }
        }
    }
}

/// Registry errors
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{0}")]
    Validation(String),

    #[error("Store not found")]
    NotFound,

    #[error("Could not allocate a unique site key")]
    KeySpaceExhausted,

    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),
}

impl From<NewStoreError> for RegistryError {
    fn from(e: NewStoreError) -> Self {
        RegistryError::Validation(e.to_string())
    }
}
