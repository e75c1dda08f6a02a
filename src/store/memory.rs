//! In-process store backend

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::repository::{RepositoryError, StoreRepository};
use crate::registry::{SiteKey, Store, StoreStatus};

/// Store records held in a concurrent map. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryRepository {
    stores: DashMap<SiteKey, Store>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreRepository for MemoryRepository {
    async fn list(&self) -> Result<Vec<Store>, RepositoryError> {
        let mut stores: Vec<Store> = self.stores.iter().map(|e| e.value().clone()).collect();
        stores.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.site_key.as_str().cmp(b.site_key.as_str()))
        });
        Ok(stores)
    }

    async fn find(&self, key: &SiteKey) -> Result<Option<Store>, RepositoryError> {
        Ok(self.stores.get(key).map(|e| e.value().clone()))
    }

    async fn insert(&self, store: Store) -> Result<Store, RepositoryError> {
        match self.stores.entry(store.site_key.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::DuplicateKey(store.site_key)),
            Entry::Vacant(slot) => {
                slot.insert(store.clone());
                Ok(store)
            }
        }
    }

    async fn update_status(
        &self,
        key: &SiteKey,
        status: StoreStatus,
    ) -> Result<Option<Store>, RepositoryError> {
        Ok(self.stores.get_mut(key).map(|mut entry| {
            entry.status = status;
            entry.clone()
        }))
    }

    async fn delete(&self, key: &SiteKey) -> Result<Option<Store>, RepositoryError> {
        Ok(self.stores.remove(key).map(|(_, store)| store))
    }
}
