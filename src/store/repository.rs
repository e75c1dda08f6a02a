//! Persistence seam for store records

use async_trait::async_trait;

use super::supabase::SupabaseError;
use crate::registry::{SiteKey, Store, StoreStatus};

/// Storage for store records, keyed by site key
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// All records, oldest first. The Supabase backend returns at most
    /// PostgREST's configured max rows in one response.
    async fn list(&self) -> Result<Vec<Store>, RepositoryError>;

    async fn find(&self, key: &SiteKey) -> Result<Option<Store>, RepositoryError>;

    /// Persist a new record. Fails with [`RepositoryError::DuplicateKey`]
    /// if a record with the same site key exists.
    async fn insert(&self, store: Store) -> Result<Store, RepositoryError>;

    /// Overwrite the status, returning the updated record or `None` if absent
    async fn update_status(
        &self,
        key: &SiteKey,
        status: StoreStatus,
    ) -> Result<Option<Store>, RepositoryError>;

    /// Remove a record, returning it or `None` if absent
    async fn delete(&self, key: &SiteKey) -> Result<Option<Store>, RepositoryError>;
}

/// Repository errors
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Site key already exists: {0}")]
    DuplicateKey(SiteKey),

    #[error(transparent)]
    Supabase(#[from] SupabaseError),
}
