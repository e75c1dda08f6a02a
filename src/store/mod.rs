//! Persistence backends for store records

pub mod memory;
pub mod repository;
pub mod supabase;

use std::sync::Arc;

pub use memory::MemoryRepository;
pub use repository::{RepositoryError, StoreRepository};
pub use supabase::{SupabaseClient, SupabaseError, SupabaseRepository};

use crate::config::StorageBackend;

/// Build the repository selected by configuration
pub fn connect(backend: &StorageBackend) -> Arc<dyn StoreRepository> {
    match backend {
        StorageBackend::Memory => Arc::new(MemoryRepository::new()),
        StorageBackend::Supabase {
            url,
            service_role_key,
            table,
        } => Arc::new(SupabaseRepository::new(
            SupabaseClient::new(url, service_role_key),
            table.clone(),
        )),
    }
}
