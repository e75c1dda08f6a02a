//! Store registry domain: records, site keys and the registry service

pub mod model;
pub mod service;
pub mod site_key;

pub use model::{NewStore, NewStoreError, StatusCheck, Store, StoreStatus, DEFAULT_MESSAGE};
pub use service::{RegistryError, StoreRegistry};
pub use site_key::SiteKey;
