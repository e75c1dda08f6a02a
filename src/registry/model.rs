//! Store record and its public projection

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::site_key::SiteKey;

/// Message shown to shoppers when no message was supplied
pub const DEFAULT_MESSAGE: &str = "This site is temporarily unavailable due to maintenance.";

/// Kill switch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StoreStatus {
    /// Storefront renders normally
    #[default]
    #[serde(rename = "ON")]
    On,
    /// Storefront is replaced by the maintenance overlay
    #[serde(rename = "OFF")]
    Off,
}

impl StoreStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreStatus::On => "ON",
            StoreStatus::Off => "OFF",
        }
    }

    /// The opposite state
    pub fn toggled(self) -> Self {
        match self {
            StoreStatus::On => StoreStatus::Off,
            StoreStatus::Off => StoreStatus::On,
        }
    }
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid status '{0}' (expected ON or OFF)")]
pub struct InvalidStatus(pub String);

impl FromStr for StoreStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("ON") {
            Ok(StoreStatus::On)
        } else if trimmed.eq_ignore_ascii_case("OFF") {
            Ok(StoreStatus::Off)
        } else {
            Err(InvalidStatus(s.to_string()))
        }
    }
}

/// A registered storefront
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub client_name: String,
    pub store_name: String,
    pub site_key: SiteKey,
    pub message: String,
    pub status: StoreStatus,
    pub created_at: DateTime<Utc>,
}

/// Validated input for creating a store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStore {
    client_name: String,
    store_name: String,
    message: String,
    status: StoreStatus,
}

/// Reason a store could not be built from user input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NewStoreError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

impl NewStore {
    /// Build creation input, rejecting blank client or store names.
    /// A blank message falls back to [`DEFAULT_MESSAGE`].
    pub fn new(
        client_name: impl Into<String>,
        store_name: impl Into<String>,
        message: Option<String>,
    ) -> Result<Self, NewStoreError> {
        let client_name = required(client_name.into(), "clientName")?;
        let store_name = required(store_name.into(), "storeName")?;
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MESSAGE.to_string());

        Ok(Self {
            client_name,
            store_name,
            message,
            status: StoreStatus::On,
        })
    }

    pub fn with_status(mut self, status: StoreStatus) -> Self {
        self.status = status;
        self
    }

    /// Attach a key and creation time, producing the record to persist
    pub fn into_store(self, site_key: SiteKey, created_at: DateTime<Utc>) -> Store {
        Store {
            client_name: self.client_name,
            store_name: self.store_name,
            site_key,
            message: self.message,
            status: self.status,
            created_at,
        }
    }
}

fn required(value: String, field: &'static str) -> Result<String, NewStoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(NewStoreError::MissingField(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// What the public status check reveals about a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCheck {
    pub status: StoreStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StatusCheck {
    /// Response for keys that cannot be resolved
    pub fn fail_open() -> Self {
        Self {
            status: StoreStatus::On,
            message: None,
        }
    }
}

impl From<&Store> for StatusCheck {
    fn from(store: &Store) -> Self {
        Self {
            status: store.status,
            message: Some(store.message.clone()),
        }
    }
}
