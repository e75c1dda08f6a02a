//! Admin dashboard: the store list plus create, toggle and delete actions.
//!
//! The list is re-fetched from the service after every mutation; nothing is
//! updated locally ahead of the server.

use tabled::{settings::Style, Table, Tabled};

use super::client::{AdminClient, AdminError};
use super::snippet::install_snippet;
use crate::registry::{SiteKey, Store, StoreStatus, DEFAULT_MESSAGE};

/// Shown when a create is attempted without both names
pub const MISSING_NAMES: &str = "Please fill in Client Name and Store Name";

/// Shown in place of the table when nothing is registered
pub const EMPTY_LIST: &str = "No stores found. Add one above!";

/// Onboarding form for a new client store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateForm {
    pub client_name: String,
    pub store_name: String,
    pub message: String,
}

impl Default for CreateForm {
    fn default() -> Self {
        Self {
            client_name: String::new(),
            store_name: String::new(),
            message: DEFAULT_MESSAGE.to_string(),
        }
    }
}

impl CreateForm {
    pub fn new(client_name: impl Into<String>, store_name: impl Into<String>) -> Self {
        Self {
            client_name: client_name.into(),
            store_name: store_name.into(),
            ..Self::default()
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    fn validate(&self) -> Result<(), AdminError> {
        if self.client_name.trim().is_empty() || self.store_name.trim().is_empty() {
            return Err(AdminError::Validation(MISSING_NAMES.to_string()));
        }
        Ok(())
    }
}

/// Label for the toggle button: the action a click takes, not the state
pub fn toggle_label(status: StoreStatus) -> &'static str {
    match status {
        StoreStatus::On => "KILL SWITCH",
        StoreStatus::Off => "ACTIVATE",
    }
}

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct DashboardRow {
    #[tabled(rename = "Client")]
    pub client: String,
    #[tabled(rename = "Store")]
    pub store: String,
    #[tabled(rename = "Site Key")]
    pub site_key: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Action")]
    pub action: String,
}

impl From<&Store> for DashboardRow {
    fn from(s: &Store) -> Self {
        Self {
            client: s.client_name.clone(),
            store: s.store_name.clone(),
            site_key: s.site_key.to_string(),
            status: s.status.to_string(),
            action: toggle_label(s.status).to_string(),
        }
    }
}

pub struct Dashboard {
    client: AdminClient,
    stores: Vec<Store>,
}

impl Dashboard {
    /// Fetch the store list and build the dashboard
    pub async fn load(client: AdminClient) -> Result<Self, AdminError> {
        let mut dashboard = Self {
            client,
            stores: Vec::new(),
        };
        dashboard.refresh().await?;
        Ok(dashboard)
    }

    pub async fn refresh(&mut self) -> Result<(), AdminError> {
        self.stores = self.client.list_stores().await?;
        Ok(())
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn find(&self, key: &SiteKey) -> Option<&Store> {
        self.stores.iter().find(|s| &s.site_key == key)
    }

    /// Submit the form. Nothing is sent unless both names are filled in;
    /// on success the form is reset and the list re-fetched.
    pub async fn create(&mut self, form: &mut CreateForm) -> Result<Store, AdminError> {
        form.validate()?;

        let created = self
            .client
            .create_store(&form.client_name, &form.store_name, &form.message)
            .await?;

        *form = CreateForm::default();
        self.refresh().await?;
        Ok(created)
    }

    /// Flip a listed store to the opposite of its displayed status
    pub async fn toggle(&mut self, key: &SiteKey) -> Result<Store, AdminError> {
        let next = self
            .find(key)
            .map(|s| s.status.toggled())
            .ok_or_else(|| AdminError::NotFound(format!("Store {} is not listed", key)))?;

        let updated = self.client.set_status(key, next).await?;
        self.refresh().await?;
        Ok(updated)
    }

    /// Delete a listed store once `confirm` approves it.
    /// Returns `false` without contacting the service when declined.
    pub async fn delete<F>(&mut self, key: &SiteKey, confirm: F) -> Result<bool, AdminError>
    where
        F: FnOnce(&Store) -> bool,
    {
        let store = self
            .find(key)
            .ok_or_else(|| AdminError::NotFound(format!("Store {} is not listed", key)))?;
        if !confirm(store) {
            return Ok(false);
        }

        self.client.delete_store(key).await?;
        self.refresh().await?;
        Ok(true)
    }

    pub fn rows(&self) -> Vec<DashboardRow> {
        self.stores.iter().map(DashboardRow::from).collect()
    }

    pub fn render(&self) -> String {
        if self.stores.is_empty() {
            return EMPTY_LIST.to_string();
        }
        Table::new(self.rows()).with(Style::rounded()).to_string()
    }

    /// Installable snippet for a listed store
    pub fn snippet(&self, key: &SiteKey) -> Result<String, AdminError> {
        let store = self
            .find(key)
            .ok_or_else(|| AdminError::NotFound(format!("Store {} is not listed", key)))?;
        Ok(install_snippet(self.client.base_url(), &store.site_key))
    }
}
