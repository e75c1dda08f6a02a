//! Supabase REST API client using service_role key

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::repository::{RepositoryError, StoreRepository};
use crate::registry::{SiteKey, Store, StoreStatus};

/// Supabase client for server-side database operations
/// Uses service_role key which bypasses RLS - handle with care!
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    service_role_key: String,
}

/// Filter and modifier pairs, sent URL-encoded (`site_key=eq.abc`)
pub type Query<'a> = [(&'a str, String)];

impl SupabaseClient {
    pub fn new(base_url: &str, service_role_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key: service_role_key.to_string(),
        }
    }

    /// Get the REST API URL for a table
    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Start an authenticated request against a table
    fn request(&self, method: Method, table: &str, query: &Query<'_>) -> RequestBuilder {
        self.client
            .request(method, self.rest_url(table))
            .query(query)
            .header("apikey", &self.service_role_key)
            .header("Authorization", format!("Bearer {}", self.service_role_key))
            .header("Content-Type", "application/json")
    }

    /// Make an authenticated GET request
    pub async fn get<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query<'_>,
    ) -> Result<Vec<T>, SupabaseError> {
        let response = self
            .request(Method::GET, table, query)
            .send()
            .await
            .map_err(SupabaseError::Request)?;

        parse_rows(response).await
    }

    /// Make an authenticated POST request (insert)
    pub async fn insert<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        data: &T,
    ) -> Result<R, SupabaseError> {
        let response = self
            .request(Method::POST, table, &[])
            .header("Prefer", "return=representation")
            .json(data)
            .send()
            .await
            .map_err(SupabaseError::Request)?;

        // PostgREST returns an array, get first element
        let results: Vec<R> = parse_rows(response).await?;
        results
            .into_iter()
            .next()
            .ok_or(SupabaseError::NoRowReturned)
    }

    /// Make an authenticated PATCH request (update), returning the changed rows
    pub async fn update<T: Serialize, R: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query<'_>,
        data: &T,
    ) -> Result<Vec<R>, SupabaseError> {
        let response = self
            .request(Method::PATCH, table, query)
            .header("Prefer", "return=representation")
            .json(data)
            .send()
            .await
            .map_err(SupabaseError::Request)?;

        parse_rows(response).await
    }

    /// Make an authenticated DELETE request, returning the removed rows
    pub async fn delete<R: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query<'_>,
    ) -> Result<Vec<R>, SupabaseError> {
        let response = self
            .request(Method::DELETE, table, query)
            .header("Prefer", "return=representation")
            .send()
            .await
            .map_err(SupabaseError::Request)?;

        parse_rows(response).await
    }
}

async fn parse_rows<R: DeserializeOwned>(response: Response) -> Result<Vec<R>, SupabaseError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SupabaseError::Api {
            status: status.as_u16(),
            body,
        });
    }

    response.json().await.map_err(SupabaseError::Parse)
}

/// Row shape of the stores table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreRow {
    pub client_name: String,
    pub store_name: String,
    pub site_key: SiteKey,
    pub message: String,
    pub status: StoreStatus,
    pub created_at: DateTime<Utc>,
}

impl From<Store> for StoreRow {
    fn from(s: Store) -> Self {
        Self {
            client_name: s.client_name,
            store_name: s.store_name,
            site_key: s.site_key,
            message: s.message,
            status: s.status,
            created_at: s.created_at,
        }
    }
}

impl From<StoreRow> for Store {
    fn from(r: StoreRow) -> Self {
        Self {
            client_name: r.client_name,
            store_name: r.store_name,
            site_key: r.site_key,
            message: r.message,
            status: r.status,
            created_at: r.created_at,
        }
    }
}

/// Status update payload
#[derive(Debug, Clone, Serialize)]
struct StatusUpdate {
    status: StoreStatus,
}

/// Store records kept in a Supabase table
#[derive(Clone)]
pub struct SupabaseRepository {
    client: SupabaseClient,
    table: String,
}

impl SupabaseRepository {
    pub fn new(client: SupabaseClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    fn key_filter(key: &SiteKey) -> [(&'static str, String); 1] {
        [("site_key", format!("eq.{}", key))]
    }
}

#[async_trait]
impl StoreRepository for SupabaseRepository {
    async fn list(&self) -> Result<Vec<Store>, RepositoryError> {
        let rows: Vec<StoreRow> = self
            .client
            .get(&self.table, &[("order", "created_at.asc".to_string())])
            .await?;
        Ok(rows.into_iter().map(Store::from).collect())
    }

    async fn find(&self, key: &SiteKey) -> Result<Option<Store>, RepositoryError> {
        let rows: Vec<StoreRow> = self.client.get(&self.table, &Self::key_filter(key)).await?;
        Ok(rows.into_iter().next().map(Store::from))
    }

    async fn insert(&self, store: Store) -> Result<Store, RepositoryError> {
        let key = store.site_key.clone();
        let row = StoreRow::from(store);
        match self.client.insert::<_, StoreRow>(&self.table, &row).await {
            Ok(created) => Ok(created.into()),
            Err(SupabaseError::Api { status, .. }) if status == StatusCode::CONFLICT.as_u16() => {
                Err(RepositoryError::DuplicateKey(key))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_status(
        &self,
        key: &SiteKey,
        status: StoreStatus,
    ) -> Result<Option<Store>, RepositoryError> {
        let rows: Vec<StoreRow> = self
            .client
            .update(&self.table, &Self::key_filter(key), &StatusUpdate { status })
            .await?;
        Ok(rows.into_iter().next().map(Store::from))
    }

    async fn delete(&self, key: &SiteKey) -> Result<Option<Store>, RepositoryError> {
        let rows: Vec<StoreRow> = self
            .client
            .delete(&self.table, &Self::key_filter(key))
            .await?;
        Ok(rows.into_iter().next().map(Store::from))
    }
}

/// Supabase errors
#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    Parse(reqwest::Error),

    #[error("No row returned from insert")]
    NoRowReturned,
}
