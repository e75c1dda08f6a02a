//! REST client for the registry's admin and public endpoints

use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::registry::{SiteKey, StatusCheck, Store, StoreStatus};

/// Typed client for a running registry service
#[derive(Clone)]
pub struct AdminClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddStoreBody<'a> {
    client_name: &'a str,
    store_name: &'a str,
    message: &'a str,
}

#[derive(Serialize)]
struct ToggleStatusBody<'a> {
    key: &'a str,
    status: StoreStatus,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl AdminClient {
    pub fn new(base_url: &str) -> Self {
        Self::from_reqwest(base_url, Client::new())
    }

    pub fn from_reqwest(base_url: &str, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_stores(&self) -> Result<Vec<Store>, AdminError> {
        let response = self.client.get(self.url("/stores")).send().await?;
        parse(response).await
    }

    pub async fn create_store(
        &self,
        client_name: &str,
        store_name: &str,
        message: &str,
    ) -> Result<Store, AdminError> {
        let body = AddStoreBody {
            client_name,
            store_name,
            message,
        };
        let response = self
            .client
            .post(self.url("/add_store"))
            .json(&body)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn set_status(&self, key: &SiteKey, status: StoreStatus) -> Result<Store, AdminError> {
        let body = ToggleStatusBody {
            key: key.as_str(),
            status,
        };
        let response = self
            .client
            .post(self.url("/toggle_status"))
            .json(&body)
            .send()
            .await?;
        parse(response).await
    }

    pub async fn delete_store(&self, key: &SiteKey) -> Result<Store, AdminError> {
        let response = self
            .client
            .delete(self.url(&format!("/delete_store/{}", key)))
            .send()
            .await?;
        parse(response).await
    }

    pub async fn check_status(&self, key: &SiteKey) -> Result<StatusCheck, AdminError> {
        let response = self
            .client
            .get(self.url(&format!("/check_status/{}", key)))
            .send()
            .await?;
        parse(response).await
    }
}

async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, AdminError> {
    let status = response.status();
    if status.is_success() {
        return response.json().await.map_err(AdminError::Request);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or(body);

    if status == StatusCode::NOT_FOUND {
        Err(AdminError::NotFound(message))
    } else {
        Err(AdminError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

/// Admin client errors
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error("{0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}
