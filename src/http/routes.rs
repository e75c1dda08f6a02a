//! HTTP route definitions

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{header, HeaderValue, Method},
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::app::AppState;
use crate::http::error::AppError;
use crate::registry::{NewStore, StatusCheck, Store, StoreStatus};

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // Storefronts on arbitrary domains poll the status check
    let public_cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let admin_cors = CorsLayer::new()
        .allow_origin(admin_origins(&state.config.admin_origins))
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let public_routes = Router::new()
        .route("/", get(alive_handler))
        .route("/health", get(health_handler))
        .route("/check_status/:site_key", get(check_status_handler))
        .layer(public_cors);

    let admin_routes = Router::new()
        .route("/stores", get(list_stores_handler))
        .route("/add_store", post(add_store_handler))
        .route("/toggle_status", post(toggle_status_handler))
        .route("/delete_store/:site_key", delete(delete_store_handler))
        .layer(admin_cors);

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Admin origins from configuration (comma-separated in ADMIN_ORIGIN)
fn admin_origins(configured: &[String]) -> AllowOrigin {
    if configured.is_empty() {
        return AllowOrigin::any();
    }

    let origins: Vec<HeaderValue> = configured
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparsable admin origin");
                None
            }
        })
        .collect();

    AllowOrigin::list(origins)
}

// ============================================================================
// Liveness
// ============================================================================

async fn alive_handler() -> &'static str {
    "Kill Switch Server is Alive!"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    backend: &'static str,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: state.started_at.elapsed().as_secs(),
        backend: state.config.backend.name(),
    })
}

// ============================================================================
// Admin endpoints
// ============================================================================

async fn list_stores_handler(State(state): State<AppState>) -> Result<Json<Vec<Store>>, AppError> {
    let stores = state.registry.list().await?;
    Ok(Json(stores))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddStoreRequest {
    client_name: Option<String>,
    store_name: Option<String>,
    message: Option<String>,
    status: Option<String>,
}

async fn add_store_handler(
    State(state): State<AppState>,
    payload: Result<Json<AddStoreRequest>, JsonRejection>,
) -> Result<Json<Store>, AppError> {
    let Json(req) = payload?;

    let mut new_store = NewStore::new(
        req.client_name.unwrap_or_default(),
        req.store_name.unwrap_or_default(),
        req.message,
    )
    .map_err(|e| AppError::BadRequest(e.to_string()))?;

    if let Some(status) = req.status {
        let status = status
            .parse::<StoreStatus>()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        new_store = new_store.with_status(status);
    }

    let store = state.registry.create(new_store).await?;
    Ok(Json(store))
}

#[derive(Deserialize)]
struct ToggleStatusRequest {
    key: Option<String>,
    status: Option<String>,
}

async fn toggle_status_handler(
    State(state): State<AppState>,
    payload: Result<Json<ToggleStatusRequest>, JsonRejection>,
) -> Result<Json<Store>, AppError> {
    let Json(req) = payload?;

    let key = req
        .key
        .ok_or_else(|| AppError::BadRequest("Missing required field: key".to_string()))?;
    let status = req
        .status
        .ok_or_else(|| AppError::BadRequest("Missing required field: status".to_string()))?;

    let store = state.registry.set_status(&key, &status).await?;
    Ok(Json(store))
}

async fn delete_store_handler(
    State(state): State<AppState>,
    Path(site_key): Path<String>,
) -> Result<Json<Store>, AppError> {
    let removed = state.registry.delete(&site_key).await?;
    Ok(Json(removed))
}

// ============================================================================
// Public status check
// ============================================================================

async fn check_status_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Json<StatusCheck> {
    // Undecodable keys (e.g. invalid UTF-8) are unknown keys
    match path {
        Ok(Path(site_key)) => Json(state.registry.check_status(&site_key).await),
        Err(_) => Json(StatusCheck::fail_open()),
    }
}
