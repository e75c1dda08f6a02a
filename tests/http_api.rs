// Router-level tests for the registry endpoints.

use std::collections::HashMap;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use kill_switch::app::AppState;
use kill_switch::config::Config;
use kill_switch::http::build_router;

// ── Helpers ─────────────────────────────────────────────────────────

fn app_with(vars: &[(&str, &str)]) -> Router {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = Config::from_lookup(|name| vars.get(name).cloned()).unwrap();
    build_router(AppState::new(config))
}

fn app() -> Router {
    app_with(&[])
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn create(app: &Router, client: &str, store: &str, message: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/add_store",
        Some(json!({ "clientName": client, "storeName": store, "message": message })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "create failed: {}", body);
    body
}

// ── Happy path ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_toggle_delete_example() {
    let app = app();

    let store = create(&app, "Acme", "Shop1", "down").await;
    assert_eq!(store["status"], "ON");
    assert_eq!(store["clientName"], "Acme");
    let key = store["siteKey"].as_str().unwrap().to_string();
    assert!(!key.is_empty());

    let (status, updated) = send(
        &app,
        Method::POST,
        "/toggle_status",
        Some(json!({ "key": key, "status": "OFF" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "OFF");

    let (status, check) = send(&app, Method::GET, &format!("/check_status/{}", key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(check, json!({ "status": "OFF", "message": "down" }));

    let (status, deleted) =
        send(&app, Method::DELETE, &format!("/delete_store/{}", key), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["siteKey"], key.as_str());

    let (_, check) = send(&app, Method::GET, &format!("/check_status/{}", key), None).await;
    assert_eq!(check, json!({ "status": "ON" }));

    let (_, list) = send(&app, Method::GET, "/stores", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_list_returns_all_stores_with_unique_keys() {
    let app = app();
    let a = create(&app, "Acme", "Shop1", "down").await;
    let b = create(&app, "Acme", "Shop2", "down").await;
    assert_ne!(a["siteKey"], b["siteKey"]);

    let (status, list) = send(&app, Method::GET, "/stores", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["storeName"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Shop1", "Shop2"]);
}

#[tokio::test]
async fn test_repeated_toggle_keeps_last_write() {
    let app = app();
    let key = create(&app, "Acme", "Shop1", "down").await["siteKey"].clone();

    for status in ["OFF", "OFF", "ON", "ON", "OFF"] {
        let (code, body) = send(
            &app,
            Method::POST,
            "/toggle_status",
            Some(json!({ "key": key, "status": status })),
        )
        .await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["status"], status);
    }

    let (_, check) = send(
        &app,
        Method::GET,
        &format!("/check_status/{}", key.as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(check["status"], "OFF");
}

#[tokio::test]
async fn test_create_accepts_initial_status_and_default_message() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/add_store",
        Some(json!({ "clientName": "Acme", "storeName": "Shop1", "status": "off" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OFF");
    assert_eq!(
        body["message"],
        "This site is temporarily unavailable due to maintenance."
    );
}

// ── Public status check ─────────────────────────────────────────────

#[tokio::test]
async fn test_check_status_never_leaks_names() {
    let app = app();
    let key = create(&app, "Secret Client", "Secret Store", "down").await["siteKey"].clone();

    let (_, check) = send(
        &app,
        Method::GET,
        &format!("/check_status/{}", key.as_str().unwrap()),
        None,
    )
    .await;
    let text = check.to_string();
    assert!(!text.contains("Secret"));
    assert!(check.get("clientName").is_none());
    assert!(check.get("storeName").is_none());
    assert!(check.get("siteKey").is_none());
}

#[tokio::test]
async fn test_check_status_fails_open_for_unknown_and_malformed_keys() {
    let app = app();
    for key in [
        "unknown",
        "bad%20key",
        "%3Cscript%3E",
        "a&select=client_name",
        "%FF",
        "abc%2Fdef",
    ] {
        let (status, check) =
            send(&app, Method::GET, &format!("/check_status/{}", key), None).await;
        assert_eq!(status, StatusCode::OK, "key {}", key);
        assert_eq!(check, json!({ "status": "ON" }), "key {}", key);
    }
}

#[tokio::test]
async fn test_check_status_allows_any_origin() {
    let app = app_with(&[("ADMIN_ORIGIN", "https://admin.example")]);
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/check_status/unknown")
                .header(header::ORIGIN, "https://shop.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

async fn from_origin(
    app: &Router,
    method: Method,
    uri: &str,
    origin: &str,
    preflight_method: Option<&str>,
) -> axum::http::HeaderMap {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::ORIGIN, origin);
    if let Some(requested) = preflight_method {
        builder = builder.header(header::ACCESS_CONTROL_REQUEST_METHOD, requested);
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    response.headers().clone()
}

#[tokio::test]
async fn test_admin_routes_allow_only_configured_origins() {
    let app = app_with(&[("ADMIN_ORIGIN", "https://admin.example")]);

    let headers = from_origin(
        &app,
        Method::OPTIONS,
        "/delete_store/x",
        "https://admin.example",
        Some("DELETE"),
    )
    .await;
    assert_eq!(
        headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "https://admin.example"
    );
    let methods = headers[header::ACCESS_CONTROL_ALLOW_METHODS].to_str().unwrap();
    assert!(methods.contains("DELETE"), "allowed methods: {}", methods);

    let headers = from_origin(&app, Method::GET, "/stores", "https://evil.example", None).await;
    assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

#[tokio::test]
async fn test_admin_routes_open_without_configured_origins() {
    let app = app();
    let headers = from_origin(&app, Method::GET, "/stores", "https://evil.example", None).await;
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
}

// ── Error paths ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_rejects_missing_names() {
    let app = app();
    for body in [
        json!({ "storeName": "Shop1", "message": "down" }),
        json!({ "clientName": "Acme", "storeName": "   " }),
        json!({}),
    ] {
        let (status, err) = send(&app, Method::POST, "/add_store", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(err["error"].as_str().unwrap().contains("Missing required field"));
    }

    let (_, list) = send(&app, Method::GET, "/stores", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let app = app();
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/add_store")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_toggle_rejects_invalid_status_and_unknown_key() {
    let app = app();
    let key = create(&app, "Acme", "Shop1", "down").await["siteKey"].clone();

    let (status, _) = send(
        &app,
        Method::POST,
        "/toggle_status",
        Some(json!({ "key": key, "status": "PAUSED" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/toggle_status",
        Some(json!({ "key": key })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, err) = send(
        &app,
        Method::POST,
        "/toggle_status",
        Some(json!({ "key": "doesnotexist", "status": "OFF" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "Store not found");

    // the rejected writes left the store untouched
    let (_, check) = send(
        &app,
        Method::GET,
        &format!("/check_status/{}", key.as_str().unwrap()),
        None,
    )
    .await;
    assert_eq!(check["status"], "ON");
}

#[tokio::test]
async fn test_delete_unknown_store_is_not_found() {
    let app = app();
    let (status, err) = send(&app, Method::DELETE, "/delete_store/doesnotexist", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "Store not found");
}

#[tokio::test]
async fn test_liveness_and_health() {
    let app = app();
    let (status, banner) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(banner, Value::String("Kill Switch Server is Alive!".into()));

    let (status, health) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "ok");
    assert_eq!(health["backend"], "memory");
}
