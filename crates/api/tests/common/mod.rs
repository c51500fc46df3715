#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use dreamboard_advisor::{Advisor, AdvisorConfig};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tokio::sync::mpsc;
use tower::ServiceExt;

use dreamboard_api::auth::session::SessionStore;
use dreamboard_api::background::enrichment::{EnrichmentJob, EnrichmentQueue, EnrichmentWorker};
use dreamboard_api::config::{ServerConfig, SessionConfig};
use dreamboard_api::router::build_app_router;
use dreamboard_api::state::AppState;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        static_dir: None,
        enrichment_queue_capacity: 64,
        session: SessionConfig::default(),
    }
}

/// Build the full application router plus the receiving end of its
/// enrichment queue, so tests can inspect and run queued jobs.
pub fn build_test_app_with_jobs(pool: PgPool) -> (Router, mpsc::Receiver<EnrichmentJob>) {
    let config = test_config();
    let (enrichment, jobs) = EnrichmentQueue::channel(config.enrichment_queue_capacity);

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        sessions: SessionStore::new(pool, config.session.clone()),
        enrichment,
    };

    (build_app_router(state, &config), jobs)
}

/// Build the full application router. Enrichment jobs are discarded.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_jobs(pool).0
}

/// Worker whose advisor has no API key, so every job uses the fallbacks.
pub fn offline_worker(pool: PgPool) -> EnrichmentWorker {
    let advisor = Advisor::from_config(AdvisorConfig::disabled()).expect("advisor should build");
    EnrichmentWorker::new(pool, advisor)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::GET, uri, Some(cookie), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    cookie: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::POST, uri, Some(cookie), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    cookie: &str,
    body: serde_json::Value,
) -> Response {
    send(app, Method::PATCH, uri, Some(cookie), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::DELETE, uri, Some(cookie), None).await
}

pub async fn post_auth(app: Router, uri: &str, cookie: &str) -> Response {
    send(app, Method::POST, uri, Some(cookie), None).await
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// The `name=value` pair from a response's `Set-Cookie` header.
pub fn session_cookie(response: &Response) -> String {
    let header = response
        .headers()
        .get(SET_COOKIE)
        .expect("response should set a cookie")
        .to_str()
        .unwrap();
    header.split(';').next().unwrap().to_string()
}

/// Register `username` and return its session cookie.
pub async fn register(app: Router, username: &str) -> String {
    let body = serde_json::json!({ "username": username, "password": "secret-pass" });
    let response = post_json(app, "/api/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    session_cookie(&response)
}

/// Create a dream and return its JSON.
pub async fn create_dream(app: Router, cookie: &str, title: &str) -> serde_json::Value {
    let body = serde_json::json!({ "title": title });
    let response = post_json_auth(app, "/api/dreams", cookie, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Drain every queued enrichment job without running it.
pub fn drain(jobs: &mut mpsc::Receiver<EnrichmentJob>) -> Vec<EnrichmentJob> {
    let mut out = Vec::new();
    while let Ok(job) = jobs.try_recv() {
        out.push(job);
    }
    out
}
