#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;
use tower::ServiceExt;
use uptemplate_api::auth::jwt::{Claims, JwtConfig};
use uptemplate_api::config::ServerConfig;
use uptemplate_api::router::build_app_router;
use uptemplate_api::state::AppState;
use uptemplate_core::blob::LocalBlobStore;

pub const TEST_JWT_SECRET: &str = "test-secret";

/// User id carried by [`token`]-minted requests unless a test picks another.
pub const USER: i64 = 1;

/// Upload cap used by the test configuration.
pub const MAX_UPLOAD_BYTES: usize = 1024;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(media_root: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        media_root,
        media_base_url: "/media".to_string(),
        max_upload_bytes: MAX_UPLOAD_BYTES,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
    }
}

/// A fresh app over `pool` whose blob store writes into `media_root`.
pub fn build_app_with_media_root(pool: PgPool, media_root: PathBuf) -> Router {
    let config = test_config(media_root.clone());
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        blob_store: Arc::new(LocalBlobStore::new(media_root, &config.media_base_url)),
    };
    build_app_router(state, &config)
}

/// Build the full application router with all middleware layers, using the
/// given database pool and a throwaway media directory.
pub fn build_test_app(pool: PgPool) -> Router {
    #[allow(deprecated)]
    let media_root = tempfile::tempdir().unwrap().into_path();
    build_app_with_media_root(pool, media_root)
}

/// Mint an HS256 bearer token for `user_id`.
pub fn token(user_id: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: now + 3600,
        iat: now,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.unwrap()
}

fn authorized(method: Method, uri: &str, user_id: i64) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {}", token(user_id)))
}

pub async fn get(app: Router, uri: &str) -> Response {
    get_as(app, uri, USER).await
}

pub async fn get_as(app: Router, uri: &str, user_id: i64) -> Response {
    let request = authorized(Method::GET, uri, user_id)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = authorized(Method::DELETE, uri, USER)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: serde_json::Value,
    user_id: i64,
) -> Response {
    let request = authorized(method, uri, user_id)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::POST, uri, body, USER).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PUT, uri, body, USER).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    json_request(app, Method::PATCH, uri, body, USER).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a template owned by [`USER`] and return its id.
pub async fn create_template(pool: &PgPool, name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/templates",
        serde_json::json!({ "name": name }),
    )
    .await;
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a template and one layout in it; returns `(template_id, layout_id)`.
pub async fn create_layout(pool: &PgPool) -> (i64, i64) {
    let template_id = create_template(pool, "Canvas").await;
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/templates/{template_id}/layouts"),
        serde_json::json!({}),
    )
    .await;
    let layout_id = body_json(response).await["data"]["id"].as_i64().unwrap();
    (template_id, layout_id)
}
