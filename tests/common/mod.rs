use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use carebook::router::init_router;
use carebook::state::AppState;
use carebook_auth::NewAccount;
use carebook_config::{CorsConfig, JwtConfig, PasswordConfig};
use carebook_db::MemoryCredentialStore;
use carebook_models::{CredentialRecord, UserRole};
use http_body_util::BodyExt;
use serde_json::Value;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-that-is-at-least-32-bytes";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "Admin123!";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub admin: CredentialRecord,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig::new(TEST_SECRET)
}

pub fn test_password_config() -> PasswordConfig {
    PasswordConfig {
        bcrypt_cost: 4,
        ..PasswordConfig::default()
    }
}

/// Builds the full router over an in-memory store seeded with one admin.
pub async fn setup_test_app() -> TestApp {
    let state = AppState::new(
        Arc::new(MemoryCredentialStore::new()),
        &test_jwt_config(),
        test_password_config(),
        CorsConfig::default(),
    )
    .unwrap();

    let admin = state
        .credentials()
        .register(NewAccount::new(ADMIN_EMAIL, ADMIN_PASSWORD, UserRole::Admin).verified(true))
        .await
        .unwrap();

    TestApp {
        router: init_router(state.clone()),
        state,
        admin,
    }
}

#[allow(dead_code)]
pub async fn create_test_account(
    app: &TestApp,
    email: &str,
    password: &str,
    role: UserRole,
) -> CredentialRecord {
    app.state
        .credentials()
        .register(NewAccount::new(email, password, role))
        .await
        .unwrap()
}

pub fn generate_unique_email() -> String {
    format!("test-{}@example.com", Uuid::new_v4())
}

pub fn json_request(method: &str, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

#[allow(dead_code)]
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }

    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

/// Logs in through the router and returns the full response body.
pub async fn login(app: &TestApp, email: &str, password: &str) -> Value {
    use tower::ServiceExt;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            &serde_json::json!({ "email": email, "password": password }),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await
}

#[allow(dead_code)]
pub async fn access_token(app: &TestApp, email: &str, password: &str) -> String {
    login(app, email, password).await["access_token"]
        .as_str()
        .unwrap()
        .to_string()
}
