// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides in-memory resources, a router, and sign-up/sign-in session helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `workout_diary_server`
//!
//! Every test gets its own `sqlite::memory:` database, so tests can run in
//! parallel without sharing state.

use std::sync::{Arc, Once};

use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use workout_diary_server::config::ServerConfig;
use workout_diary_server::database::Database;
use workout_diary_server::resources::ServerResources;
use workout_diary_server::server::build_router;

static INIT_LOGGER: Once = Once::new();

/// Origin the test configuration allows
pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// Secret that unlocks requested roles at sign-up
pub const TEST_SIGNUP_SECRET: &str = "test-signup-secret";

/// Password used for every test account
pub const TEST_PASSWORD: &str = "password123";

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Configuration with cheap hashing, no referer enforcement, and plain cookies
pub fn test_config() -> ServerConfig {
    let mut config = ServerConfig::default();
    config.database.url = "sqlite::memory:".into();
    config.auth.jwt_secret = "integration-test-jwt-secret-0123456789".into();
    config.auth.bcrypt_cost = 4;
    config.auth.signup_role_secret = Some(TEST_SIGNUP_SECRET.into());
    config.cors.allowed_origins = vec![TEST_ORIGIN.into()];
    config.cors.enforce_referer = false;
    config.cookies.secure = false;
    config
}

/// Resources over a fresh in-memory database
pub async fn create_test_resources_with(config: ServerConfig) -> Arc<ServerResources> {
    init_test_logging();
    let database = Database::new(&config.database.url).await.unwrap();
    Arc::new(ServerResources::new(database, config).unwrap())
}

/// Resources with [`test_config`]
pub async fn create_test_resources() -> Arc<ServerResources> {
    create_test_resources_with(test_config()).await
}

/// Full application router with [`test_config`]
pub async fn create_test_app() -> (Router, Arc<ServerResources>) {
    let resources = create_test_resources().await;
    (build_router(resources.clone()), resources)
}

/// Parsed response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `message` of a success envelope
    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or_default()
    }

    /// `error.message` of an error envelope
    pub fn error_message(&self) -> &str {
        self.body["error"]["message"].as_str().unwrap_or_default()
    }

    /// Every `Set-Cookie` header value
    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_owned())
            .collect()
    }
}

/// Credentials of a signed-in account
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub username: String,
}

impl Session {
    /// Apply the bearer header and the matching cookies
    pub fn apply(&self, builder: axum::http::request::Builder) -> axum::http::request::Builder {
        builder
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .header(
                header::COOKIE,
                format!("token={}; username={}", self.token, self.username),
            )
    }
}

/// Send a request through the router
pub async fn send_request(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    TestResponse {
        status,
        headers,
        body,
    }
}

/// Send a request, optionally signed in and with a JSON body
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    session: Option<&Session>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(session) = session {
        builder = session.apply(builder);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(app, request).await
}

/// Register an account; `roles` only apply together with the secret key
pub async fn signup(app: &Router, username: &str, roles: &[&str]) -> TestResponse {
    send(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": TEST_PASSWORD,
            "birthday": "01/15/1990",
            "roles": roles,
            "secretKey": TEST_SIGNUP_SECRET,
        })),
    )
    .await
}

/// Sign in by email
pub async fn signin(app: &Router, email: &str, password: &str) -> TestResponse {
    send(
        app,
        Method::POST,
        "/api/auth/signin",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await
}

/// Register and sign in, returning the session
pub async fn create_session(app: &Router, username: &str, roles: &[&str]) -> Session {
    let registered = signup(app, username, roles).await;
    assert_eq!(registered.status, StatusCode::OK, "{}", registered.body);

    let signed_in = signin(app, &format!("{username}@example.com"), TEST_PASSWORD).await;
    assert_eq!(signed_in.status, StatusCode::OK, "{}", signed_in.body);
    Session {
        token: signed_in.body["token"].as_str().unwrap().to_owned(),
        username: username.to_owned(),
    }
}

/// Session for a regular `ROLE_USER` account
pub async fn user_session(app: &Router, username: &str) -> Session {
    create_session(app, username, &[]).await
}

/// Session for a `ROLE_MODERATOR` account
pub async fn moderator_session(app: &Router, username: &str) -> Session {
    create_session(app, username, &["mod"]).await
}

/// Session for a `ROLE_ADMIN` account
pub async fn admin_session(app: &Router, username: &str) -> Session {
    create_session(app, username, &["admin"]).await
}
