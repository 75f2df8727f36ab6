// ABOUTME: Integration tests for sign-up, sign-in, and logout
// ABOUTME: Covers validation messages, role unlocking, cookies, and logout redirects
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use axum::http::{header, Method, StatusCode};
use common::{
    create_test_app, create_test_resources_with, send, signin, signup, test_config,
    TEST_PASSWORD,
};
use serde_json::json;
use workout_diary_server::server::build_router;

#[tokio::test]
async fn test_signup_then_signin_sets_cookie_pair() {
    let (app, _) = create_test_app().await;

    let registered = signup(&app, "jack", &[]).await;
    assert_eq!(registered.status, StatusCode::OK);
    assert!(registered
        .message()
        .starts_with("User registered successfully! User ID: "));

    let response = signin(&app, "jack@example.com", TEST_PASSWORD).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["type"], "Bearer");
    assert_eq!(response.body["username"], "jack");
    assert_eq!(response.body["roles"], json!(["ROLE_USER"]));

    let cookies = response.set_cookies();
    let token = response.body["token"].as_str().unwrap();
    assert!(cookies
        .iter()
        .any(|c| c.starts_with(&format!("token={token};")) && c.contains("HttpOnly")));
    assert!(cookies.iter().any(|c| c.starts_with("username=jack;")));
    assert!(cookies.iter().all(|c| c.contains("Path=/")));
}

#[tokio::test]
async fn test_signin_rejects_bad_credentials() {
    let (app, _) = create_test_app().await;
    signup(&app, "jack", &[]).await;

    let wrong_password = signin(&app, "jack@example.com", "not-the-password").await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);

    let unknown = signin(&app, "nobody@example.com", TEST_PASSWORD).await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_duplicates_are_rejected() {
    let (app, _) = create_test_app().await;
    signup(&app, "jack", &[]).await;

    let same_name = signup(&app, "jack", &[]).await;
    assert_eq!(same_name.status, StatusCode::BAD_REQUEST);
    assert_eq!(same_name.error_message(), "[Error] Username is already taken!");

    let same_email = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "username": "jill",
            "email": "jack@example.com",
            "password": TEST_PASSWORD,
        })),
    )
    .await;
    assert_eq!(same_email.status, StatusCode::BAD_REQUEST);
    assert_eq!(same_email.error_message(), "[Error] Email is already in use!");
}

#[tokio::test]
async fn test_signup_validates_email_and_password() {
    let (app, _) = create_test_app().await;

    let bad_email = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "username": "jill", "email": "not-an-email", "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);

    let short_password = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "username": "jill", "email": "jill@example.com", "password": "abc" })),
    )
    .await;
    assert_eq!(short_password.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_requested_roles_need_the_secret_key() {
    let (app, _) = create_test_app().await;

    signup(&app, "boss", &["admin", "mod"]).await;
    let boss = signin(&app, "boss@example.com", TEST_PASSWORD).await;
    let roles = boss.body["roles"].as_array().unwrap();
    assert!(roles.contains(&json!("ROLE_ADMIN")));
    assert!(roles.contains(&json!("ROLE_MODERATOR")));

    let sneaky = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({
            "username": "sneaky",
            "email": "sneaky@example.com",
            "password": TEST_PASSWORD,
            "roles": ["admin"],
            "secretKey": "guess",
        })),
    )
    .await;
    assert_eq!(sneaky.status, StatusCode::OK);

    let signed_in = signin(&app, "sneaky@example.com", TEST_PASSWORD).await;
    assert_eq!(signed_in.body["roles"], json!(["ROLE_USER"]));
}

#[tokio::test]
async fn test_logout_expires_both_cookies() {
    let (app, _) = create_test_app().await;

    let response = send(&app, Method::POST, "/api/auth/logout", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.message(), "Logged out.");

    let cookies = response.set_cookies();
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
}

#[tokio::test]
async fn test_logout_redirects_when_configured() {
    let mut config = test_config();
    config.logout_redirect_url = Some("https://diary.example.com/login".into());
    let app = build_router(create_test_resources_with(config).await);

    let response = send(&app, Method::POST, "/api/auth/logout", None, None).await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers.get(header::LOCATION).unwrap(),
        "https://diary.example.com/login"
    );
}
