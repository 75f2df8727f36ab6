// ABOUTME: Sign-in, sign-up, and logout routes under /api/auth
// ABOUTME: Sign-in issues the JWT both in the body and as the token/username cookie pair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Authentication routes
//!
//! These are the only `/api` routes reachable without a token. A successful
//! sign-in returns a [`JwtResponse`] and sets the `token` and `username`
//! cookies the auth filter later compares against the `Authorization` header.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, info};
use workout_diary_core::constants::{cookies, paths};
use workout_diary_core::document::{Document, NamedDocument};
use workout_diary_core::errors::{AppError, AppResult};
use workout_diary_core::models::{NameRef, Role, RoleName, User};
use workout_diary_core::responses::{JwtResponse, SimpleResponse};
use workout_diary_core::time::parse_birthday;

use crate::auth::{hash_password, is_valid_email, is_valid_password, verify_password};
use crate::database::Database;
use crate::logging::AppLogger;
use crate::resources::ServerResources;
use crate::security::cookies::{
    append_set_cookie, clear_cookie_header, set_cookie_header, CookieOptions,
};

/// Sign-in request
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    /// Account email
    pub email: String,
    /// Plain password
    pub password: String,
}

/// Sign-up request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Unique username
    pub username: String,
    /// Unique email
    pub email: String,
    /// Plain password
    pub password: String,
    /// `MM/dd/yyyy`
    #[serde(default)]
    pub birthday: Option<String>,
    /// Avatar URL
    #[serde(default, rename = "profilePicURL")]
    pub profile_pic_url: Option<String>,
    /// Free-form gender
    #[serde(default)]
    pub gender: Option<String>,
    /// Requested roles, honoured only with the right secret key
    #[serde(default)]
    pub roles: Vec<String>,
    /// Must equal `SIGNUP_ROLE_SECRET` to unlock `roles`
    #[serde(default)]
    pub secret_key: Option<String>,
}

async fn role_ref(database: &Database, role: RoleName) -> AppResult<NameRef> {
    database
        .find_by_name::<Role>(role.as_str())
        .await?
        .map(|found| NameRef::to(&found))
        .ok_or_else(|| AppError::internal(format!("[Error] {} is not found.", role.as_str())))
}

/// Roles granted at sign-up
async fn signup_roles(
    resources: &ServerResources,
    requested: &[String],
    secret_key: Option<&str>,
) -> AppResult<Vec<NameRef>> {
    let unlocked = match (&resources.config.auth.signup_role_secret, secret_key) {
        (Some(expected), Some(given)) => !expected.is_empty() && expected == given.trim(),
        _ => false,
    };

    let mut wanted: Vec<RoleName> = Vec::new();
    if unlocked {
        for name in requested {
            let role = RoleName::parse(name).unwrap_or(RoleName::User);
            if !wanted.contains(&role) {
                wanted.push(role);
            }
        }
    }
    if wanted.is_empty() {
        wanted.push(RoleName::User);
    }

    let mut roles = Vec::with_capacity(wanted.len());
    for role in wanted {
        roles.push(role_ref(&resources.database, role).await?);
    }
    Ok(roles)
}

/// Authentication routes handler
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(paths::SIGNIN, post(Self::handle_signin))
            .route(paths::SIGNUP, post(Self::handle_signup))
            .route(paths::LOGOUT, post(Self::handle_logout))
            .with_state(resources)
    }

    /// Handle user sign-in
    async fn handle_signin(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<SigninRequest>,
    ) -> AppResult<Response> {
        let email = request.email.trim();
        let Some(user) = resources.database.find_user_by_email(email).await? else {
            AppLogger::log_auth_event(email, "signin", false, Some("unknown email"));
            return Err(AppError::auth_invalid("Bad credentials"));
        };
        if !verify_password(request.password, user.password.clone()).await? {
            AppLogger::log_auth_event(email, "signin", false, Some("wrong password"));
            return Err(AppError::auth_invalid("Bad credentials"));
        }

        let token = resources.auth_manager.generate_token(&user)?;
        let options = CookieOptions::session(&resources.config.cookies);
        let mut headers = HeaderMap::new();
        append_set_cookie(
            &mut headers,
            set_cookie_header(cookies::TOKEN, &token, &options)?,
        );
        append_set_cookie(
            &mut headers,
            set_cookie_header(cookies::USERNAME, &user.name, &options)?,
        );

        AppLogger::log_auth_event(&user.name, "signin", true, None);
        let body = JwtResponse {
            token,
            token_type: "Bearer".to_owned(),
            id: user.id().to_owned(),
            username: user.name.clone(),
            email: user.email.clone(),
            roles: user
                .role_names()
                .iter()
                .map(|role| role.as_str().to_owned())
                .collect(),
        };
        Ok((headers, Json(body)).into_response())
    }

    /// Handle user registration
    async fn handle_signup(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<SignupRequest>,
    ) -> AppResult<Json<SimpleResponse>> {
        let database = &resources.database;
        let username = User::normalize_name(&request.username);
        let email = request.email.trim().to_owned();

        if username.is_empty() {
            return Err(AppError::missing_field("username"));
        }
        if database.exists_by_name::<User>(&username).await? {
            return Err(AppError::invalid_input("[Error] Username is already taken!"));
        }
        if database.exists_user_by_email(&email).await? {
            return Err(AppError::invalid_input("[Error] Email is already in use!"));
        }
        if !is_valid_email(&email) {
            return Err(AppError::invalid_input(format!("[Error] Invalid email: {email}")));
        }
        if !is_valid_password(&request.password) {
            return Err(AppError::invalid_input(
                "[Error] Password must be at least 6 characters.",
            ));
        }

        let birthday = request
            .birthday
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(parse_birthday)
            .transpose()?;
        let roles = signup_roles(&resources, &request.roles, request.secret_key.as_deref()).await?;
        let password_hash =
            hash_password(request.password, resources.config.auth.bcrypt_cost).await?;

        let mut user = User::new(username, email, password_hash);
        user.birthday = birthday;
        user.profile_pic_url = request.profile_pic_url;
        user.gender = request.gender;
        user.roles = roles;
        database.insert(&user).await?;

        info!(user = %user.name, roles = ?user.role_names(), "Registered user");
        Ok(Json(SimpleResponse::new(format!(
            "User registered successfully! User ID: {}",
            user.id()
        ))))
    }

    /// Handle logout by expiring both cookies
    async fn handle_logout(State(resources): State<Arc<ServerResources>>) -> AppResult<Response> {
        let options = CookieOptions::session(&resources.config.cookies);
        let mut headers = HeaderMap::new();
        append_set_cookie(&mut headers, clear_cookie_header(cookies::TOKEN, &options)?);
        append_set_cookie(&mut headers, clear_cookie_header(cookies::USERNAME, &options)?);

        match resources.config.logout_redirect_url.as_deref() {
            Some(url) if !url.is_empty() => Ok((headers, Redirect::to(url)).into_response()),
            Some(_) | None => {
                debug!("No logout redirect configured");
                Ok((headers, Json(SimpleResponse::new("Logged out."))).into_response())
            }
        }
    }
}
