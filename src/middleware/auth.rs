// ABOUTME: JWT double-submit authentication filter and the AuthUser extractor
// ABOUTME: Requires matching Bearer header and token cookie, then loads the user into request extensions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Authentication Filter
//!
//! Every request outside the sign-in, sign-up, logout, and health routes must
//! carry the JWT twice: as `Authorization: Bearer <jwt>` and as the `token`
//! cookie. The header token must be valid; the cookie token must be signed by
//! us and name the same email. The resolved caller is stored as an
//! [`AuthUser`] extension for handlers and later middleware.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::{Authorization, HeaderMapExt};
use http::request::Parts;
use http::HeaderMap;
use tracing::debug;
use workout_diary_core::constants::{cookies, paths};
use workout_diary_core::errors::{AppError, AppResult, ErrorCode};
use workout_diary_core::models::RoleName;

use crate::logging::AppLogger;
use crate::resources::ServerResources;
use crate::security::cookies::{get_cookie_value, has_cookies};

/// The authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// User document id
    pub id: String,
    /// Username
    pub username: String,
    /// Email (JWT subject)
    pub email: String,
    /// Granted roles
    pub roles: Vec<RoleName>,
}

impl AuthUser {
    /// Whether the caller holds `ROLE_ADMIN`
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.roles.contains(&RoleName::Admin)
    }

    /// Require at least one of `roles`
    ///
    /// # Errors
    ///
    /// Returns `PERMISSION_DENIED` if the caller holds none of them
    pub fn require_any_role(&self, roles: &[RoleName]) -> AppResult<()> {
        if roles.iter().any(|role| self.roles.contains(role)) {
            return Ok(());
        }
        let required: Vec<&str> = roles.iter().map(RoleName::as_str).collect();
        Err(AppError::permission_denied(format!(
            "Access denied: requires one of [{}]",
            required.join(", ")
        )))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or_else(AppError::auth_required)
    }
}

/// Routes reachable without credentials
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    matches!(
        path,
        paths::SIGNIN | paths::SIGNUP | paths::LOGOUT | paths::HEALTH | paths::READY
    )
}

fn unauthorized(message: &str) -> AppError {
    AppError::new(ErrorCode::AuthRequired, message)
}

/// Resolve the caller from the header token and the `token` cookie
///
/// # Errors
///
/// Returns a 401 error describing the first check that failed
pub async fn authenticate(resources: &ServerResources, headers: &HeaderMap) -> AppResult<AuthUser> {
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| unauthorized("JSON Web Token is not found."))?;

    let claims = resources
        .auth_manager
        .validate_token(bearer.token())
        .map_err(AppError::from)?;

    if !has_cookies(headers) {
        return Err(unauthorized("Cookies are null."));
    }
    let cookie_token = get_cookie_value(headers, cookies::TOKEN)
        .ok_or_else(|| unauthorized("Missing 'token' in cookies."))?;

    let cookie_email = resources
        .auth_manager
        .decipher_email(&cookie_token)
        .map_err(|_| unauthorized("Mismatched JWT"))?;
    if cookie_email != claims.sub {
        return Err(unauthorized("Mismatched JWT"));
    }

    let user = resources
        .database
        .find_user_by_email(&claims.sub)
        .await?
        .ok_or_else(|| AppError::auth_invalid("User for this token no longer exists"))?;

    Ok(AuthUser {
        id: user.meta.id.clone(),
        roles: user.role_names(),
        username: user.name,
        email: user.email,
    })
}

/// Authentication entry filter
pub async fn require_auth(
    State(resources): State<Arc<ServerResources>>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    match authenticate(&resources, request.headers()).await {
        Ok(user) => {
            debug!(user = %user.username, path = %request.uri().path(), "Authenticated request");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(error) => {
            AppLogger::log_security_event(
                "authentication_failed",
                &format!("{} {}: {}", request.method(), request.uri().path(), error.message),
                None,
            );
            error.into_response()
        }
    }
}
