// ABOUTME: Sliding session renewal for API calls
// ABOUTME: Reissues the token cookie when the current one is within the renewal window
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::HeaderValue;
use tracing::debug;
use workout_diary_core::constants::cookies;
use workout_diary_core::errors::{AppError, AppResult};

use crate::resources::ServerResources;
use crate::security::cookies::{append_set_cookie, get_cookie_value, set_cookie_header, CookieOptions};

/// Message returned when a token close to expiry cannot be reissued
pub const RENEWAL_FAILED_MESSAGE: &str = "Unauthorized: Error in token renewal.";

fn renewal_cookie(resources: &ServerResources, token: &str) -> AppResult<Option<HeaderValue>> {
    let Ok(claims) = resources.auth_manager.validate_token(token) else {
        return Ok(None);
    };
    if !resources.auth_manager.is_close_to_expiry(&claims) {
        return Ok(None);
    }

    let cookie = renewed_token_cookie(
        resources.auth_manager.renew_token(&claims),
        resources.auth_manager.expiry_seconds(),
    )?;
    debug!(user = %claims.username, "Renewed token close to expiry");
    Ok(Some(cookie))
}

fn renewed_token_cookie(fresh: AppResult<String>, max_age_secs: i64) -> AppResult<HeaderValue> {
    let renewal_error = |_: AppError| AppError::auth_invalid(RENEWAL_FAILED_MESSAGE);
    let fresh = fresh.map_err(renewal_error)?;
    set_cookie_header(cookies::TOKEN, &fresh, &CookieOptions::renewal(max_age_secs))
        .map_err(renewal_error)
}

/// Attach a renewed `token` cookie to the response when needed
pub async fn renew_token(
    State(resources): State<Arc<ServerResources>>,
    request: Request,
    next: Next,
) -> Response {
    let renewed = match get_cookie_value(request.headers(), cookies::TOKEN) {
        Some(token) => match renewal_cookie(&resources, &token) {
            Ok(cookie) => cookie,
            Err(error) => return error.into_response(),
        },
        None => None,
    };

    let mut response = next.run(request).await;
    if let Some(cookie) = renewed {
        append_set_cookie(response.headers_mut(), cookie);
    }
    response
}
