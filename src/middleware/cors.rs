// ABOUTME: Origin and referer guard plus the tower-http CORS layer for browser clients
// ABOUTME: Answers preflights, blocks origin-less requests with a foreign Referer, decorates allowed origins
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # CORS
//!
//! Two layers cooperate. [`cors_guard`] runs first: it answers `OPTIONS`
//! preflights itself (200 for allowed origins, 403 otherwise) and, when a
//! request carries no `Origin`, requires the `Referer` to match the
//! configured pattern. [`setup_cors`] builds the `CorsLayer` that adds the
//! `Access-Control-*` headers to responses for allowed origins.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS, ACCESS_CONTROL_MAX_AGE,
    AUTHORIZATION, CONTENT_TYPE, ORIGIN, REFERER, SET_COOKIE, VARY,
};
use http::{HeaderValue, Method, StatusCode};
use tower_http::cors::{AllowOrigin, CorsLayer};
use workout_diary_core::constants::cors::{
    ALLOWED_HEADERS, ALLOWED_METHODS, EXPOSED_HEADERS, MAX_AGE_SECS,
};
use workout_diary_core::errors::AppError;

use crate::config::CorsConfig;
use crate::logging::AppLogger;
use crate::resources::ServerResources;

/// Message returned when an origin-less request carries a foreign `Referer`
pub const BLOCKED_REFERER_MESSAGE: &str = "Request blocked due to unauthorized Referer.";

fn is_allowed_origin(config: &CorsConfig, origin: &str) -> bool {
    config.allowed_origins.iter().any(|allowed| allowed == origin)
}

fn preflight_response(origin: &HeaderValue) -> Response {
    let mut response = StatusCode::OK.into_response();
    let headers = response.headers_mut();
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static(EXPOSED_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(MAX_AGE_SECS));
    headers.insert(VARY, HeaderValue::from_static("Origin"));
    response
}

/// Outermost request filter for browser traffic
pub async fn cors_guard(
    State(resources): State<Arc<ServerResources>>,
    request: Request,
    next: Next,
) -> Response {
    let cors = &resources.config.cors;
    let origin = request.headers().get(ORIGIN).cloned();

    if request.method() == Method::OPTIONS {
        return match origin {
            Some(origin)
                if origin
                    .to_str()
                    .is_ok_and(|value| is_allowed_origin(cors, value)) =>
            {
                preflight_response(&origin)
            }
            _ => AppError::permission_denied("CORS preflight from a disallowed origin")
                .into_response(),
        };
    }

    if origin.is_none() && cors.enforce_referer {
        let referer = request
            .headers()
            .get(REFERER)
            .and_then(|value| value.to_str().ok());
        let allowed = referer.is_some_and(|value| resources.referer_pattern.is_match(value));
        if !allowed {
            AppLogger::log_security_event(
                "referer_blocked",
                &format!(
                    "{} {} referer={}",
                    request.method(),
                    request.uri().path(),
                    referer.unwrap_or("<none>")
                ),
                None,
            );
            return AppError::auth_invalid(BLOCKED_REFERER_MESSAGE).into_response();
        }
    }

    next.run(request).await
}

/// Configure the CORS layer for the configured origin list
///
/// Credentials are allowed, so origins are always listed explicitly; an empty
/// list means no cross-origin access.
pub fn setup_cors(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin.trim()).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::POST,
            Method::GET,
            Method::OPTIONS,
            Method::PUT,
            Method::DELETE,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .expose_headers([AUTHORIZATION, SET_COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(MAX_AGE_SECS))
}
