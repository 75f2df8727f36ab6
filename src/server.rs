// ABOUTME: HTTP server assembly: route composition, middleware layering, and graceful shutdown
// ABOUTME: Health probes stay outside the origin checks; everything under /api passes through them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # HTTP Server
//!
//! Layers, outermost first: request id, tracing, timeout, body limit, the
//! CORS guard, the `CorsLayer`, and the authentication filter. The
//! `/api/v1` routes additionally get token renewal and the admin guard.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use http::StatusCode;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::middleware::{admin_guard, cors_guard, renew_token, require_auth, setup_cors};
use crate::resources::ServerResources;
use crate::routes::{
    AuthRoutes, CatalogRoutes, ExerciseRoutes, HealthRoutes, RecordRoutes, UserRoutes,
};

/// Build the complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    let config = &resources.config;

    let mut v1 = Router::new()
        .merge(UserRoutes::routes(resources.clone()))
        .merge(CatalogRoutes::routes(resources.clone()))
        .merge(ExerciseRoutes::routes(resources.clone()))
        .merge(RecordRoutes::routes(resources.clone()));
    if config.security_enabled {
        v1 = v1
            .layer(from_fn(admin_guard))
            .layer(from_fn_with_state(resources.clone(), renew_token));
    }

    let mut api = Router::new()
        .merge(AuthRoutes::routes(resources.clone()))
        .merge(v1);
    if config.security_enabled {
        api = api.layer(from_fn_with_state(resources.clone(), require_auth));
    } else {
        warn!("Authentication filter disabled; /api/v1 routes will reject callers without identity");
    }
    let api = api
        .layer(setup_cors(&config.cors))
        .layer(from_fn_with_state(resources.clone(), cors_guard));

    Router::new()
        .merge(HealthRoutes::routes(resources.clone()))
        .merge(api)
        .layer(RequestBodyLimitLayer::new(config.http.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.http.request_timeout_secs),
        ))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// Bind the configured address and serve until Ctrl-C
///
/// # Errors
///
/// Returns an error if the listener cannot be bound or the server fails
pub async fn run(resources: Arc<ServerResources>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", resources.config.host, resources.config.http_port)
        .parse()
        .context("Invalid HOST/HTTP_PORT combination")?;
    let app = build_router(resources);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("HTTP server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown"),
        Err(e) => warn!(error = %e, "Failed to listen for Ctrl+C"),
    }
}
