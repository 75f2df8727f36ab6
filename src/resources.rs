// ABOUTME: Shared server resources handed to every route and middleware
// ABOUTME: Holds the database, JWT manager, configuration, and compiled referer pattern
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use regex::Regex;
use workout_diary_core::errors::{AppError, AppResult};

use crate::auth::AuthManager;
use crate::config::ServerConfig;
use crate::database::Database;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    /// Document store
    pub database: Arc<Database>,
    /// Token issuing and validation
    pub auth_manager: Arc<AuthManager>,
    /// Loaded configuration
    pub config: Arc<ServerConfig>,
    /// Pattern a `Referer` must match on origin-less requests
    pub referer_pattern: Arc<Regex>,
}

impl ServerResources {
    /// Wire resources together from an open database and a configuration
    ///
    /// # Errors
    ///
    /// Returns `CONFIG_ERROR` if the referer pattern is not a valid regex
    pub fn new(database: Database, config: ServerConfig) -> AppResult<Self> {
        let referer_pattern = Regex::new(&config.cors.allowed_referer).map_err(|e| {
            AppError::config(format!(
                "Invalid CORS_ALLOWED_REFERER '{}': {e}",
                config.cors.allowed_referer
            ))
        })?;

        let auth_manager = AuthManager::new(
            config.auth.jwt_secret.as_bytes().to_vec(),
            config.auth.jwt_expiry_minutes,
            config.auth.renewal_window_minutes,
        );

        Ok(Self {
            database: Arc::new(database),
            auth_manager: Arc::new(auth_manager),
            config: Arc::new(config),
            referer_pattern: Arc::new(referer_pattern),
        })
    }
}
