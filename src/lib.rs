// ABOUTME: Main library entry point for the workout diary REST backend
// ABOUTME: Exposes configuration, storage, middleware, and routes to the binary and tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Workout Diary Server
//!
//! A REST backend for a workout diary: user accounts with roles, a catalog of
//! exercises with their muscle groups, types, and difficulties, and per-user
//! exercise and physique records grouped into 30-minute slots.
//!
//! ## Architecture
//!
//! - **Documents**: every entity is a JSON document in its own SQLite table
//! - **Routes**: each collection gets generic controllers plus its own endpoints
//! - **Middleware**: origin checks, double-submit JWT authentication, token
//!   renewal, and admin gating
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use workout_diary_server::config::ServerConfig;
//! use workout_diary_server::database::Database;
//! use workout_diary_server::resources::ServerResources;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     let database = Database::new(&config.database.url).await?;
//!     let resources = Arc::new(ServerResources::new(database, config)?);
//!     workout_diary_server::server::run(resources).await
//! }
//! ```

/// JWT issuing, validation, renewal, and password hashing
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// SQLite document store
pub mod database;

/// Structured logging setup
pub mod logging;

/// HTTP middleware
pub mod middleware;

/// Shared server resources
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Exercise catalog filtering
pub mod search;

/// Cookie handling
pub mod security;

/// Router assembly and serving
pub mod server;

pub use workout_diary_core::errors::{AppError, AppResult, ErrorCode};
