// ABOUTME: Configuration management module for server settings
// ABOUTME: Loads environment-driven settings for HTTP, auth, cookies, CORS, and storage
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the workout diary server
//!
//! All settings come from environment variables with development-friendly
//! defaults. See [`environment::ServerConfig::from_env`].

/// Environment and server configuration
pub mod environment;

pub use environment::{
    AuthConfig, CookieConfig, CorsConfig, DatabaseConfig, Environment, HttpConfig, ServerConfig,
};
