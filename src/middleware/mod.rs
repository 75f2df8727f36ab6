// ABOUTME: HTTP middleware for origin checks, JWT authentication, token renewal, and admin gating
// ABOUTME: Layers are composed in server.rs; handlers read the caller through the AuthUser extractor
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Admin-only operations and the own-account rule
pub mod admin_guard;
/// Double-submit JWT authentication
pub mod auth;
/// Origin allow-list and referer enforcement
pub mod cors;
/// Sliding token renewal
pub mod token_renewal;

// Authorization
pub use admin_guard::admin_guard;

// Authentication
pub use auth::{require_auth, AuthUser};

// CORS configuration
pub use cors::{cors_guard, setup_cors};

// Token renewal
pub use token_renewal::renew_token;
