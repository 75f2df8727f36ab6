// ABOUTME: Application-wide constants organized by domain
// ABOUTME: Cookie names, route paths, service names, and listing limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Service identifiers for logging
pub mod service_names {
    /// Main API server
    pub const WORKOUT_DIARY_SERVER: &str = "workout-diary-server";
}

/// Cookies set at sign-in
pub mod cookies {
    /// JWT copy used for the double-submit check
    pub const TOKEN: &str = "token";
    /// Username of the signed-in user
    pub const USERNAME: &str = "username";
}

/// Route prefixes and unauthenticated paths
pub mod paths {
    /// Versioned resource API
    pub const API_V1: &str = "/api/v1";
    /// Authentication API
    pub const AUTH: &str = "/api/auth";
    /// Sign-in
    pub const SIGNIN: &str = "/api/auth/signin";
    /// Sign-up
    pub const SIGNUP: &str = "/api/auth/signup";
    /// Logout
    pub const LOGOUT: &str = "/api/auth/logout";
    /// Liveness probe
    pub const HEALTH: &str = "/health";
    /// Readiness probe
    pub const READY: &str = "/ready";
}

/// Listing limits
pub mod limits {
    /// Search page size when none is given
    pub const DEFAULT_PAGE_SIZE: usize = 5;
    /// Largest accepted page size
    pub const MAX_PAGE_SIZE: usize = 100;
    /// Records returned by default per user listing
    pub const DEFAULT_RECORD_LIMIT: usize = 10;
}

/// CORS defaults
pub mod cors {
    /// Methods advertised to allowed origins
    pub const ALLOWED_METHODS: &str = "POST, GET, OPTIONS, PUT, DELETE";
    /// Request headers advertised to allowed origins
    pub const ALLOWED_HEADERS: &str = "Authorization, Content-Type";
    /// Response headers exposed to allowed origins
    pub const EXPOSED_HEADERS: &str = "Authorization, Set-Cookie";
    /// Preflight cache lifetime in seconds
    pub const MAX_AGE_SECS: u64 = 3600;
    /// Referer accepted on requests without an Origin header
    pub const DEFAULT_REFERER_PATTERN: &str = r"^https?://workoutdiary\.jacktogon\.com(/.*)?$";
}
