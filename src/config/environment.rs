// ABOUTME: Environment-based configuration loading for the workout diary server
// ABOUTME: Parses ports, database URL, JWT, cookie, CORS, and security settings with defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::env;

use anyhow::{bail, Context, Result};
use regex::Regex;
use tracing::{info, warn};
use uuid::Uuid;
use workout_diary_core::constants::cors::DEFAULT_REFERER_PATTERN;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Live deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Lower-case name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Testing => "testing",
        }
    }
}

/// Storage settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL
    pub url: String,
}

/// Token and password settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Token lifetime
    pub jwt_expiry_minutes: i64,
    /// Remaining lifetime at which the token cookie is renewed
    pub renewal_window_minutes: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Secret that lets sign-up requests choose their roles
    pub signup_role_secret: Option<String>,
}

/// Allowed browser origins
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Exact origins granted CORS headers
    pub allowed_origins: Vec<String>,
    /// Referer pattern accepted on requests without an Origin
    pub allowed_referer: String,
    /// Reject origin-less requests whose referer does not match
    pub enforce_referer: bool,
}

/// Attributes of the cookies set at sign-in
#[derive(Debug, Clone)]
pub struct CookieConfig {
    /// `Domain` attribute
    pub domain: Option<String>,
    /// Adds `Secure` and `SameSite=None`
    pub secure: bool,
    /// `Max-Age` of sign-in cookies
    pub max_age_secs: i64,
}

/// HTTP transport limits
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-request timeout
    pub request_timeout_secs: u64,
    /// Largest accepted request body
    pub max_body_bytes: usize,
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Listen port
    pub http_port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// Storage
    pub database: DatabaseConfig,
    /// Tokens and passwords
    pub auth: AuthConfig,
    /// Origin and referer rules
    pub cors: CorsConfig,
    /// Cookie attributes
    pub cookies: CookieConfig,
    /// HTTP limits
    pub http: HttpConfig,
    /// When false the authentication filter is not installed
    pub security_enabled: bool,
    /// Where logout redirects to, if anywhere
    pub logout_redirect_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            http_port: 8080,
            environment: Environment::Development,
            database: DatabaseConfig {
                url: "sqlite:./data/workout_diary.db".into(),
            },
            auth: AuthConfig {
                jwt_secret: generate_jwt_secret(),
                jwt_expiry_minutes: 60,
                renewal_window_minutes: 10,
                bcrypt_cost: bcrypt::DEFAULT_COST,
                signup_role_secret: None,
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
                allowed_referer: DEFAULT_REFERER_PATTERN.into(),
                enforce_referer: true,
            },
            cookies: CookieConfig {
                domain: None,
                secure: true,
                max_age_secs: 3600,
            },
            http: HttpConfig {
                request_timeout_secs: 30,
                max_body_bytes: 1024 * 1024,
            },
            security_enabled: true,
            logout_redirect_url: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be parsed, `JWT_SECRET` is missing
    /// in production, or validation fails
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let environment = Environment::from_str_or_default(&env_var_or("ENVIRONMENT", "development"));

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment.is_production() => {
                bail!("JWT_SECRET must be set in production");
            }
            _ => {
                warn!("JWT_SECRET not set, generated an ephemeral secret for this process");
                generate_jwt_secret()
            }
        };

        let config = Self {
            host: env_var_or("HOST", "0.0.0.0"),
            http_port: env_var_or("HTTP_PORT", "8080")
                .parse()
                .context("Invalid HTTP_PORT value")?,
            environment,
            database: DatabaseConfig {
                url: env_var_or("DATABASE_URL", "sqlite:./data/workout_diary.db"),
            },
            auth: AuthConfig {
                jwt_secret,
                jwt_expiry_minutes: env_var_or("JWT_EXPIRY_MINUTES", "60")
                    .parse()
                    .context("Invalid JWT_EXPIRY_MINUTES value")?,
                renewal_window_minutes: env_var_or("JWT_RENEWAL_WINDOW_MINUTES", "10")
                    .parse()
                    .context("Invalid JWT_RENEWAL_WINDOW_MINUTES value")?,
                bcrypt_cost: env_var_or("BCRYPT_COST", &bcrypt::DEFAULT_COST.to_string())
                    .parse()
                    .context("Invalid BCRYPT_COST value")?,
                signup_role_secret: env::var("SIGNUP_ROLE_SECRET")
                    .ok()
                    .map(|s| s.trim().to_owned())
                    .filter(|s| !s.is_empty()),
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&env_var_or("CORS_ALLOWED_ORIGINS", "")),
                allowed_referer: env_var_or("CORS_ALLOWED_REFERER", DEFAULT_REFERER_PATTERN),
                enforce_referer: parse_bool("CORS_ENFORCE_REFERER", true)?,
            },
            cookies: CookieConfig {
                domain: env::var("COOKIE_DOMAIN").ok().filter(|s| !s.trim().is_empty()),
                secure: parse_bool("COOKIE_SECURE", true)?,
                max_age_secs: env_var_or("COOKIE_MAX_AGE_SECS", "3600")
                    .parse()
                    .context("Invalid COOKIE_MAX_AGE_SECS value")?,
            },
            http: HttpConfig {
                request_timeout_secs: env_var_or("REQUEST_TIMEOUT_SECS", "30")
                    .parse()
                    .context("Invalid REQUEST_TIMEOUT_SECS value")?,
                max_body_bytes: env_var_or("MAX_BODY_BYTES", "1048576")
                    .parse()
                    .context("Invalid MAX_BODY_BYTES value")?,
            },
            security_enabled: parse_bool("SECURITY_ENABLED", true)?,
            logout_redirect_url: env::var("LOGOUT_REDIRECT_URL")
                .ok()
                .filter(|s| !s.trim().is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if self.auth.jwt_secret.len() < 16 {
            bail!("JWT_SECRET must be at least 16 characters");
        }
        if self.auth.jwt_expiry_minutes <= 0 {
            bail!("JWT_EXPIRY_MINUTES must be positive");
        }
        if self.auth.renewal_window_minutes < 0
            || self.auth.renewal_window_minutes >= self.auth.jwt_expiry_minutes
        {
            bail!("JWT_RENEWAL_WINDOW_MINUTES must be between 0 and JWT_EXPIRY_MINUTES");
        }
        if !(4..=31).contains(&self.auth.bcrypt_cost) {
            bail!("BCRYPT_COST must be between 4 and 31");
        }
        Regex::new(&self.cors.allowed_referer).context("Invalid CORS_ALLOWED_REFERER pattern")?;

        if !self.security_enabled {
            warn!("SECURITY_ENABLED=false: authentication filter is disabled");
        }
        if self.environment.is_production() && !self.cookies.secure {
            warn!("COOKIE_SECURE=false in production");
        }
        Ok(())
    }

    /// Human readable summary for startup logs
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Workout Diary Server Configuration:\n\
             - Environment: {}\n\
             - Listen: {}:{}\n\
             - Database: {}\n\
             - JWT expiry: {} minutes (renew within {} minutes)\n\
             - CORS origins: {}\n\
             - Referer enforcement: {}\n\
             - Security: {}",
            self.environment.as_str(),
            self.host,
            self.http_port,
            self.database.url,
            self.auth.jwt_expiry_minutes,
            self.auth.renewal_window_minutes,
            if self.cors.allowed_origins.is_empty() {
                "none".to_owned()
            } else {
                self.cors.allowed_origins.join(", ")
            },
            if self.cors.enforce_referer { "on" } else { "off" },
            if self.security_enabled { "enabled" } else { "disabled" },
        )
    }
}

/// Random HS256 secret for processes without `JWT_SECRET`
#[must_use]
pub fn generate_jwt_secret() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn parse_bool(key: &str, default: bool) -> Result<bool> {
    match env::var(key) {
        Err(_) => Ok(default),
        Ok(value) => match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            other => bail!("Invalid {key} value: {other}"),
        },
    }
}

/// Parse comma-separated origins
fn parse_origins(origins_str: &str) -> Vec<String> {
    origins_str
        .split(',')
        .map(|s| s.trim().trim_end_matches('/').to_owned())
        .filter(|s| !s.is_empty())
        .collect()
}
