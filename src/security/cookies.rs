// ABOUTME: Cookie parsing and Set-Cookie header construction for auth cookies
// ABOUTME: Builds token/username cookies with Max-Age, Path, Domain, Secure, HttpOnly, SameSite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::fmt::Write;

use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue};
use workout_diary_core::errors::{AppError, AppResult};

use crate::config::CookieConfig;

/// `SameSite` attribute values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// Sent on cross-site requests (requires `Secure`)
    None,
    /// Sent on top-level navigation
    Lax,
    /// Same-site only
    Strict,
}

impl SameSite {
    const fn as_str(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Lax => "Lax",
            Self::Strict => "Strict",
        }
    }
}

/// Attributes applied to a `Set-Cookie` header
#[derive(Debug, Clone)]
pub struct CookieOptions {
    /// Lifetime in seconds; zero expires the cookie
    pub max_age_secs: i64,
    /// `Domain` attribute
    pub domain: Option<String>,
    /// `Secure` attribute
    pub secure: bool,
    /// `HttpOnly` attribute
    pub http_only: bool,
    /// `SameSite` attribute
    pub same_site: Option<SameSite>,
}

impl CookieOptions {
    /// Options for sign-in cookies
    #[must_use]
    pub fn session(config: &CookieConfig) -> Self {
        Self {
            max_age_secs: config.max_age_secs,
            domain: config.domain.clone(),
            secure: config.secure,
            http_only: true,
            same_site: Some(if config.secure {
                SameSite::None
            } else {
                SameSite::Lax
            }),
        }
    }

    /// Options for a renewed token cookie
    #[must_use]
    pub const fn renewal(max_age_secs: i64) -> Self {
        Self {
            max_age_secs,
            domain: None,
            secure: false,
            http_only: true,
            same_site: None,
        }
    }

    /// Same options with an immediate expiry
    #[must_use]
    pub fn expired(mut self) -> Self {
        self.max_age_secs = 0;
        self
    }
}

/// Read a cookie value from the request headers
#[must_use]
pub fn get_cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_owned())
}

/// Whether the request carries any cookies at all
#[must_use]
pub fn has_cookies(headers: &HeaderMap) -> bool {
    headers
        .get_all(COOKIE)
        .iter()
        .any(|value| !value.as_bytes().is_empty())
}

/// Build a `Set-Cookie` header value
///
/// # Errors
///
/// Returns an error if the value contains characters not allowed in headers
pub fn set_cookie_header(name: &str, value: &str, options: &CookieOptions) -> AppResult<HeaderValue> {
    let mut cookie = format!("{name}={value}; Max-Age={}; Path=/", options.max_age_secs);
    if let Some(domain) = &options.domain {
        let _ = write!(cookie, "; Domain={domain}");
    }
    if options.secure {
        cookie.push_str("; Secure");
    }
    if options.http_only {
        cookie.push_str("; HttpOnly");
    }
    if let Some(same_site) = options.same_site {
        let _ = write!(cookie, "; SameSite={}", same_site.as_str());
    }

    HeaderValue::from_str(&cookie)
        .map_err(|e| AppError::internal(format!("Invalid cookie header: {e}")))
}

/// Build a `Set-Cookie` header that removes a cookie
///
/// # Errors
///
/// Returns an error if the header cannot be built
pub fn clear_cookie_header(name: &str, options: &CookieOptions) -> AppResult<HeaderValue> {
    set_cookie_header(name, "", &options.clone().expired())
}

/// Append a `Set-Cookie` header
pub fn append_set_cookie(headers: &mut HeaderMap, cookie: HeaderValue) {
    headers.append(SET_COOKIE, cookie);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("username=jack; token=abc.def.ghi"),
        );

        assert_eq!(get_cookie_value(&headers, "token").as_deref(), Some("abc.def.ghi"));
        assert_eq!(get_cookie_value(&headers, "username").as_deref(), Some("jack"));
        assert_eq!(get_cookie_value(&headers, "missing"), None);
        assert!(has_cookies(&headers));
        assert!(!has_cookies(&HeaderMap::new()));
    }

    #[test]
    fn test_session_cookie_attributes() {
        let config = CookieConfig {
            domain: Some("workoutdiary.jacktogon.com".into()),
            secure: true,
            max_age_secs: 3600,
        };
        let header = set_cookie_header("token", "abc", &CookieOptions::session(&config)).unwrap();

        assert_eq!(
            header.to_str().unwrap(),
            "token=abc; Max-Age=3600; Path=/; Domain=workoutdiary.jacktogon.com; Secure; HttpOnly; SameSite=None"
        );
    }

    #[test]
    fn test_clear_and_renewal_cookies() {
        let cleared = clear_cookie_header("username", &CookieOptions::renewal(60)).unwrap();
        assert_eq!(cleared.to_str().unwrap(), "username=; Max-Age=0; Path=/; HttpOnly");

        let renewed = set_cookie_header("token", "new", &CookieOptions::renewal(3600)).unwrap();
        assert_eq!(renewed.to_str().unwrap(), "token=new; Max-Age=3600; Path=/; HttpOnly");
    }
}
