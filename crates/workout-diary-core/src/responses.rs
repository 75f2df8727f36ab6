// ABOUTME: Response envelopes returned by the REST endpoints
// ABOUTME: DataResponse wraps payloads with a message and optional next-page flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Payload plus a human readable message
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataResponse<T> {
    /// Result payload
    pub data: T,
    /// Outcome message
    pub message: String,
    /// Set on paginated results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_next_page: Option<bool>,
}

impl<T> DataResponse<T> {
    /// Unpaginated response
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            has_next_page: None,
        }
    }

    /// One page of a larger result
    pub fn paged(data: T, message: impl Into<String>, has_next_page: bool) -> Self {
        Self {
            data,
            message: message.into(),
            has_next_page: Some(has_next_page),
        }
    }
}

/// Message-only response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleResponse {
    /// Outcome message
    pub message: String,
}

impl SimpleResponse {
    /// Wrap a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Sign-in result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtResponse {
    /// Access token
    pub token: String,
    /// Always `Bearer`
    #[serde(rename = "type")]
    pub token_type: String,
    /// User id
    pub id: String,
    /// Username
    pub username: String,
    /// Email
    pub email: String,
    /// `ROLE_*` names
    pub roles: Vec<String>,
}
