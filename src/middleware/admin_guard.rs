// ABOUTME: Path-based admin guard and the own-account rule for user endpoints
// ABOUTME: Delete endpoints need ROLE_ADMIN; non-admins may only address their own user document
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Admin Authorization Guard
//!
//! Runs after the authentication filter on `/api/v1`. Two rules apply:
//!
//! - any path segment starting with `delete` requires `ROLE_ADMIN`
//!   (`softDeleteByIds` is open to every authenticated user);
//! - under `/api/v1/user/`, a non-admin may only pass their own id or name in
//!   the `ids`, `id`, `names`, and `name` query parameters (soft delete and
//!   restore are exempt).

use std::collections::HashMap;

use axum::extract::{Query, Request};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use workout_diary_core::constants::paths;
use workout_diary_core::errors::{AppError, AppResult, ErrorCode};

use super::auth::AuthUser;
use crate::routes::split_list;

const SOFT_DELETE_SEGMENT: &str = "softDeleteByIds";
const RESTORE_SEGMENT: &str = "unsoftDeleteByIds";

/// Whether the path addresses an admin-only delete endpoint
#[must_use]
pub fn requires_admin(path: &str) -> bool {
    path.split('/')
        .any(|segment| segment.starts_with("delete") && segment != SOFT_DELETE_SEGMENT)
}

fn is_user_path(path: &str) -> bool {
    path.strip_prefix(paths::API_V1)
        .and_then(|rest| rest.strip_prefix("/user/"))
        .is_some_and(|endpoint| endpoint != SOFT_DELETE_SEGMENT && endpoint != RESTORE_SEGMENT)
}

/// Check that a non-admin only addresses their own account
///
/// # Errors
///
/// Returns `PERMISSION_DENIED` if another user's id or name is present
pub fn check_own_account(caller: &AuthUser, query: &HashMap<String, String>) -> AppResult<()> {
    if caller.is_admin() {
        return Ok(());
    }

    let foreign_id = ["ids", "id"]
        .iter()
        .filter_map(|key| query.get(*key))
        .flat_map(|value| split_list(value))
        .find(|id| *id != caller.id);
    let foreign_name = ["names", "name"]
        .iter()
        .filter_map(|key| query.get(*key))
        .flat_map(|value| split_list(value))
        .find(|name| *name != caller.username);

    if foreign_id.is_some() || foreign_name.is_some() {
        return Err(AppError::permission_denied(
            "Access denied: users may only access their own account",
        ));
    }
    Ok(())
}

/// Enforce admin-only paths and the own-account rule
pub async fn admin_guard(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let Some(caller) = request.extensions().get::<AuthUser>() else {
        return AppError::auth_required().into_response();
    };

    if requires_admin(path) && !caller.is_admin() {
        return AppError::new(ErrorCode::AuthRequired, "Required admin").into_response();
    }

    if is_user_path(path) {
        let query = Query::<HashMap<String, String>>::try_from_uri(request.uri())
            .map(|Query(query)| query)
            .unwrap_or_default();
        if let Err(error) = check_own_account(caller, &query) {
            return error.into_response();
        }
    }

    next.run(request).await
}
