// ABOUTME: User account routes: generic controllers plus the current-user lookup
// ABOUTME: Role names in updates are resolved to role references before saving
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Map, Value};
use workout_diary_core::constants::cookies;
use workout_diary_core::document::Document;
use workout_diary_core::errors::{AppError, AppResult};
use workout_diary_core::models::{NameRef, Role, User};
use workout_diary_core::responses::DataResponse;

use super::documents::{DocumentRoutes, DocumentRules};
use super::api_path;
use crate::database::Database;
use crate::middleware::AuthUser;
use crate::resources::ServerResources;
use crate::security::cookies::get_cookie_value;

#[async_trait]
impl DocumentRules for User {
    async fn apply_update_rules(
        &mut self,
        database: &Database,
        fields: &Map<String, Value>,
    ) -> AppResult<()> {
        let Some(requested) = fields.get("roles") else {
            return Ok(());
        };
        let names: Vec<String> = serde_json::from_value(requested.clone())
            .map_err(|e| AppError::invalid_input(format!("roles must be a list of names: {e}")))?;

        let mut roles: Vec<NameRef> = Vec::with_capacity(names.len());
        for role in database.find_by_names::<Role>(&names).await? {
            if !roles.iter().any(|existing| existing.id == role.meta.id) {
                roles.push(NameRef::to(&role));
            }
        }
        self.roles = roles;
        Ok(())
    }
}

/// User routes handler
pub struct UserRoutes;

impl UserRoutes {
    /// Create all user routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let prefix = api_path("user");
        DocumentRoutes::named::<User>(&prefix)
            .route(&format!("{prefix}/getCurrent"), get(Self::handle_get_current))
            .with_state(resources)
    }

    async fn handle_get_current(
        State(resources): State<Arc<ServerResources>>,
        _caller: AuthUser,
        headers: HeaderMap,
    ) -> AppResult<Json<DataResponse<Value>>> {
        let username = get_cookie_value(&headers, cookies::USERNAME)
            .ok_or_else(|| AppError::missing_field("username cookie"))?;
        let user = resources
            .database
            .find_by_name::<User>(&username)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User '{username}'")))?;

        Ok(Json(DataResponse::new(user.public_view()?, "Found user.")))
    }
}
