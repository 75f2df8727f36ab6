// ABOUTME: Exercise catalog routes: paginated search and authored creation
// ABOUTME: Resolves difficulty, muscle group, type, and author names before filtering or linking
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Exercise routes
//!
//! On top of the generic controllers, `/api/v1/exercise` offers a search over
//! the catalog and an `add` endpoint that links the new exercise to its
//! muscle groups, difficulty, type, and author.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use workout_diary_core::constants::cookies;
use workout_diary_core::document::{Document, NamedDocument};
use workout_diary_core::errors::{AppError, AppResult};
use workout_diary_core::models::{
    Difficulty, Exercise, ExerciseType, MuscleGroup, NameRef, User,
};
use workout_diary_core::pagination::PageRequest;
use workout_diary_core::responses::DataResponse;

use super::documents::DocumentRoutes;
use super::{api_path, split_list};
use crate::database::Database;
use crate::middleware::AuthUser;
use crate::resources::ServerResources;
use crate::search::{substring_pattern, ExerciseFilter};
use crate::security::cookies::get_cookie_value;

/// Query parameters of the exercise search
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Comma separated difficulty names
    pub difficulties: Option<String>,
    /// Comma separated muscle group names
    pub muscle_groups: Option<String>,
    /// Comma separated exercise type names
    pub exercise_types: Option<String>,
    /// Comma separated author usernames
    pub author_names: Option<String>,
    /// Case-insensitive pattern
    pub substring: Option<String>,
    /// Require every value instead of any
    #[serde(default)]
    pub strict: bool,
    /// Zero-based page
    pub page: Option<usize>,
    /// Page size
    pub size: Option<usize>,
}

/// Body of `POST /api/v1/exercise/add`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePostRequest {
    /// Unique exercise name
    pub name: String,
    /// Demonstration video
    #[serde(default, rename = "videoURL")]
    pub video_url: Option<String>,
    /// How to perform it
    #[serde(default)]
    pub description: Option<String>,
    /// Muscle groups worked
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    /// Primary muscle groups, each one of `muscle_groups`
    #[serde(default)]
    pub main_muscle_group_names: Vec<String>,
    /// Difficulty level name
    pub difficulty: String,
    /// Exercise type name
    #[serde(default)]
    pub exercise_type: Option<String>,
}

async fn resolve_ids<T: NamedDocument>(
    database: &Database,
    names: Option<&str>,
) -> AppResult<Vec<String>> {
    let Some(names) = names else {
        return Ok(Vec::new());
    };
    let docs = database.find_by_names::<T>(&split_list(names)).await?;
    Ok(docs.iter().map(|doc| doc.id().to_owned()).collect())
}

/// Exercise routes handler
pub struct ExerciseRoutes;

impl ExerciseRoutes {
    /// Create all exercise routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let prefix = api_path("exercise");
        DocumentRoutes::named::<Exercise>(&prefix)
            .route(&format!("{prefix}/search"), get(Self::handle_search))
            .route(&format!("{prefix}/add"), post(Self::handle_add))
            .with_state(resources)
    }

    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        _caller: AuthUser,
        Query(query): Query<SearchQuery>,
    ) -> AppResult<Json<DataResponse<Vec<Value>>>> {
        let database = &resources.database;
        let filter = ExerciseFilter {
            strict: query.strict,
            difficulty_ids: resolve_ids::<Difficulty>(database, query.difficulties.as_deref())
                .await?,
            muscle_group_ids: resolve_ids::<MuscleGroup>(database, query.muscle_groups.as_deref())
                .await?,
            exercise_type_ids: resolve_ids::<ExerciseType>(
                database,
                query.exercise_types.as_deref(),
            )
            .await?,
            author_ids: resolve_ids::<User>(database, query.author_names.as_deref()).await?,
            pattern: query
                .substring
                .as_deref()
                .filter(|substring| !substring.is_empty())
                .map(substring_pattern)
                .transpose()?,
        };

        let page = PageRequest::new(query.page, query.size);
        let matching = filter.apply(database.list::<Exercise>().await?);
        let (exercises, has_next_page) = page.slice(matching);
        debug!(page = page.page, size = page.size, has_next_page, "Exercise search");

        let views = exercises
            .iter()
            .map(Document::public_view)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Json(DataResponse::paged(views, "Success!", has_next_page)))
    }

    async fn handle_add(
        State(resources): State<Arc<ServerResources>>,
        _caller: AuthUser,
        headers: HeaderMap,
        Json(request): Json<ExercisePostRequest>,
    ) -> AppResult<Json<DataResponse<Value>>> {
        let database = &resources.database;
        if request.name.trim().is_empty() {
            return Err(AppError::missing_field("name"));
        }

        let difficulty = database
            .find_by_name::<Difficulty>(&request.difficulty)
            .await?
            .ok_or_else(|| AppError::not_found_message("Difficulty not found by name."))?;
        let muscle_groups = database
            .find_by_names::<MuscleGroup>(&request.muscle_groups)
            .await?;

        let mut main_muscle_group_ids = Vec::with_capacity(request.main_muscle_group_names.len());
        for main in &request.main_muscle_group_names {
            let wanted = MuscleGroup::normalize_name(main);
            let group = muscle_groups
                .iter()
                .find(|group| group.name == wanted)
                .ok_or_else(|| {
                    AppError::not_found_message(format!(
                        "Main muscle group not relevant with name: {main}"
                    ))
                })?;
            if !main_muscle_group_ids.contains(&group.meta.id) {
                main_muscle_group_ids.push(group.meta.id.clone());
            }
        }

        let exercise_type = match request.exercise_type.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => Some(
                database
                    .find_by_name::<ExerciseType>(name)
                    .await?
                    .ok_or_else(|| {
                        AppError::not_found_message(format!(
                            "Exercise type not found by name: {name}"
                        ))
                    })?,
            ),
            _ => None,
        };

        let token = get_cookie_value(&headers, cookies::TOKEN)
            .ok_or_else(|| AppError::missing_field("token cookie"))?;
        let email = resources.auth_manager.decipher_email(&token)?;
        let author = database
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::not_found_message("User not found by email"))?;

        let mut exercise = Exercise::new(&request.name);
        exercise.video_url = request.video_url;
        exercise.description = request.description;
        exercise.muscle_groups = muscle_groups.iter().map(NameRef::to).collect();
        exercise.main_muscle_group_ids = main_muscle_group_ids;
        exercise.difficulty = Some(NameRef::to(&difficulty));
        exercise.exercise_type = exercise_type.as_ref().map(NameRef::to);
        exercise.author = Some(NameRef::to(&author));

        database.insert(&exercise).await?;
        info!(exercise = %exercise.name, author = %author.name, "Added exercise");

        Ok(Json(DataResponse::new(
            exercise.public_view()?,
            "Added new exercise.",
        )))
    }
}
