// ABOUTME: Exercise and physique record routes keyed by user and 30-minute slot
// ABOUTME: Adding to an occupied slot appends sets or overwrites the measurement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;
use workout_diary_core::constants::limits::DEFAULT_RECORD_LIMIT;
use workout_diary_core::document::{Document, NamedDocument};
use workout_diary_core::errors::{AppError, AppResult};
use workout_diary_core::models::{ExerciseRecord, ExerciseSet, PhysiqueRecord, User};
use workout_diary_core::responses::DataResponse;
use workout_diary_core::time::{parse_record_datetime, record_slot, to_30_min_interval};

use super::api_path;
use super::documents::DocumentRoutes;
use crate::database::Database;
use crate::middleware::AuthUser;
use crate::resources::ServerResources;

/// `?username=jack&datetime=2024-05-01_18-45`
#[derive(Debug, Deserialize)]
pub struct AddRecordQuery {
    /// Owner of the record
    pub username: String,
    /// Slot time; now when absent
    pub datetime: Option<String>,
}

/// Body of `POST /api/v1/exerciseRecord/add`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecordRequest {
    /// Exercise performed
    pub exercise_name: String,
    /// Sets to append
    #[serde(default)]
    pub sets: Vec<ExerciseSet>,
    /// Free-form note
    #[serde(default)]
    pub note: Option<String>,
    /// Where it happened
    #[serde(default)]
    pub location: Option<String>,
}

/// Body of `POST /api/v1/physiqueRecord/add`
#[derive(Debug, Deserialize)]
pub struct PhysiqueRecordRequest {
    /// Body weight in pounds
    pub weight: f64,
    /// Height in feet
    pub height: String,
}

/// `?name=jack&exerciseName=Squat&skipCount=0&limit=10`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserExerciseQuery {
    /// Username
    pub name: String,
    /// Exercise name
    pub exercise_name: String,
    /// Records skipped, newest first
    #[serde(default)]
    pub skip_count: usize,
    /// Page size
    pub limit: Option<usize>,
}

/// `?name=jack&exerciseName=Squat&datetime=2024-05-01_18-30`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreciseRecordQuery {
    /// Username
    pub name: String,
    /// Exercise name
    pub exercise_name: String,
    /// Slot time
    pub datetime: String,
}

async fn require_user(database: &Database, username: &str) -> AppResult<User> {
    database
        .find_by_name::<User>(username)
        .await?
        .ok_or_else(|| AppError::not_found_message(format!("Cannot find user by name {username}")))
}

/// Record routes handler
pub struct RecordRoutes;

impl RecordRoutes {
    /// Create exercise and physique record routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        let exercise = api_path("exerciseRecord");
        let physique = api_path("physiqueRecord");

        DocumentRoutes::records::<ExerciseRecord>(&exercise)
            .route(&format!("{exercise}/add"), post(Self::handle_add_exercise_record))
            .route(
                &format!("{exercise}/getByUserExername"),
                get(Self::handle_get_by_user_exercise),
            )
            .route(
                &format!("{exercise}/deleteByPrecision"),
                delete(Self::handle_delete_by_precision),
            )
            .route(
                &format!("{exercise}/deleteAllByExerNameForUser"),
                delete(Self::handle_delete_all_for_user),
            )
            .merge(
                DocumentRoutes::records::<PhysiqueRecord>(&physique)
                    .route(&format!("{physique}/add"), post(Self::handle_add_physique_record)),
            )
            .with_state(resources)
    }

    async fn handle_add_exercise_record(
        State(resources): State<Arc<ServerResources>>,
        _caller: AuthUser,
        Query(query): Query<AddRecordQuery>,
        Json(request): Json<ExerciseRecordRequest>,
    ) -> AppResult<Json<DataResponse<Value>>> {
        if request.exercise_name.trim().is_empty() {
            return Err(AppError::missing_field("exerciseName"));
        }
        let user = require_user(&resources.database, &query.username).await?;
        let slot = record_slot(query.datetime.as_deref())?;

        let existing = resources
            .database
            .find_record::<ExerciseRecord>(user.name(), slot, Some(&request.exercise_name))
            .await?;
        let mut record = existing.unwrap_or_else(|| {
            ExerciseRecord::new(user.name(), slot, &request.exercise_name)
        });
        record.add_sets(request.sets);
        if request.note.is_some() {
            record.note = request.note;
        }
        if request.location.is_some() {
            record.location = request.location;
        }
        record.meta.touch();
        resources.database.save(&record).await?;

        info!(user = %user.name, exercise = %record.exercise_name, sets = record.sets.len(), "Recorded exercise");
        Ok(Json(DataResponse::new(
            record.public_view()?,
            "Added record successfully.",
        )))
    }

    async fn handle_add_physique_record(
        State(resources): State<Arc<ServerResources>>,
        _caller: AuthUser,
        Query(query): Query<AddRecordQuery>,
        Json(request): Json<PhysiqueRecordRequest>,
    ) -> AppResult<Json<DataResponse<Value>>> {
        if request.height.trim().is_empty() {
            return Err(AppError::missing_field("height"));
        }
        let user = require_user(&resources.database, &query.username).await?;
        let slot = record_slot(query.datetime.as_deref())?;

        let record = match resources
            .database
            .find_record::<PhysiqueRecord>(user.name(), slot, None)
            .await?
        {
            Some(mut existing) => {
                existing.weight = request.weight;
                existing.height = request.height;
                existing.meta.touch();
                existing
            }
            None => PhysiqueRecord::new(user.name(), slot, request.weight, request.height),
        };
        resources.database.save(&record).await?;

        Ok(Json(DataResponse::new(
            record.public_view()?,
            "Added record successfully.",
        )))
    }

    async fn handle_get_by_user_exercise(
        State(resources): State<Arc<ServerResources>>,
        _caller: AuthUser,
        Query(query): Query<UserExerciseQuery>,
    ) -> AppResult<Json<DataResponse<Vec<Value>>>> {
        let user = require_user(&resources.database, &query.name).await?;
        let limit = query.limit.unwrap_or(DEFAULT_RECORD_LIMIT);

        let (records, has_next_page) = resources
            .database
            .find_records::<ExerciseRecord>(
                user.name(),
                Some(&query.exercise_name),
                query.skip_count,
                limit,
            )
            .await?;

        let views = records
            .iter()
            .map(Document::public_view)
            .collect::<AppResult<Vec<_>>>()?;
        Ok(Json(DataResponse::paged(views, "Found records.", has_next_page)))
    }

    async fn handle_delete_by_precision(
        State(resources): State<Arc<ServerResources>>,
        caller: AuthUser,
        Query(query): Query<PreciseRecordQuery>,
    ) -> AppResult<Json<DataResponse<Value>>> {
        let user = resources
            .database
            .find_by_name::<User>(&query.name)
            .await?
            .ok_or_else(|| AppError::not_found_message("Username not found."))?;
        let slot = to_30_min_interval(parse_record_datetime(&query.datetime)?);

        let record = resources
            .database
            .find_record::<ExerciseRecord>(user.name(), slot, Some(&query.exercise_name))
            .await?
            .ok_or_else(|| AppError::not_found_message("Record not found."))?;
        resources.database.delete::<ExerciseRecord>(record.id()).await?;

        info!(user = %user.name, exercise = %record.exercise_name, by = %caller.username, "Deleted exercise record");
        Ok(Json(DataResponse::new(
            record.public_view()?,
            "Excercise record has been deleted.",
        )))
    }

    async fn handle_delete_all_for_user(
        State(resources): State<Arc<ServerResources>>,
        caller: AuthUser,
        Query(query): Query<UserExerciseQuery>,
    ) -> AppResult<Json<DataResponse<u64>>> {
        let user = resources
            .database
            .find_by_name::<User>(&query.name)
            .await?
            .ok_or_else(|| AppError::not_found_message("Username not found."))?;

        let count = resources
            .database
            .delete_records::<ExerciseRecord>(user.name(), &query.exercise_name, None)
            .await?;

        info!(user = %user.name, exercise = %query.exercise_name, count, by = %caller.username, "Deleted exercise records");
        let message = if count == 0 {
            "No document was found."
        } else {
            "Deleted document count."
        };
        Ok(Json(DataResponse::new(count, message)))
    }
}
