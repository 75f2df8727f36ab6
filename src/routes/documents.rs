// ABOUTME: Generic base, named, and record controllers shared by every collection
// ABOUTME: Id/name lookups, field patches, projections, hard and soft deletes over any Document type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Document Controllers
//!
//! Handlers here are generic over the document type and are mounted once per
//! collection with a turbofish, e.g. `get(handle_get_by_ids::<Exercise>)`.
//! Type-specific behavior hooks in through [`DocumentRules`].

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::info;
use workout_diary_core::document::{
    apply_field_updates, distinct_values, project_exclude, project_include, remove_field,
    set_field, Document, FieldType, NamedDocument, RecordDocument,
};
use workout_diary_core::errors::{AppError, AppResult};
use workout_diary_core::models::{
    Difficulty, Exercise, ExerciseRecord, ExerciseType, MuscleGroup, PhysiqueRecord, Role,
    RoleName,
};
use workout_diary_core::responses::DataResponse;

use super::{format_list, split_list};
use crate::auth::hash_password_blocking;
use crate::database::Database;
use crate::middleware::AuthUser;
use crate::resources::ServerResources;

const CURATORS: &[RoleName] = &[RoleName::Admin, RoleName::Moderator];
const ADMINS: &[RoleName] = &[RoleName::Admin];

/// Type-specific steps of the generic update
#[async_trait]
pub trait DocumentRules: Document {
    /// Runs after the generic field updates of `updateById`, before saving
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced document cannot be resolved
    async fn apply_update_rules(
        &mut self,
        _database: &Database,
        _fields: &Map<String, Value>,
    ) -> AppResult<()> {
        Ok(())
    }
}

impl DocumentRules for Role {}
impl DocumentRules for MuscleGroup {}
impl DocumentRules for ExerciseType {}
impl DocumentRules for Difficulty {}
impl DocumentRules for Exercise {}
impl DocumentRules for ExerciseRecord {}
impl DocumentRules for PhysiqueRecord {}

/// `?ids=a,b`
#[derive(Debug, Deserialize)]
pub struct IdsQuery {
    /// Comma separated ids
    pub ids: String,
}

/// `?id=a`
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    /// Document id
    pub id: String,
}

/// `?names=a,b`
#[derive(Debug, Deserialize)]
pub struct NamesQuery {
    /// Comma separated names
    pub names: String,
}

/// `?usernames=a,b`
#[derive(Debug, Deserialize)]
pub struct UsernamesQuery {
    /// Comma separated usernames
    pub usernames: String,
}

/// `?fieldName=x&distinct=true`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFieldQuery {
    /// Field to read from every document
    pub field_name: String,
    /// De-duplicate the values
    #[serde(default)]
    pub distinct: bool,
}

/// `?fields=a,b`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionQuery {
    /// Comma separated field names
    pub fields: String,
    /// Accepted for older clients; the route's collection is always used
    #[serde(default)]
    pub class_name: Option<String>,
}

/// `?ids=a,b&fieldName=x`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFieldQuery {
    /// Comma separated ids
    pub ids: String,
    /// Field to clear
    pub field_name: String,
}

/// Body of the add-or-modify field endpoints
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdateRequest {
    /// Field to write
    pub field_name: String,
    /// Declared type, e.g. `String` or `java.lang.Integer`
    pub field_type_class: String,
    /// Raw value
    #[serde(default)]
    pub value: Value,
}

/// Body of `add/namelist`
#[derive(Debug, Deserialize)]
pub struct NameListRequest {
    /// Names to create
    pub names: Vec<String>,
}

fn views<T: Document>(docs: &[T]) -> AppResult<Vec<Value>> {
    docs.iter().map(Document::public_view).collect()
}

async fn modify_field<T: Document>(
    resources: &ServerResources,
    entities: Vec<T>,
    request: FieldUpdateRequest,
) -> AppResult<Vec<T>> {
    let field_type = FieldType::parse(&request.field_type_class)?;
    let mut value = field_type.convert(&request.value)?;

    let encoded = T::updatable_fields()
        .iter()
        .any(|field| field.encoded && field.name == request.field_name);
    if encoded {
        let plain = value
            .as_str()
            .ok_or_else(|| {
                AppError::invalid_input(format!("Field '{}' must be a string", request.field_name))
            })?
            .to_owned();
        let cost = resources.config.auth.bcrypt_cost;
        value = Value::String(crate::auth::hash_password(plain, cost).await?);
    }

    let mut updated = Vec::with_capacity(entities.len());
    for entity in &entities {
        let patched = set_field(entity, &request.field_name, value.clone())?;
        resources.database.save(&patched).await?;
        updated.push(patched);
    }
    Ok(updated)
}

// ============================================================================
// Base controller
// ============================================================================

/// `GET getByIds`
///
/// # Errors
///
/// Returns 403 for callers without a curator role and 404 for a missing id
pub async fn handle_get_by_ids<T: DocumentRules>(
    State(resources): State<Arc<ServerResources>>,
    caller: AuthUser,
    Query(query): Query<IdsQuery>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    caller.require_any_role(CURATORS)?;
    let docs = resources
        .database
        .get_many::<T>(&split_list(&query.ids))
        .await?;
    Ok(Json(DataResponse::new(views(&docs)?, "Found Id(s)")))
}

/// `GET getAll`
///
/// # Errors
///
/// Returns 403 for non-admins
pub async fn handle_get_all<T: DocumentRules>(
    State(resources): State<Arc<ServerResources>>,
    caller: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    caller.require_any_role(ADMINS)?;
    let docs = resources.database.list::<T>().await?;
    Ok(Json(DataResponse::new(views(&docs)?, "All documents.")))
}

/// `GET getAllIds`
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn handle_get_all_ids<T: DocumentRules>(
    State(resources): State<Arc<ServerResources>>,
    _caller: AuthUser,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let ids = resources.database.list_ids::<T>().await?;
    Ok(Json(DataResponse::new(ids, "All documents' ids.")))
}

/// `GET queryField`
///
/// # Errors
///
/// Returns 400 if the field name contains a space
pub async fn handle_query_field<T: DocumentRules>(
    State(resources): State<Arc<ServerResources>>,
    caller: AuthUser,
    Query(query): Query<QueryFieldQuery>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    caller.require_any_role(CURATORS)?;
    if query.field_name.contains(' ') {
        return Err(AppError::invalid_input(
            "Field name should not contain spaces",
        ));
    }

    let docs = resources.database.list::<T>().await?;
    let mut values: Vec<Value> = views(&docs)?
        .into_iter()
        .map(|view| view.get(&query.field_name).cloned().unwrap_or(Value::Null))
        .collect();
    if query.distinct {
        values = distinct_values(values);
    }

    Ok(Json(DataResponse::new(
        values,
        format!("Queried field(s): {}", query.field_name),
    )))
}

/// `GET projectWithInclude`
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn handle_project_include<T: DocumentRules>(
    State(resources): State<Arc<ServerResources>>,
    _caller: AuthUser,
    Query(query): Query<ProjectionQuery>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    let fields = split_list(&query.fields);
    let docs = resources.database.list::<T>().await?;
    let projected = views(&docs)?
        .iter()
        .map(|view| project_include(view, &fields))
        .collect();
    Ok(Json(DataResponse::new(projected, "Include fields projection!")))
}

/// `GET projectWithExclude`
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn handle_project_exclude<T: DocumentRules>(
    State(resources): State<Arc<ServerResources>>,
    _caller: AuthUser,
    Query(query): Query<ProjectionQuery>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    let fields = split_list(&query.fields);
    let docs = resources.database.list::<T>().await?;
    let projected = views(&docs)?
        .iter()
        .map(|view| project_exclude(view, &fields))
        .collect();
    Ok(Json(DataResponse::new(projected, "Exclude fields projection!")))
}

/// `PUT addOrModifyFieldByIds`
///
/// # Errors
///
/// Returns 404 for a missing id and 400 for an unknown field or bad value
pub async fn handle_modify_field_by_ids<T: DocumentRules>(
    State(resources): State<Arc<ServerResources>>,
    caller: AuthUser,
    Query(query): Query<IdsQuery>,
    Json(request): Json<FieldUpdateRequest>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    caller.require_any_role(CURATORS)?;
    let ids = split_list(&query.ids);
    let entities = resources.database.get_many::<T>(&ids).await?;
    let updated = modify_field(&resources, entities, request).await?;

    Ok(Json(DataResponse::new(
        views(&updated)?,
        format!(
            "Added/Modified field with specified value on entity(s): {}",
            format_list(&ids)
        ),
    )))
}

/// `PUT removeFieldByIds`
///
/// # Errors
///
/// Returns 403 for non-admins and 400 if the field is empty or required
pub async fn handle_remove_field_by_ids<T: DocumentRules>(
    State(resources): State<Arc<ServerResources>>,
    caller: AuthUser,
    Query(query): Query<RemoveFieldQuery>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    caller.require_any_role(ADMINS)?;
    let ids = split_list(&query.ids);
    let entities = resources.database.get_many::<T>(&ids).await?;

    let mut updated = Vec::with_capacity(entities.len());
    for entity in &entities {
        let patched = remove_field(entity, &query.field_name)?;
        resources.database.save(&patched).await?;
        updated.push(patched);
    }

    Ok(Json(DataResponse::new(
        views(&updated)?,
        format!("Removed field on entity(s): {}", format_list(&ids)),
    )))
}

/// `PUT updateById`
///
/// # Errors
///
/// Returns 404 for a missing id and 400 if the patch does not fit the model
pub async fn handle_update_by_id<T: DocumentRules>(
    State(resources): State<Arc<ServerResources>>,
    caller: AuthUser,
    Query(query): Query<IdQuery>,
    Json(fields): Json<Map<String, Value>>,
) -> AppResult<Json<DataResponse<Value>>> {
    caller.require_any_role(CURATORS)?;
    let entity = resources.database.get::<T>(&query.id).await?.ok_or_else(|| {
        AppError::not_found_message(format!("Entity(s) cannot be found by: {}", query.id))
    })?;

    let cost = resources.config.auth.bcrypt_cost;
    let patch = fields.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        apply_field_updates(&entity, &patch, &|plain: &str| hash_password_blocking(plain, cost))
    })
    .await
    .map_err(|e| AppError::internal(format!("Update task failed: {e}")))??;

    let mut updated = outcome.entity;
    updated
        .apply_update_rules(&resources.database, &fields)
        .await?;
    resources.database.save(&updated).await?;

    let mut message = String::from("Entity updated.");
    if !outcome.unchanged.is_empty() {
        message.push_str(" Unchanged fields: ");
        message.push_str(&format_list(&outcome.unchanged));
    }
    info!(collection = T::COLLECTION, id = %query.id, user = %caller.username, "Updated document");

    Ok(Json(DataResponse::new(updated.public_view()?, message)))
}

/// `DELETE deleteByIds` (admin, enforced by the path guard)
///
/// # Errors
///
/// Returns 404 naming the first missing id; nothing is deleted then
pub async fn handle_delete_by_ids<T: DocumentRules>(
    State(resources): State<Arc<ServerResources>>,
    caller: AuthUser,
    Query(query): Query<IdsQuery>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    let ids = split_list(&query.ids);
    let entities = resources.database.get_many::<T>(&ids).await?;
    resources.database.delete_many::<T>(&ids).await?;

    info!(collection = T::COLLECTION, count = ids.len(), user = %caller.username, "Deleted documents");
    Ok(Json(DataResponse::new(
        views(&entities)?,
        format!("Entity(s) deleted on: {}", format_list(&ids)),
    )))
}

/// `DELETE deleteAll`
///
/// # Errors
///
/// Returns 403 for non-admins
pub async fn handle_delete_all<T: DocumentRules>(
    State(resources): State<Arc<ServerResources>>,
    caller: AuthUser,
) -> AppResult<Json<DataResponse<u64>>> {
    caller.require_any_role(ADMINS)?;
    let count = resources.database.delete_all::<T>().await?;

    info!(collection = T::COLLECTION, count, user = %caller.username, "Deleted all documents");
    Ok(Json(DataResponse::new(count, "Deleted all documents.")))
}

/// `DELETE softDeleteByIds`
///
/// # Errors
///
/// Returns 404 naming the first missing id
pub async fn handle_soft_delete_by_ids<T: DocumentRules>(
    State(resources): State<Arc<ServerResources>>,
    _caller: AuthUser,
    Query(query): Query<IdsQuery>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    let ids = split_list(&query.ids);
    let docs = resources.database.set_soft_deleted::<T>(&ids, true).await?;
    Ok(Json(DataResponse::new(
        views(&docs)?,
        format!("Entity(s) soft deleted on: {}", format_list(&ids)),
    )))
}

/// `DELETE unsoftDeleteByIds`
///
/// # Errors
///
/// Returns 404 naming the first missing id
pub async fn handle_unsoft_delete_by_ids<T: DocumentRules>(
    State(resources): State<Arc<ServerResources>>,
    _caller: AuthUser,
    Query(query): Query<IdsQuery>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    let ids = split_list(&query.ids);
    let docs = resources.database.set_soft_deleted::<T>(&ids, false).await?;
    Ok(Json(DataResponse::new(
        views(&docs)?,
        format!("Entity(s) restored on: {}", format_list(&ids)),
    )))
}

// ============================================================================
// Named controller
// ============================================================================

/// `POST add/namelist`
///
/// # Errors
///
/// Returns 400 if the type cannot be created from a name alone
pub async fn handle_add_name_list<T: DocumentRules + NamedDocument>(
    State(resources): State<Arc<ServerResources>>,
    caller: AuthUser,
    Json(request): Json<NameListRequest>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    caller.require_any_role(CURATORS)?;

    let mut added = Vec::new();
    for name in request.names.iter().map(|name| name.trim()).filter(|name| !name.is_empty()) {
        let doc = T::from_name(name).ok_or_else(|| {
            AppError::unsupported(format!("{} cannot be created from a name: {name}", T::LABEL))
        })?;
        if resources.database.exists_by_name::<T>(name).await? {
            continue;
        }
        resources.database.insert(&doc).await?;
        added.push(doc);
    }

    let message = if added.is_empty() {
        "Nothing is added."
    } else {
        "Added entity(s)."
    };
    Ok(Json(DataResponse::new(views(&added)?, message)))
}

/// `GET getByNames`
///
/// # Errors
///
/// Returns 404 naming the first missing name
pub async fn handle_get_by_names<T: DocumentRules + NamedDocument>(
    State(resources): State<Arc<ServerResources>>,
    _caller: AuthUser,
    Query(query): Query<NamesQuery>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    let docs = resources
        .database
        .find_by_names::<T>(&split_list(&query.names))
        .await?;
    Ok(Json(DataResponse::new(views(&docs)?, "Found entity(s).")))
}

/// `PUT addOrModifyFieldByNames`
///
/// # Errors
///
/// Returns 404 for a missing name and 400 for an unknown field or bad value
pub async fn handle_modify_field_by_names<T: DocumentRules + NamedDocument>(
    State(resources): State<Arc<ServerResources>>,
    caller: AuthUser,
    Query(query): Query<NamesQuery>,
    Json(request): Json<FieldUpdateRequest>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    caller.require_any_role(CURATORS)?;
    let names = split_list(&query.names);
    let entities = resources.database.find_by_names::<T>(&names).await?;
    let updated = modify_field(&resources, entities, request).await?;

    Ok(Json(DataResponse::new(
        views(&updated)?,
        format!(
            "Added/Modified field with specified value on entity(s): {}",
            format_list(&names)
        ),
    )))
}

/// `DELETE deleteByNames` (admin, enforced by the path guard)
///
/// # Errors
///
/// Returns 404 naming the first missing name
pub async fn handle_delete_by_names<T: DocumentRules + NamedDocument>(
    State(resources): State<Arc<ServerResources>>,
    caller: AuthUser,
    Query(query): Query<NamesQuery>,
) -> AppResult<Json<DataResponse<Vec<Value>>>> {
    let names = split_list(&query.names);
    let entities = resources.database.find_by_names::<T>(&names).await?;
    let ids: Vec<String> = entities.iter().map(|doc| doc.id().to_owned()).collect();
    resources.database.delete_many::<T>(&ids).await?;

    info!(collection = T::COLLECTION, names = %format_list(&names), user = %caller.username, "Deleted documents by name");
    Ok(Json(DataResponse::new(
        views(&entities)?,
        "Deleted entities by name(s).",
    )))
}

// ============================================================================
// Record controller
// ============================================================================

/// `GET getByUsernames`
///
/// # Errors
///
/// Returns an error if the query fails
pub async fn handle_get_by_usernames<T: DocumentRules + RecordDocument>(
    State(resources): State<Arc<ServerResources>>,
    _caller: AuthUser,
    Query(query): Query<UsernamesQuery>,
) -> AppResult<Json<DataResponse<Vec<Vec<Value>>>>> {
    let mut grouped = Vec::new();
    for username in split_list(&query.usernames) {
        let records = resources
            .database
            .find_records_by_owner::<T>(&username)
            .await?;
        grouped.push(views(&records)?);
    }
    Ok(Json(DataResponse::new(grouped, "Found records.")))
}

/// Route tables for the generic controllers
pub struct DocumentRoutes;

impl DocumentRoutes {
    /// Base controller routes under `prefix`
    pub fn base<T: DocumentRules>(prefix: &str) -> Router<Arc<ServerResources>> {
        Router::new()
            .route(&format!("{prefix}/getByIds"), get(handle_get_by_ids::<T>))
            .route(&format!("{prefix}/getAll"), get(handle_get_all::<T>))
            .route(&format!("{prefix}/getAllIds"), get(handle_get_all_ids::<T>))
            .route(&format!("{prefix}/queryField"), get(handle_query_field::<T>))
            .route(
                &format!("{prefix}/projectWithInclude"),
                get(handle_project_include::<T>),
            )
            .route(
                &format!("{prefix}/projectWithExclude"),
                get(handle_project_exclude::<T>),
            )
            .route(
                &format!("{prefix}/addOrModifyFieldByIds"),
                put(handle_modify_field_by_ids::<T>),
            )
            .route(
                &format!("{prefix}/removeFieldByIds"),
                put(handle_remove_field_by_ids::<T>),
            )
            .route(&format!("{prefix}/updateById"), put(handle_update_by_id::<T>))
            .route(
                &format!("{prefix}/deleteByIds"),
                delete(handle_delete_by_ids::<T>),
            )
            .route(&format!("{prefix}/deleteAll"), delete(handle_delete_all::<T>))
            .route(
                &format!("{prefix}/softDeleteByIds"),
                delete(handle_soft_delete_by_ids::<T>),
            )
            .route(
                &format!("{prefix}/unsoftDeleteByIds"),
                delete(handle_unsoft_delete_by_ids::<T>),
            )
    }

    /// Base plus named controller routes under `prefix`
    pub fn named<T: DocumentRules + NamedDocument>(prefix: &str) -> Router<Arc<ServerResources>> {
        Self::base::<T>(prefix)
            .route(&format!("{prefix}/add/namelist"), post(handle_add_name_list::<T>))
            .route(&format!("{prefix}/getByNames"), get(handle_get_by_names::<T>))
            .route(
                &format!("{prefix}/addOrModifyFieldByNames"),
                put(handle_modify_field_by_names::<T>),
            )
            .route(
                &format!("{prefix}/deleteByNames"),
                delete(handle_delete_by_names::<T>),
            )
    }

    /// Base plus record controller routes under `prefix`
    pub fn records<T: DocumentRules + RecordDocument>(prefix: &str) -> Router<Arc<ServerResources>> {
        Self::base::<T>(prefix).route(
            &format!("{prefix}/getByUsernames"),
            get(handle_get_by_usernames::<T>),
        )
    }
}
