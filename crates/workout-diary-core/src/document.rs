// ABOUTME: Document trait and field-level operations shared by every stored collection
// ABOUTME: Implements map-driven updates, typed field set/remove, and JSON projections via serde
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Documents
//!
//! Every collection the API exposes stores serde documents. Generic CRUD
//! endpoints work on any [`Document`]; the operations in this module patch a
//! document through its `serde_json::Value` form and deserialize it back, so
//! a patch that breaks the model's types is rejected instead of stored.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::time::{parse_birthday, parse_record_datetime};

/// Fields managed by the store that clients may never patch
pub const RESERVED_FIELDS: [&str; 4] = ["id", "createdAt", "updatedAt", "softDeleted"];

/// Bookkeeping carried by every document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Document id (UUID v4)
    pub id: String,
    /// Hidden from listings when set
    #[serde(default)]
    pub soft_deleted: bool,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Last modification time
    pub updated_at: DateTime<Utc>,
}

impl Metadata {
    /// Fresh metadata with a new id
    #[must_use]
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            soft_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Bump `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

/// A field that the map-driven update may write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdatableField {
    /// JSON field name
    pub name: &'static str,
    /// Null or blank values are refused and reported as unchanged
    pub not_null: bool,
    /// Value is bcrypt-hashed before storage
    pub encoded: bool,
}

impl UpdatableField {
    /// Optional field
    #[must_use]
    pub const fn optional(name: &'static str) -> Self {
        Self {
            name,
            not_null: false,
            encoded: false,
        }
    }

    /// Field that must stay non-blank
    #[must_use]
    pub const fn required(name: &'static str) -> Self {
        Self {
            name,
            not_null: true,
            encoded: false,
        }
    }

    /// Required field stored as a password hash
    #[must_use]
    pub const fn secret(name: &'static str) -> Self {
        Self {
            name,
            not_null: true,
            encoded: true,
        }
    }
}

/// A stored entity
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static {
    /// Table name
    const COLLECTION: &'static str;
    /// Human readable name used in messages
    const LABEL: &'static str;
    /// Whether `index_name` must be unique across the collection
    const UNIQUE_NAME: bool = false;

    /// Bookkeeping fields
    fn meta(&self) -> &Metadata;

    /// Mutable bookkeeping fields
    fn meta_mut(&mut self) -> &mut Metadata;

    /// Document id
    fn id(&self) -> &str {
        &self.meta().id
    }

    /// Value of the indexed `name` column
    fn index_name(&self) -> Option<&str> {
        None
    }

    /// Value of the indexed `owner` column
    fn owner(&self) -> Option<&str> {
        None
    }

    /// Value of the indexed `recorded_at` column
    fn recorded_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Fields the map-driven update may write
    fn updatable_fields() -> &'static [UpdatableField] {
        &[]
    }

    /// Bring patched fields back to their stored form
    fn normalize_fields(&mut self) {}

    /// JSON returned to clients
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    fn public_view(&self) -> AppResult<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// A document addressed by a name
pub trait NamedDocument: Document {
    /// Current name
    fn name(&self) -> &str;

    /// Canonical form used for storage and lookups
    #[must_use]
    fn normalize_name(name: &str) -> String {
        name.trim().to_owned()
    }

    /// Build a new document from just a name, if the type supports it
    #[must_use]
    fn from_name(_name: &str) -> Option<Self> {
        None
    }
}

/// A document that belongs to a user at a point in time
pub trait RecordDocument: Document {
    /// Owning username
    fn username(&self) -> &str;

    /// Slot the record belongs to
    fn date(&self) -> DateTime<Utc>;
}

/// Result of [`apply_field_updates`]
#[derive(Debug, Clone)]
pub struct FieldUpdateOutcome<T> {
    /// Patched document
    pub entity: T,
    /// Fields refused because they were null or blank
    pub unchanged: Vec<String>,
}

fn to_object<T: Document>(entity: &T) -> AppResult<Map<String, Value>> {
    match serde_json::to_value(entity)? {
        Value::Object(map) => Ok(map),
        _ => Err(AppError::internal(format!(
            "{} did not serialize to an object",
            T::LABEL
        ))),
    }
}

fn from_object<T: Document>(map: Map<String, Value>, id: &str) -> AppResult<T> {
    serde_json::from_value(Value::Object(map))
        .map_err(|e| AppError::invalid_input(format!("Entity(s) not updated on: {id}: {e}")))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn check_reserved(field: &str) -> AppResult<()> {
    if RESERVED_FIELDS.contains(&field) {
        return Err(AppError::unsupported(format!(
            "Field '{field}' is managed by the server"
        )));
    }
    Ok(())
}

/// Apply a map of field values to a document
///
/// Only fields listed by [`Document::updatable_fields`] are written. A
/// `not_null` field that is missing, null, or blank is left untouched and
/// reported in [`FieldUpdateOutcome::unchanged`]. Encoded fields go through
/// `encode` first.
///
/// # Errors
///
/// Returns `INVALID_INPUT` if an encoded value is not a string or the patched
/// document no longer matches the model
pub fn apply_field_updates<T: Document>(
    entity: &T,
    fields: &Map<String, Value>,
    encode: &dyn Fn(&str) -> AppResult<String>,
) -> AppResult<FieldUpdateOutcome<T>> {
    let mut doc = to_object(entity)?;
    let mut unchanged = Vec::new();

    for field in T::updatable_fields() {
        let value = fields.get(field.name);
        if field.not_null && value.map_or(true, is_blank) {
            unchanged.push(field.name.to_owned());
            continue;
        }
        let Some(value) = value else {
            continue;
        };

        let stored = if field.encoded {
            let plain = value.as_str().ok_or_else(|| {
                AppError::invalid_input(format!("Field '{}' must be a string", field.name))
            })?;
            Value::String(encode(plain)?)
        } else {
            value.clone()
        };
        doc.insert(field.name.to_owned(), stored);
    }

    let mut updated: T = from_object(doc, entity.id())?;
    updated.normalize_fields();
    updated.meta_mut().touch();
    Ok(FieldUpdateOutcome {
        entity: updated,
        unchanged,
    })
}

/// Add or overwrite a single field on a document
///
/// # Errors
///
/// Returns an error if the field is reserved, not part of the model, or the
/// value does not fit the model's type
pub fn set_field<T: Document>(entity: &T, field: &str, value: Value) -> AppResult<T> {
    check_reserved(field)?;
    let mut doc = to_object(entity)?;
    if !doc.contains_key(field) {
        return Err(AppError::unsupported(format!(
            "Field '{field}' is not defined on {}",
            T::LABEL
        )));
    }
    doc.insert(field.to_owned(), value);

    let mut updated: T = from_object(doc, entity.id())?;
    updated.normalize_fields();
    updated.meta_mut().touch();
    Ok(updated)
}

/// Clear a single field on a document
///
/// # Errors
///
/// Returns an error if the field is reserved, already empty, or required by
/// the model
pub fn remove_field<T: Document>(entity: &T, field: &str) -> AppResult<T> {
    check_reserved(field)?;
    let mut doc = to_object(entity)?;
    match doc.get(field) {
        None | Some(Value::Null) => {
            return Err(AppError::invalid_input(format!(
                "{field} not found on id: {}",
                entity.id()
            )));
        }
        Some(_) => {}
    }
    doc.insert(field.to_owned(), Value::Null);

    let mut updated: T = serde_json::from_value(Value::Object(doc)).map_err(|_| {
        AppError::invalid_input(format!(
            "Field '{field}' is required on {} and cannot be removed",
            T::LABEL
        ))
    })?;
    updated.meta_mut().touch();
    Ok(updated)
}

/// Declared type of a value sent to the add-or-modify field endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Text
    String,
    /// Whole number
    Integer,
    /// Floating point number
    Double,
    /// true / false
    Boolean,
    /// Calendar date or timestamp
    Date,
    /// JSON array
    List,
    /// Any JSON value, stored as given
    Json,
}

impl FieldType {
    /// Parse a type name such as `String`, `java.lang.Integer`, or `double`
    ///
    /// # Errors
    ///
    /// Returns `UNSUPPORTED_OPERATION` for unknown names
    pub fn parse(class: &str) -> AppResult<Self> {
        let lowered = class.trim().to_lowercase();
        let simple = lowered.rsplit('.').next().unwrap_or(&lowered);
        match simple {
            "string" | "str" | "text" => Ok(Self::String),
            "integer" | "int" | "long" | "short" => Ok(Self::Integer),
            "double" | "float" | "number" | "bigdecimal" => Ok(Self::Double),
            "boolean" | "bool" => Ok(Self::Boolean),
            "date" | "localdate" | "localdatetime" | "instant" | "datetime" => Ok(Self::Date),
            "list" | "arraylist" | "set" | "array" => Ok(Self::List),
            "object" | "json" | "map" => Ok(Self::Json),
            _ => Err(AppError::unsupported(format!(
                "Unsupported field type: {class}"
            ))),
        }
    }

    /// Convert a raw JSON value into this type
    ///
    /// # Errors
    ///
    /// Returns `INVALID_FORMAT` if the value cannot be represented
    pub fn convert(self, value: &Value) -> AppResult<Value> {
        let mismatch = || {
            AppError::invalid_format(format!("Value {value} cannot be converted to {self:?}"))
        };

        match (self, value) {
            (_, Value::Null) | (Self::Json, _) => Ok(value.clone()),
            (Self::String, Value::String(_)) => Ok(value.clone()),
            (Self::String, Value::Number(n)) => Ok(Value::String(n.to_string())),
            (Self::String, Value::Bool(b)) => Ok(Value::String(b.to_string())),
            (Self::Integer, Value::Number(n)) => n.as_i64().map(Value::from).ok_or_else(mismatch),
            (Self::Integer, Value::String(s)) => {
                s.trim().parse::<i64>().map(Value::from).map_err(|_| mismatch())
            }
            (Self::Double, Value::Number(n)) => n.as_f64().map(Value::from).ok_or_else(mismatch),
            (Self::Double, Value::String(s)) => {
                s.trim().parse::<f64>().map(Value::from).map_err(|_| mismatch())
            }
            (Self::Boolean, Value::Bool(_)) => Ok(value.clone()),
            (Self::Boolean, Value::String(s)) => {
                s.trim().parse::<bool>().map(Value::from).map_err(|_| mismatch())
            }
            (Self::Date, Value::String(s)) => convert_date(s).ok_or_else(mismatch),
            (Self::List, Value::Array(_)) => Ok(value.clone()),
            (Self::List, Value::String(s)) => Ok(Value::Array(
                s.split(',')
                    .map(str::trim)
                    .filter(|item| !item.is_empty())
                    .map(|item| Value::String(item.to_owned()))
                    .collect(),
            )),
            _ => Err(mismatch()),
        }
    }
}

fn convert_date(raw: &str) -> Option<Value> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw.trim()) {
        return Some(Value::String(parsed.with_timezone(&Utc).to_rfc3339()));
    }
    if let Ok(parsed) = parse_record_datetime(raw) {
        return Some(Value::String(parsed.to_rfc3339()));
    }
    parse_birthday(raw)
        .ok()
        .map(|date: NaiveDate| Value::String(date.format("%Y-%m-%d").to_string()))
}

/// Keep only `fields` (and `id`) of a document view
#[must_use]
pub fn project_include(view: &Value, fields: &[String]) -> Value {
    let Value::Object(map) = view else {
        return view.clone();
    };
    let projected = map
        .iter()
        .filter(|(key, _)| key.as_str() == "id" || fields.iter().any(|f| f == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Value::Object(projected)
}

/// Drop `fields` from a document view
#[must_use]
pub fn project_exclude(view: &Value, fields: &[String]) -> Value {
    let Value::Object(map) = view else {
        return view.clone();
    };
    let projected = map
        .iter()
        .filter(|(key, _)| !fields.iter().any(|f| f == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    Value::Object(projected)
}

/// Order-preserving de-duplication of JSON values
#[must_use]
pub fn distinct_values(values: Vec<Value>) -> Vec<Value> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.to_string()))
        .collect()
}
