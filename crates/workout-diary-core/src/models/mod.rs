// ABOUTME: Domain models for the workout diary: users, catalog data, exercises, and records
// ABOUTME: Re-exports every document type and the NameRef reference used between them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::document::NamedDocument;

/// Muscle groups, exercise types, and difficulties
pub mod catalog;
/// Exercise catalog entries
pub mod exercise;
/// Exercise and physique records
pub mod record;
/// Users and roles
pub mod user;

pub use catalog::{Difficulty, DifficultyLevel, ExerciseType, MuscleGroup};
pub use exercise::Exercise;
pub use record::{ExerciseRecord, ExerciseSet, PhysiqueRecord};
pub use user::{Role, RoleName, User};

/// Embedded reference to another named document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRef {
    /// Referenced document id
    pub id: String,
    /// Referenced document name at the time of linking
    pub name: String,
}

impl NameRef {
    /// Reference a named document
    #[must_use]
    pub fn to<T: NamedDocument>(doc: &T) -> Self {
        Self {
            id: doc.id().to_owned(),
            name: doc.name().to_owned(),
        }
    }
}
