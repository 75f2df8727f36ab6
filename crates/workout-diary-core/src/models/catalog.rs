// ABOUTME: Reference data curated by administrators: muscle groups, exercise types, difficulties
// ABOUTME: Each is a named document that can be created from a bare name
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::document::{Document, Metadata, NamedDocument, UpdatableField};

/// Muscle group (stored upper-case)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleGroup {
    /// Bookkeeping
    #[serde(flatten)]
    pub meta: Metadata,
    /// Upper-case name
    pub name: String,
}

impl MuscleGroup {
    /// New muscle group; the name is upper-cased
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            meta: Metadata::new(),
            name: Self::normalize_name(name),
        }
    }
}

impl Document for MuscleGroup {
    const COLLECTION: &'static str = "muscle_groups";
    const LABEL: &'static str = "Muscle group";
    const UNIQUE_NAME: bool = true;

    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    fn index_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn normalize_fields(&mut self) {
        self.name = Self::normalize_name(&self.name);
    }

    fn updatable_fields() -> &'static [UpdatableField] {
        const FIELDS: &[UpdatableField] = &[UpdatableField::required("name")];
        FIELDS
    }
}

impl NamedDocument for MuscleGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn normalize_name(name: &str) -> String {
        name.trim().to_uppercase()
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(Self::new(name))
    }
}

/// Exercise category, such as strength or cardio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseType {
    /// Bookkeeping
    #[serde(flatten)]
    pub meta: Metadata,
    /// Type name
    pub name: String,
}

impl ExerciseType {
    /// New exercise type
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            meta: Metadata::new(),
            name: Self::normalize_name(name),
        }
    }
}

impl Document for ExerciseType {
    const COLLECTION: &'static str = "exercise_types";
    const LABEL: &'static str = "Exercise type";
    const UNIQUE_NAME: bool = true;

    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    fn index_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn normalize_fields(&mut self) {
        self.name = Self::normalize_name(&self.name);
    }

    fn updatable_fields() -> &'static [UpdatableField] {
        const FIELDS: &[UpdatableField] = &[UpdatableField::required("name")];
        FIELDS
    }
}

impl NamedDocument for ExerciseType {
    fn name(&self) -> &str {
        &self.name
    }

    fn from_name(name: &str) -> Option<Self> {
        Some(Self::new(name))
    }
}

/// Fixed difficulty scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DifficultyLevel {
    /// Beginner friendly
    Easy,
    /// Some experience needed
    Intermediate,
    /// Experienced lifters
    Advanced,
    /// Specialists only
    Expert,
}

impl DifficultyLevel {
    /// Every level, easiest first
    pub const ALL: [Self; 4] = [Self::Easy, Self::Intermediate, Self::Advanced, Self::Expert];

    /// Stored name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "EASY",
            Self::Intermediate => "INTERMEDIATE",
            Self::Advanced => "ADVANCED",
            Self::Expert => "EXPERT",
        }
    }

    /// Case-insensitive parse
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

/// Difficulty document, one per [`DifficultyLevel`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Difficulty {
    /// Bookkeeping
    #[serde(flatten)]
    pub meta: Metadata,
    /// Level name
    pub name: String,
}

impl Difficulty {
    /// New difficulty document
    #[must_use]
    pub fn new(level: DifficultyLevel) -> Self {
        Self {
            meta: Metadata::new(),
            name: level.as_str().to_owned(),
        }
    }
}

impl Document for Difficulty {
    const COLLECTION: &'static str = "difficulties";
    const LABEL: &'static str = "Difficulty";
    const UNIQUE_NAME: bool = true;

    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    fn index_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn normalize_fields(&mut self) {
        self.name = Self::normalize_name(&self.name);
    }
}

impl NamedDocument for Difficulty {
    fn name(&self) -> &str {
        &self.name
    }

    fn normalize_name(name: &str) -> String {
        name.trim().to_uppercase()
    }

    fn from_name(name: &str) -> Option<Self> {
        DifficultyLevel::parse(name).map(Self::new)
    }
}
