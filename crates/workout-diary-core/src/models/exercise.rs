// ABOUTME: Exercise catalog entry with muscle groups, difficulty, type, and author references
// ABOUTME: Exercises are named documents curated by users and administrators
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use super::NameRef;
use crate::document::{Document, Metadata, NamedDocument, UpdatableField};

/// Catalog exercise
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Bookkeeping
    #[serde(flatten)]
    pub meta: Metadata,
    /// Unique name
    pub name: String,
    /// Demonstration video
    #[serde(default, rename = "videoURL")]
    pub video_url: Option<String>,
    /// How to perform it
    #[serde(default)]
    pub description: Option<String>,
    /// Muscle groups worked
    #[serde(default)]
    pub muscle_groups: Vec<NameRef>,
    /// Ids of the primary muscle groups, a subset of `muscle_groups`
    #[serde(default)]
    pub main_muscle_group_ids: Vec<String>,
    /// Difficulty level
    #[serde(default)]
    pub difficulty: Option<NameRef>,
    /// Exercise type
    #[serde(default)]
    pub exercise_type: Option<NameRef>,
    /// User who added it
    #[serde(default)]
    pub author: Option<NameRef>,
}

impl Exercise {
    /// New exercise with only a name
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            meta: Metadata::new(),
            name: name.trim().to_owned(),
            video_url: None,
            description: None,
            muscle_groups: Vec::new(),
            main_muscle_group_ids: Vec::new(),
            difficulty: None,
            exercise_type: None,
            author: None,
        }
    }

    /// Main muscle groups resolved against `muscle_groups`
    #[must_use]
    pub fn main_muscle_groups(&self) -> Vec<&NameRef> {
        self.muscle_groups
            .iter()
            .filter(|group| self.main_muscle_group_ids.contains(&group.id))
            .collect()
    }
}

impl Document for Exercise {
    const COLLECTION: &'static str = "exercises";
    const LABEL: &'static str = "Exercise";
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

    fn updatable_fields() -> &'static [UpdatableField] {
        const FIELDS: &[UpdatableField] = &[
            UpdatableField::required("name"),
            UpdatableField::optional("videoURL"),
            UpdatableField::optional("description"),
        ];
        FIELDS
    }
}

impl NamedDocument for Exercise {
    fn name(&self) -> &str {
        &self.name
    }
}
