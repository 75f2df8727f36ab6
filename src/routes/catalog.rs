// ABOUTME: Reference data routes for roles, muscle groups, exercise types, and difficulties
// ABOUTME: Each collection gets the generic base and named controllers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::Router;
use workout_diary_core::models::{Difficulty, ExerciseType, MuscleGroup, Role};

use super::api_path;
use super::documents::DocumentRoutes;
use crate::resources::ServerResources;

/// Catalog routes handler
pub struct CatalogRoutes;

impl CatalogRoutes {
    /// Create all catalog routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        DocumentRoutes::named::<Role>(&api_path("userRole"))
            .merge(DocumentRoutes::named::<MuscleGroup>(&api_path("muscleGroup")))
            .merge(DocumentRoutes::named::<ExerciseType>(&api_path("exerciseType")))
            .merge(DocumentRoutes::named::<Difficulty>(&api_path("difficulty")))
            .with_state(resources)
    }
}
