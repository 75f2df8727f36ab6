// ABOUTME: Exercise catalog filtering by references and a case-insensitive name pattern
// ABOUTME: Strict mode requires every given value to match; loose mode accepts any overlap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Exercise Search
//!
//! Reference names are resolved to ids by the caller; this module only
//! matches exercises against those ids and the substring pattern.

use regex::{Regex, RegexBuilder};
use workout_diary_core::errors::{AppError, AppResult};
use workout_diary_core::models::{Exercise, NameRef};

/// Build the case-insensitive substring pattern, treating an invalid regex as literal text
///
/// # Errors
///
/// Returns `INVALID_INPUT` if even the escaped pattern cannot be compiled
pub fn substring_pattern(substring: &str) -> AppResult<Regex> {
    RegexBuilder::new(substring)
        .case_insensitive(true)
        .build()
        .or_else(|_| {
            RegexBuilder::new(&regex::escape(substring))
                .case_insensitive(true)
                .build()
        })
        .map_err(|e| AppError::invalid_input(format!("Invalid search pattern: {e}")))
}

/// Criteria for the exercise search
#[derive(Debug, Clone, Default)]
pub struct ExerciseFilter {
    /// Require every criterion value instead of any
    pub strict: bool,
    /// Difficulty ids
    pub difficulty_ids: Vec<String>,
    /// Muscle group ids
    pub muscle_group_ids: Vec<String>,
    /// Exercise type ids
    pub exercise_type_ids: Vec<String>,
    /// Author user ids
    pub author_ids: Vec<String>,
    /// Pattern matched against the name (and description when not strict)
    pub pattern: Option<Regex>,
}

impl ExerciseFilter {
    fn matches_single(&self, wanted: &[String], actual: Option<&NameRef>) -> bool {
        if wanted.is_empty() {
            return true;
        }
        let Some(actual) = actual else {
            return false;
        };
        if self.strict {
            wanted.iter().all(|id| *id == actual.id)
        } else {
            wanted.iter().any(|id| *id == actual.id)
        }
    }

    fn matches_groups(&self, exercise: &Exercise) -> bool {
        if self.muscle_group_ids.is_empty() {
            return true;
        }
        let has = |id: &String| exercise.muscle_groups.iter().any(|group| group.id == *id);
        if self.strict {
            self.muscle_group_ids.iter().all(has)
        } else {
            self.muscle_group_ids.iter().any(has)
        }
    }

    fn matches_text(&self, exercise: &Exercise) -> bool {
        let Some(pattern) = &self.pattern else {
            return true;
        };
        if pattern.is_match(&exercise.name) {
            return true;
        }
        !self.strict
            && exercise
                .description
                .as_deref()
                .is_some_and(|description| pattern.is_match(description))
    }

    /// Whether an exercise satisfies every criterion
    #[must_use]
    pub fn matches(&self, exercise: &Exercise) -> bool {
        self.matches_single(&self.difficulty_ids, exercise.difficulty.as_ref())
            && self.matches_single(&self.exercise_type_ids, exercise.exercise_type.as_ref())
            && self.matches_single(&self.author_ids, exercise.author.as_ref())
            && self.matches_groups(exercise)
            && self.matches_text(exercise)
    }

    /// Keep the matching exercises, preserving order
    #[must_use]
    pub fn apply(&self, exercises: Vec<Exercise>) -> Vec<Exercise> {
        exercises
            .into_iter()
            .filter(|exercise| self.matches(exercise))
            .collect()
    }
}
