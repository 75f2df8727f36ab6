// ABOUTME: Per-user workout and body-measurement records keyed by 30-minute slots
// ABOUTME: Exercise records accumulate sets; physique records hold weight and height
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{Document, Metadata, RecordDocument, UpdatableField};

/// One set: the weight lifted on each repetition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ExerciseSetRepr")]
pub struct ExerciseSet {
    /// Weight per repetition, in order
    pub repetitions: Vec<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ExerciseSetRepr {
    Bare(Vec<f64>),
    Tagged { repetitions: Vec<f64> },
}

impl From<ExerciseSetRepr> for ExerciseSet {
    fn from(repr: ExerciseSetRepr) -> Self {
        match repr {
            ExerciseSetRepr::Bare(repetitions) | ExerciseSetRepr::Tagged { repetitions } => {
                Self { repetitions }
            }
        }
    }
}

impl ExerciseSet {
    /// Number of repetitions
    #[must_use]
    pub fn repetition_count(&self) -> usize {
        self.repetitions.len()
    }

    /// Sum of the weights moved in this set
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.repetitions.iter().sum()
    }
}

/// Sets performed for one exercise in one slot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    /// Bookkeeping
    #[serde(flatten)]
    pub meta: Metadata,
    /// Owning username
    pub user: String,
    /// 30-minute slot
    pub date: DateTime<Utc>,
    /// Exercise performed
    pub exercise_name: String,
    /// Sets in the order they were logged
    #[serde(default)]
    pub sets: Vec<ExerciseSet>,
    /// Free-form note
    #[serde(default)]
    pub note: Option<String>,
    /// Where it happened
    #[serde(default)]
    pub location: Option<String>,
}

impl ExerciseRecord {
    /// New empty record
    #[must_use]
    pub fn new(user: &str, date: DateTime<Utc>, exercise_name: &str) -> Self {
        Self {
            meta: Metadata::new(),
            user: user.to_owned(),
            date,
            exercise_name: exercise_name.trim().to_owned(),
            sets: Vec::new(),
            note: None,
            location: None,
        }
    }

    /// Append sets to the record
    pub fn add_sets(&mut self, sets: impl IntoIterator<Item = ExerciseSet>) {
        self.sets.extend(sets);
    }

    /// Total weight across all sets
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.sets.iter().map(ExerciseSet::total_weight).sum()
    }
}

impl Document for ExerciseRecord {
    const COLLECTION: &'static str = "exercise_records";
    const LABEL: &'static str = "Exercise record";

    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    fn index_name(&self) -> Option<&str> {
        Some(&self.exercise_name)
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.user)
    }

    fn recorded_at(&self) -> Option<DateTime<Utc>> {
        Some(self.date)
    }

    fn updatable_fields() -> &'static [UpdatableField] {
        const FIELDS: &[UpdatableField] = &[
            UpdatableField::required("exerciseName"),
            UpdatableField::optional("sets"),
            UpdatableField::optional("note"),
            UpdatableField::optional("location"),
        ];
        FIELDS
    }
}

impl RecordDocument for ExerciseRecord {
    fn username(&self) -> &str {
        &self.user
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

/// Body measurement for one slot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysiqueRecord {
    /// Bookkeeping
    #[serde(flatten)]
    pub meta: Metadata,
    /// Owning username
    pub user: String,
    /// 30-minute slot
    pub date: DateTime<Utc>,
    /// Body weight in pounds
    pub weight: f64,
    /// Height in feet, as entered
    pub height: String,
}

impl PhysiqueRecord {
    /// New measurement
    #[must_use]
    pub fn new(user: &str, date: DateTime<Utc>, weight: f64, height: String) -> Self {
        Self {
            meta: Metadata::new(),
            user: user.to_owned(),
            date,
            weight,
            height,
        }
    }
}

impl Document for PhysiqueRecord {
    const COLLECTION: &'static str = "physique_records";
    const LABEL: &'static str = "Physique record";

    fn meta(&self) -> &Metadata {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    fn owner(&self) -> Option<&str> {
        Some(&self.user)
    }

    fn recorded_at(&self) -> Option<DateTime<Utc>> {
        Some(self.date)
    }

    fn updatable_fields() -> &'static [UpdatableField] {
        const FIELDS: &[UpdatableField] = &[
            UpdatableField::required("weight"),
            UpdatableField::required("height"),
        ];
        FIELDS
    }
}

impl RecordDocument for PhysiqueRecord {
    fn username(&self) -> &str {
        &self.user
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }
}
