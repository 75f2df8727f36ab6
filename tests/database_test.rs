// ABOUTME: Integration tests for the file-backed SQLite document store
// ABOUTME: Verifies persistence across reopen and idempotent reference data seeding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(missing_docs, clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::init_test_logging;
use tempfile::TempDir;
use workout_diary_core::document::NamedDocument;
use workout_diary_core::models::{Difficulty, MuscleGroup, Role, User};
use workout_diary_server::database::Database;

#[tokio::test]
async fn test_documents_survive_reopen() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.path().join("nested/diary.db").display());

    {
        let db = Database::new(&url).await.unwrap();
        db.insert(&MuscleGroup::new("glutes")).await.unwrap();
        db.insert(&User::new(
            "jack".into(),
            "jack@example.com".into(),
            "$2b$04$hash".into(),
        ))
        .await
        .unwrap();
        db.pool().close().await;
    }

    let db = Database::new(&url).await.unwrap();
    let group = db.find_by_name::<MuscleGroup>("Glutes").await.unwrap().unwrap();
    assert_eq!(group.name(), "GLUTES");
    assert!(db.find_user_by_email("jack@example.com").await.unwrap().is_some());

    assert_eq!(db.list::<Role>().await.unwrap().len(), 3);
    assert_eq!(db.list::<Difficulty>().await.unwrap().len(), 4);
}
