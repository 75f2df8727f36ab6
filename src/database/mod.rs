// ABOUTME: SQLite document store for every workout diary collection
// ABOUTME: Opens the pool, creates one JSON-document table per collection, and seeds reference data
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Database Management
//!
//! Each collection is a table of JSON documents with a few indexed columns
//! (`name`, `owner`, `recorded_at`, `soft_deleted`) pulled out of the body on
//! write. Generic CRUD lives in [`documents`], record queries in [`records`],
//! and user lookups in [`users`].

mod documents;
mod records;
mod users;

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tracing::{debug, info};
use workout_diary_core::document::Document;
use workout_diary_core::errors::{AppError, AppResult};
use workout_diary_core::models::{
    Difficulty, DifficultyLevel, Exercise, ExerciseRecord, ExerciseType, MuscleGroup,
    PhysiqueRecord, Role, RoleName, User,
};

/// Database manager for all document collections
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Open (creating if needed) the database, run migrations, and seed reference data
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails, or
    /// migrations fail
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let in_memory = database_url.contains(":memory:");

        let mut options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid DATABASE_URL '{database_url}': {e}")))?
            .create_if_missing(true);

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options = options.journal_mode(SqliteJournalMode::Wal);
            ensure_parent_dir(database_url).await?;
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        db.seed_reference_data().await?;
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Check the connection is usable
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if a table or index cannot be created
    pub async fn migrate(&self) -> AppResult<()> {
        self.create_collection::<User>().await?;
        self.create_collection::<Role>().await?;
        self.create_collection::<MuscleGroup>().await?;
        self.create_collection::<ExerciseType>().await?;
        self.create_collection::<Difficulty>().await?;
        self.create_collection::<Exercise>().await?;
        self.create_collection::<ExerciseRecord>().await?;
        self.create_collection::<PhysiqueRecord>().await?;
        self.migrate_users().await?;
        Ok(())
    }

    async fn create_collection<T: Document>(&self) -> AppResult<()> {
        let table = T::COLLECTION;
        debug!("Creating collection table {table}");

        sqlx::query(&format!(
            r"
            CREATE TABLE IF NOT EXISTS {table} (
                id TEXT PRIMARY KEY,
                name TEXT,
                owner TEXT,
                recorded_at TEXT,
                soft_deleted INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                body TEXT NOT NULL
            )
            "
        ))
        .execute(&self.pool)
        .await?;

        let name_index = if T::UNIQUE_NAME {
            format!("CREATE UNIQUE INDEX IF NOT EXISTS idx_{table}_name ON {table}(name)")
        } else {
            format!("CREATE INDEX IF NOT EXISTS idx_{table}_name ON {table}(name)")
        };
        sqlx::query(&name_index).execute(&self.pool).await?;

        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS idx_{table}_owner ON {table}(owner, recorded_at)"
        ))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert roles and difficulty levels that do not exist yet
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup or insert fails
    pub async fn seed_reference_data(&self) -> AppResult<()> {
        let mut created = 0;
        for role in RoleName::ALL {
            if !self.exists_by_name::<Role>(role.as_str()).await? {
                self.insert(&Role::new(role)).await?;
                created += 1;
            }
        }
        for level in DifficultyLevel::ALL {
            if !self.exists_by_name::<Difficulty>(level.as_str()).await? {
                self.insert(&Difficulty::new(level)).await?;
                created += 1;
            }
        }
        if created > 0 {
            info!("Seeded {created} reference documents");
        }
        Ok(())
    }
}

/// Sortable text form used for all timestamp columns
#[must_use]
pub fn timestamp_key(datetime: DateTime<Utc>) -> String {
    datetime.to_rfc3339_opts(SecondsFormat::Micros, true)
}

async fn ensure_parent_dir(database_url: &str) -> AppResult<()> {
    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:");
    let path = path.split('?').next().unwrap_or(path);
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::database(format!(
                    "Failed to create database directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
    }
    Ok(())
}
