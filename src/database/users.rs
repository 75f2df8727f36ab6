// ABOUTME: User-specific storage: unique email index and lookups by email
// ABOUTME: Emails live in the JSON body, so the index is an expression index on json_extract
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use workout_diary_core::document::Document;
use workout_diary_core::errors::AppResult;
use workout_diary_core::models::User;

use super::documents::row_to_document;
use super::Database;

impl Database {
    pub(super) async fn migrate_users(&self) -> AppResult<()> {
        sqlx::query(&format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_{table}_email ON {table}(json_extract(body, '$.email'))",
            table = User::COLLECTION
        ))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get a user by email
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT body FROM {} WHERE json_extract(body, '$.email') = $1",
            User::COLLECTION
        ))
        .bind(email.trim())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_document).transpose()
    }

    /// Whether an account already uses this email
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn exists_user_by_email(&self, email: &str) -> AppResult<bool> {
        Ok(self.find_user_by_email(email).await?.is_some())
    }
}
