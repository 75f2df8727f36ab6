// ABOUTME: Per-user record queries over the owner and recorded_at columns
// ABOUTME: Lists, looks up, and deletes exercise and physique records by user, slot, and label
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use chrono::{DateTime, Utc};
use workout_diary_core::document::RecordDocument;
use workout_diary_core::errors::AppResult;

use super::documents::row_to_document;
use super::{timestamp_key, Database};

impl Database {
    /// Records of one user, newest first, optionally restricted to a label
    ///
    /// Returns the requested window and whether more records follow it.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_records<T: RecordDocument>(
        &self,
        owner: &str,
        label: Option<&str>,
        skip: usize,
        limit: usize,
    ) -> AppResult<(Vec<T>, bool)> {
        let fetch = i64::try_from(limit.saturating_add(1)).unwrap_or(i64::MAX);
        let offset = i64::try_from(skip).unwrap_or(i64::MAX);

        let rows = sqlx::query(&format!(
            r"
            SELECT body FROM {}
            WHERE owner = $1 AND soft_deleted = 0 AND ($2 IS NULL OR name = $2)
            ORDER BY recorded_at DESC, created_at DESC
            LIMIT $3 OFFSET $4
            ",
            T::COLLECTION
        ))
        .bind(owner)
        .bind(label.map(str::trim))
        .bind(fetch)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let mut records = rows
            .iter()
            .map(row_to_document)
            .collect::<AppResult<Vec<T>>>()?;
        let has_next = records.len() > limit;
        records.truncate(limit);
        Ok((records, has_next))
    }

    /// Every live record of one user, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_records_by_owner<T: RecordDocument>(&self, owner: &str) -> AppResult<Vec<T>> {
        let rows = sqlx::query(&format!(
            r"
            SELECT body FROM {}
            WHERE owner = $1 AND soft_deleted = 0
            ORDER BY recorded_at DESC, created_at DESC
            ",
            T::COLLECTION
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_document).collect()
    }

    /// The record of one user in one slot, optionally for one label
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_record<T: RecordDocument>(
        &self,
        owner: &str,
        date: DateTime<Utc>,
        label: Option<&str>,
    ) -> AppResult<Option<T>> {
        let row = sqlx::query(&format!(
            r"
            SELECT body FROM {}
            WHERE owner = $1 AND recorded_at = $2 AND ($3 IS NULL OR name = $3)
            ORDER BY created_at
            LIMIT 1
            ",
            T::COLLECTION
        ))
        .bind(owner)
        .bind(timestamp_key(date))
        .bind(label.map(str::trim))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_document).transpose()
    }

    /// Delete records of one user for a label, in one slot or across all slots
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn delete_records<T: RecordDocument>(
        &self,
        owner: &str,
        label: &str,
        date: Option<DateTime<Utc>>,
    ) -> AppResult<u64> {
        let result = sqlx::query(&format!(
            r"
            DELETE FROM {}
            WHERE owner = $1 AND name = $2 AND ($3 IS NULL OR recorded_at = $3)
            ",
            T::COLLECTION
        ))
        .bind(owner)
        .bind(label.trim())
        .bind(date.map(timestamp_key))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
