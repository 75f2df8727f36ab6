// ABOUTME: Generic CRUD over any Document collection stored as JSON rows
// ABOUTME: Implements id, bulk, soft-delete, and name-based operations shared by every entity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tracing::debug;
use workout_diary_core::document::{Document, NamedDocument};
use workout_diary_core::errors::{AppError, AppResult, ErrorCode};

use super::{timestamp_key, Database};

pub(super) fn row_to_document<T: Document>(row: &SqliteRow) -> AppResult<T> {
    let body: String = row
        .try_get("body")
        .map_err(|e| AppError::database(format!("Failed to read {} body: {e}", T::LABEL)))?;
    serde_json::from_str(&body).map_err(|e| {
        AppError::database(format!("Corrupt {} document: {e}", T::LABEL)).with_source(e)
    })
}

impl Database {
    /// Insert a new document
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` if the id or a unique name is taken
    pub async fn insert<T: Document>(&self, doc: &T) -> AppResult<()> {
        let table = T::COLLECTION;
        let body = serde_json::to_string(doc)?;
        let meta = doc.meta();

        sqlx::query(&format!(
            r"
            INSERT INTO {table} (id, name, owner, recorded_at, soft_deleted, created_at, updated_at, body)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "
        ))
        .bind(&meta.id)
        .bind(doc.index_name())
        .bind(doc.owner())
        .bind(doc.recorded_at().map(timestamp_key))
        .bind(meta.soft_deleted)
        .bind(timestamp_key(meta.created_at))
        .bind(timestamp_key(meta.updated_at))
        .bind(body)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let error = AppError::from(e);
            if error.code == ErrorCode::ResourceAlreadyExists {
                AppError::already_exists(format!(
                    "{} already exists with name: {}",
                    T::LABEL,
                    doc.index_name().unwrap_or_else(|| doc.id())
                ))
            } else {
                error
            }
        })?;

        debug!("Inserted {} {}", T::LABEL, meta.id);
        Ok(())
    }

    /// Insert or replace a document by id
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_ALREADY_EXISTS` if a unique name collides with another document
    pub async fn save<T: Document>(&self, doc: &T) -> AppResult<()> {
        let table = T::COLLECTION;
        let body = serde_json::to_string(doc)?;
        let meta = doc.meta();

        sqlx::query(&format!(
            r"
            INSERT INTO {table} (id, name, owner, recorded_at, soft_deleted, created_at, updated_at, body)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                owner = excluded.owner,
                recorded_at = excluded.recorded_at,
                soft_deleted = excluded.soft_deleted,
                updated_at = excluded.updated_at,
                body = excluded.body
            "
        ))
        .bind(&meta.id)
        .bind(doc.index_name())
        .bind(doc.owner())
        .bind(doc.recorded_at().map(timestamp_key))
        .bind(meta.soft_deleted)
        .bind(timestamp_key(meta.created_at))
        .bind(timestamp_key(meta.updated_at))
        .bind(body)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a document by id, soft-deleted or not
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn get<T: Document>(&self, id: &str) -> AppResult<Option<T>> {
        let row = sqlx::query(&format!("SELECT body FROM {} WHERE id = $1", T::COLLECTION))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_document).transpose()
    }

    /// Get documents by id, in the requested order
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` naming the first id that does not exist
    pub async fn get_many<T: Document>(&self, ids: &[String]) -> AppResult<Vec<T>> {
        let mut docs = Vec::with_capacity(ids.len());
        for id in ids {
            let doc = self.get::<T>(id).await?.ok_or_else(|| {
                AppError::not_found_message(format!("Entity(s) cannot be found by: {id}"))
            })?;
            docs.push(doc);
        }
        Ok(docs)
    }

    /// All documents that are not soft-deleted, in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list<T: Document>(&self) -> AppResult<Vec<T>> {
        let rows = sqlx::query(&format!(
            "SELECT body FROM {} WHERE soft_deleted = 0 ORDER BY created_at, rowid",
            T::COLLECTION
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_document).collect()
    }

    /// Ids of every document that is not soft-deleted
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn list_ids<T: Document>(&self) -> AppResult<Vec<String>> {
        let ids = sqlx::query_scalar(&format!(
            "SELECT id FROM {} WHERE soft_deleted = 0 ORDER BY created_at, rowid",
            T::COLLECTION
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(ids)
    }

    /// Delete a document by id, returning whether it existed
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn delete<T: Document>(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", T::COLLECTION))
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete several documents; nothing is deleted unless all of them exist
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` naming the first missing id
    pub async fn delete_many<T: Document>(&self, ids: &[String]) -> AppResult<()> {
        self.get_many::<T>(ids).await?;

        let mut tx = self.pool.begin().await?;
        for id in ids {
            sqlx::query(&format!("DELETE FROM {} WHERE id = $1", T::COLLECTION))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        debug!("Deleted {} {} document(s)", ids.len(), T::LABEL);
        Ok(())
    }

    /// Delete every document in the collection
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn delete_all<T: Document>(&self) -> AppResult<u64> {
        let result = sqlx::query(&format!("DELETE FROM {}", T::COLLECTION))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Flag or unflag documents as soft-deleted
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` naming the first missing id
    pub async fn set_soft_deleted<T: Document>(
        &self,
        ids: &[String],
        soft_deleted: bool,
    ) -> AppResult<Vec<T>> {
        let mut docs = self.get_many::<T>(ids).await?;
        for doc in &mut docs {
            let meta = doc.meta_mut();
            meta.soft_deleted = soft_deleted;
            meta.touch();
            self.save(doc).await?;
        }
        Ok(docs)
    }

    /// Find a live document by name, normalizing the name first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn find_by_name<T: NamedDocument>(&self, name: &str) -> AppResult<Option<T>> {
        let row = sqlx::query(&format!(
            "SELECT body FROM {} WHERE name = $1 AND soft_deleted = 0 ORDER BY created_at LIMIT 1",
            T::COLLECTION
        ))
        .bind(T::normalize_name(name))
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_document).transpose()
    }

    /// Find live documents by name, in the requested order
    ///
    /// # Errors
    ///
    /// Returns `RESOURCE_NOT_FOUND` naming the first name that does not exist
    pub async fn find_by_names<T: NamedDocument>(&self, names: &[String]) -> AppResult<Vec<T>> {
        let mut docs = Vec::with_capacity(names.len());
        for name in names {
            let doc = self.find_by_name::<T>(name).await?.ok_or_else(|| {
                AppError::not_found_message(format!("{} not found with name: {name}", T::LABEL))
            })?;
            docs.push(doc);
        }
        Ok(docs)
    }

    /// Whether any document, soft-deleted or not, holds this name
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails
    pub async fn exists_by_name<T: NamedDocument>(&self, name: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM {} WHERE name = $1",
            T::COLLECTION
        ))
        .bind(T::normalize_name(name))
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workout_diary_core::models::{MuscleGroup, Role, RoleName};

    async fn database() -> Database {
        Database::new("sqlite::memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_seeded_roles_are_found_by_short_name() {
        let db = database().await;
        let admin = db.find_by_name::<Role>("admin").await.unwrap().unwrap();
        assert_eq!(admin.role_name(), Some(RoleName::Admin));
        assert!(db.exists_by_name::<Role>("ROLE_USER").await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let db = database().await;
        db.insert(&MuscleGroup::new("chest")).await.unwrap();

        let err = db.insert(&MuscleGroup::new("Chest")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ResourceAlreadyExists);
        assert_eq!(err.message, "Muscle group already exists with name: CHEST");
    }

    #[tokio::test]
    async fn test_soft_deleted_documents_are_hidden() {
        let db = database().await;
        let group = MuscleGroup::new("back");
        db.insert(&group).await.unwrap();

        db.set_soft_deleted::<MuscleGroup>(&[group.meta.id.clone()], true)
            .await
            .unwrap();
        assert!(db.list_ids::<MuscleGroup>().await.unwrap().is_empty());
        assert!(db.find_by_name::<MuscleGroup>("back").await.unwrap().is_none());
        assert!(db.exists_by_name::<MuscleGroup>("back").await.unwrap());
        assert!(db.get::<MuscleGroup>(&group.meta.id).await.unwrap().unwrap().meta.soft_deleted);

        db.set_soft_deleted::<MuscleGroup>(&[group.meta.id.clone()], false)
            .await
            .unwrap();
        assert_eq!(db.list::<MuscleGroup>().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_many_is_all_or_nothing() {
        let db = database().await;
        let group = MuscleGroup::new("legs");
        db.insert(&group).await.unwrap();

        let err = db
            .delete_many::<MuscleGroup>(&[group.meta.id.clone(), "missing".into()])
            .await
            .unwrap_err();
        assert_eq!(err.message, "Entity(s) cannot be found by: missing");
        assert!(db.get::<MuscleGroup>(&group.meta.id).await.unwrap().is_some());

        assert_eq!(db.delete_all::<MuscleGroup>().await.unwrap(), 1);
    }
}
