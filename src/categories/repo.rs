use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{Category, CategoryChanges, NewCategory};
use crate::{db::PgStore, error::StoreResult};

#[async_trait]
pub trait CategoryRepo: Send + Sync {
    /// Fails with `StoreError::Duplicate` when the name is taken.
    async fn create(&self, new: NewCategory) -> StoreResult<Category>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Category>>;
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Category>>;
    /// Newest first.
    async fn list(&self) -> StoreResult<Vec<Category>>;
    /// `None` when the id does not resolve.
    async fn update(&self, id: Uuid, changes: CategoryChanges) -> StoreResult<Option<Category>>;
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
impl CategoryRepo for PgStore {
    async fn create(&self, new: NewCategory) -> StoreResult<Category> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(category)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"SELECT id, name, description, created_at, updated_at FROM categories WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"SELECT id, name, description, created_at, updated_at FROM categories WHERE name = $1"#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    async fn list(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM categories
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn update(&self, id: Uuid, changes: CategoryChanges) -> StoreResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
               SET name = COALESCE($2, name),
                   description = COALESCE($3, description),
                   updated_at = now()
             WHERE id = $1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query(r#"DELETE FROM categories WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
