use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{NewUser, User, UserRow};
use crate::{db::PgStore, error::StoreResult};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `StoreError::Duplicate` when the email is taken.
    async fn create(&self, new: NewUser) -> StoreResult<User>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    /// Newest first.
    async fn list(&self) -> StoreResult<Vec<User>>;
    async fn set_password(&self, id: Uuid, password_hash: &str) -> StoreResult<bool>;
    async fn set_blocked(&self, id: Uuid, blocked: bool) -> StoreResult<Option<User>>;
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

fn convert(row: Option<UserRow>) -> StoreResult<Option<User>> {
    Ok(row.map(User::try_from).transpose()?)
}

#[async_trait]
impl UserRepo for PgStore {
    async fn create(&self, new: NewUser) -> StoreResult<User> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, name, password_hash, role, is_blocked, created_at, updated_at
            "#,
        )
        .bind(&new.email)
        .bind(&new.name)
        .bind(&new.password_hash)
        .bind(new.role.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(User::try_from(row)?)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_hash, role, is_blocked, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        convert(row)
    }

    async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_hash, role, is_blocked, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        convert(row)
    }

    async fn list(&self) -> StoreResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, email, name, password_hash, role, is_blocked, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows
            .into_iter()
            .map(User::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?)
    }

    async fn set_password(&self, id: Uuid, password_hash: &str) -> StoreResult<bool> {
        let res = sqlx::query(
            r#"UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1"#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }

    async fn set_blocked(&self, id: Uuid, blocked: bool) -> StoreResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            UPDATE users
               SET is_blocked = $2, updated_at = now()
             WHERE id = $1
            RETURNING id, email, name, password_hash, role, is_blocked, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(blocked)
        .fetch_optional(&self.pool)
        .await?;
        convert(row)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
