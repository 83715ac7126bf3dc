use anyhow::Context;
use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

use super::repo_types::{NewProvider, Provider, ProviderChanges, ProviderRow, VerificationStatus};
use crate::{db::PgStore, error::StoreResult, users::repo_types::Role};

#[async_trait]
pub trait ProviderRepo: Send + Sync {
    /// Inserts a `pending` application; `None` when the user already has one.
    async fn create_if_absent(&self, new: NewProvider) -> StoreResult<Option<Provider>>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Provider>>;
    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<Provider>>;
    async fn update_profile(&self, user_id: Uuid, changes: ProviderChanges) -> StoreResult<Option<Provider>>;
    /// Replaces the whole offered-services list.
    async fn set_services(&self, id: Uuid, services: &[Uuid]) -> StoreResult<Option<Provider>>;
    /// Writes the verification state and the owner's role as one unit.
    async fn set_verification(
        &self,
        id: Uuid,
        status: VerificationStatus,
        owner_role: Role,
    ) -> StoreResult<Option<Provider>>;
}

fn convert(row: Option<ProviderRow>) -> StoreResult<Option<Provider>> {
    Ok(row.map(Provider::try_from).transpose()?)
}

#[async_trait]
impl ProviderRepo for PgStore {
    async fn create_if_absent(&self, new: NewProvider) -> StoreResult<Option<Provider>> {
        let row = sqlx::query_as::<_, ProviderRow>(
            r#"
            INSERT INTO providers (user_id, profession, experience, bio, location,
                                   services_offered, available_slots)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING id, user_id, profession, experience, bio, location, services_offered,
                      available_slots, verification_status, is_approved, created_at, updated_at
            "#,
        )
        .bind(new.user_id)
        .bind(&new.profession)
        .bind(new.experience)
        .bind(&new.bio)
        .bind(&new.location)
        .bind(&new.services_offered)
        .bind(Json(&new.available_slots))
        .fetch_optional(&self.pool)
        .await?;
        convert(row)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Provider>> {
        let row = sqlx::query_as::<_, ProviderRow>(
            r#"
            SELECT id, user_id, profession, experience, bio, location, services_offered,
                   available_slots, verification_status, is_approved, created_at, updated_at
            FROM providers
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        convert(row)
    }

    async fn find_by_user(&self, user_id: Uuid) -> StoreResult<Option<Provider>> {
        let row = sqlx::query_as::<_, ProviderRow>(
            r#"
            SELECT id, user_id, profession, experience, bio, location, services_offered,
                   available_slots, verification_status, is_approved, created_at, updated_at
            FROM providers
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        convert(row)
    }

    async fn update_profile(&self, user_id: Uuid, changes: ProviderChanges) -> StoreResult<Option<Provider>> {
        let row = sqlx::query_as::<_, ProviderRow>(
            r#"
            UPDATE providers
               SET profession = COALESCE($2, profession),
                   experience = COALESCE($3, experience),
                   bio = COALESCE($4, bio),
                   location = COALESCE($5, location),
                   available_slots = COALESCE($6, available_slots),
                   updated_at = now()
             WHERE user_id = $1
            RETURNING id, user_id, profession, experience, bio, location, services_offered,
                      available_slots, verification_status, is_approved, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&changes.profession)
        .bind(changes.experience)
        .bind(&changes.bio)
        .bind(&changes.location)
        .bind(changes.available_slots.as_ref().map(Json))
        .fetch_optional(&self.pool)
        .await?;
        convert(row)
    }

    async fn set_services(&self, id: Uuid, services: &[Uuid]) -> StoreResult<Option<Provider>> {
        let row = sqlx::query_as::<_, ProviderRow>(
            r#"
            UPDATE providers
               SET services_offered = $2, updated_at = now()
             WHERE id = $1
            RETURNING id, user_id, profession, experience, bio, location, services_offered,
                      available_slots, verification_status, is_approved, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(services)
        .fetch_optional(&self.pool)
        .await?;
        convert(row)
    }

    async fn set_verification(
        &self,
        id: Uuid,
        status: VerificationStatus,
        owner_role: Role,
    ) -> StoreResult<Option<Provider>> {
        let mut tx = self.pool.begin().await.context("begin tx")?;

        let row = sqlx::query_as::<_, ProviderRow>(
            r#"
            UPDATE providers
               SET verification_status = $2, is_approved = $3, updated_at = now()
             WHERE id = $1
            RETURNING id, user_id, profession, experience, bio, location, services_offered,
                      available_slots, verification_status, is_approved, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(status == VerificationStatus::Approved)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            tx.rollback().await.context("rollback tx")?;
            return Ok(None);
        };

        sqlx::query(r#"UPDATE users SET role = $2, updated_at = now() WHERE id = $1"#)
            .bind(row.user_id)
            .bind(owner_role.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await.context("commit tx")?;
        convert(Some(row))
    }
}
