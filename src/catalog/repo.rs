use async_trait::async_trait;
use uuid::Uuid;

use super::repo_types::{NewService, Service, ServiceChanges, ServiceDetails, ServiceDetailsRow};
use crate::{db::PgStore, error::StoreResult};

#[async_trait]
pub trait ServiceRepo: Send + Sync {
    async fn create(&self, new: NewService) -> StoreResult<Service>;
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Service>>;
    async fn find_details(&self, id: Uuid) -> StoreResult<Option<ServiceDetails>>;
    /// Newest first.
    async fn list_details(&self) -> StoreResult<Vec<ServiceDetails>>;
    /// `None` when the id does not resolve.
    async fn update(&self, id: Uuid, changes: ServiceChanges) -> StoreResult<Option<Service>>;
    async fn delete(&self, id: Uuid) -> StoreResult<bool>;
}

#[async_trait]
impl ServiceRepo for PgStore {
    async fn create(&self, new: NewService) -> StoreResult<Service> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            INSERT INTO services (title, description, price, category_id, duration)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, title, description, price, category_id, duration, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.price)
        .bind(new.category_id)
        .bind(new.duration)
        .fetch_one(&self.pool)
        .await?;
        Ok(service)
    }

    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Service>> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            SELECT id, title, description, price, category_id, duration, is_active,
                   created_at, updated_at
            FROM services
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(service)
    }

    async fn find_details(&self, id: Uuid) -> StoreResult<Option<ServiceDetails>> {
        let row = sqlx::query_as::<_, ServiceDetailsRow>(
            r#"
            SELECT s.id, s.title, s.description, s.price, s.category_id,
                   c.name AS category_name, s.duration, s.is_active,
                   s.created_at, s.updated_at
              FROM services s
              LEFT JOIN categories c ON c.id = s.category_id
             WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(ServiceDetails::from))
    }

    async fn list_details(&self) -> StoreResult<Vec<ServiceDetails>> {
        let rows = sqlx::query_as::<_, ServiceDetailsRow>(
            r#"
            SELECT s.id, s.title, s.description, s.price, s.category_id,
                   c.name AS category_name, s.duration, s.is_active,
                   s.created_at, s.updated_at
              FROM services s
              LEFT JOIN categories c ON c.id = s.category_id
             ORDER BY s.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(ServiceDetails::from).collect())
    }

    async fn update(&self, id: Uuid, changes: ServiceChanges) -> StoreResult<Option<Service>> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            UPDATE services
               SET title = COALESCE($2, title),
                   description = COALESCE($3, description),
                   price = COALESCE($4, price),
                   category_id = COALESCE($5, category_id),
                   duration = COALESCE($6, duration),
                   is_active = COALESCE($7, is_active),
                   updated_at = now()
             WHERE id = $1
            RETURNING id, title, description, price, category_id, duration, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(changes.category_id)
        .bind(changes.duration)
        .bind(changes.is_active)
        .fetch_optional(&self.pool)
        .await?;
        Ok(service)
    }

    async fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query(r#"DELETE FROM services WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
