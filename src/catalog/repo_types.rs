use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A bookable service as stored.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    #[serde(rename = "category")]
    pub category_id: Uuid,
    pub duration: i32, // minutes
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Service joined with the name of its category.
#[derive(Debug, FromRow)]
pub struct ServiceDetailsRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Uuid,
    pub category_name: Option<String>,
    pub duration: i32,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub name: Option<String>, // None once the category is deleted
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetails {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub category: CategoryRef,
    pub duration: i32,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<ServiceDetailsRow> for ServiceDetails {
    fn from(r: ServiceDetailsRow) -> Self {
        Self {
            id: r.id,
            title: r.title,
            description: r.description,
            price: r.price,
            category: CategoryRef {
                id: r.category_id,
                name: r.category_name,
            },
            duration: r.duration,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewService {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Uuid,
    pub duration: i32,
}

/// Fields to overwrite; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ServiceChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<Uuid>,
    pub duration: Option<i32>,
    pub is_active: Option<bool>,
}
