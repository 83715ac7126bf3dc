use tracing::info;
use uuid::Uuid;

use super::{
    dto::{CreateServiceRequest, UpdateServiceRequest},
    repo_types::{NewService, Service, ServiceChanges, ServiceDetails},
};
use crate::{
    error::{AppError, AppResult},
    state::AppState,
    validation::{is_valid, parse_id},
};

const MIN_DURATION_MINUTES: i32 = 15;

async fn existing_category(st: &AppState, raw: &str) -> AppResult<Uuid> {
    let id = parse_id(raw, "Category")?;
    if st.categories.find_by_id(id).await?.is_none() {
        return Err(AppError::not_found("Category Not Found"));
    }
    Ok(id)
}

fn checked_price(price: f64) -> AppResult<f64> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::validation("Valid Price is Required"));
    }
    Ok(price)
}

fn checked_duration(duration: i32) -> AppResult<i32> {
    if duration < MIN_DURATION_MINUTES {
        return Err(AppError::validation("Invalid Duration"));
    }
    Ok(duration)
}

pub async fn create_service(st: &AppState, req: CreateServiceRequest) -> AppResult<Service> {
    let title = req
        .title
        .filter(|t| is_valid(Some(t)))
        .ok_or_else(|| AppError::validation("Title is required"))?;
    let price = req
        .price
        .ok_or_else(|| AppError::validation("Valid Price is Required"))
        .and_then(checked_price)?;
    let category_id = existing_category(st, req.category.as_deref().unwrap_or_default()).await?;
    let duration = req
        .duration
        .ok_or_else(|| AppError::validation("Invalid Duration"))
        .and_then(checked_duration)?;

    let service = st
        .services
        .create(NewService {
            title: title.trim().to_string(),
            description: req.description,
            price,
            category_id,
            duration,
        })
        .await?;
    info!(service_id = %service.id, title = %service.title, "service created");
    Ok(service)
}

/// Applies the supplied fields. `isActive: true` in the payload flips the
/// stored flag to `false`; `false` or absence leaves it unchanged.
pub async fn update_service(st: &AppState, id: Uuid, req: UpdateServiceRequest) -> AppResult<Service> {
    let mut changes = ServiceChanges::default();

    if let Some(title) = req.title.filter(|t| is_valid(Some(t))) {
        changes.title = Some(title.trim().to_string());
    }
    if let Some(description) = req.description.filter(|d| is_valid(Some(d))) {
        changes.description = Some(description);
    }
    if let Some(price) = req.price {
        changes.price = Some(checked_price(price)?);
    }
    if let Some(duration) = req.duration {
        changes.duration = Some(checked_duration(duration)?);
    }
    if let Some(category) = req.category.filter(|c| is_valid(Some(c))) {
        changes.category_id = Some(existing_category(st, &category).await?);
    }
    if req.is_active == Some(true) {
        changes.is_active = Some(false);
    }

    let service = st
        .services
        .update(id, changes)
        .await?
        .ok_or_else(|| AppError::not_found("Service Not Found"))?;
    info!(service_id = %id, is_active = service.is_active, "service updated");
    Ok(service)
}

pub async fn delete_service(st: &AppState, id: Uuid) -> AppResult<()> {
    if !st.services.delete(id).await? {
        return Err(AppError::not_found("Service Not Found"));
    }
    info!(service_id = %id, "service deleted");
    Ok(())
}

pub async fn list_services(st: &AppState) -> AppResult<Vec<ServiceDetails>> {
    let services = st.services.list_details().await?;
    if services.is_empty() {
        return Err(AppError::not_found("No Services Found"));
    }
    Ok(services)
}

pub async fn get_service(st: &AppState, id: Uuid) -> AppResult<ServiceDetails> {
    st.services
        .find_details(id)
        .await?
        .ok_or_else(|| AppError::not_found("Service Not Found"))
}
