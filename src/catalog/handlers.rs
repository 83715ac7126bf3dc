use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::{
    dto::{CreateServiceRequest, UpdateServiceRequest},
    services,
};
use crate::{
    auth::AdminUser,
    error::{AppError, AppResult},
    extract::JsonBody,
    state::AppState,
    validation::parse_id,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/getAllServices", get(list_services))
        .route("/getService/:id", get(get_service))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/service", post(create_service))
        .route("/admin/update-service/:id", put(update_service))
        .route("/admin/delete-service/:id", delete(delete_service))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.id))]
pub async fn create_service(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    JsonBody(payload): JsonBody<CreateServiceRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let service = services::create_service(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "Service Created Successfully", "service": service })),
    ))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.id))]
pub async fn update_service(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    payload: Result<JsonBody<UpdateServiceRequest>, AppError>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id, "Service")?;
    let JsonBody(payload) = payload?;
    let service = services::update_service(&state, id, payload).await?;
    Ok(Json(json!({ "msg": "Service Updated Successfully", "service": service })))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete_service(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id, "Service")?;
    services::delete_service(&state, id).await?;
    Ok(Json(json!({ "msg": "Service Deleted Successfully" })))
}

#[instrument(skip(state))]
pub async fn list_services(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let services = services::list_services(&state).await?;
    Ok(Json(json!({ "msg": "Services Fetched Successfully", "services": services })))
}

#[instrument(skip(state))]
pub async fn get_service(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    let id = parse_id(&id, "Service")?;
    let service = services::get_service(&state, id).await?;
    Ok(Json(json!({ "msg": "Service Fetched Successfully", "service": service })))
}
