use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::{
    dto::{CreateCategoryRequest, UpdateCategoryRequest},
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
        .route("/allCategories", get(list_categories))
        .route("/getCategory/:id", get(get_category))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/categories/add", post(create_category))
        .route("/categories/:id", put(update_category).delete(delete_category))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.id))]
pub async fn create_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    JsonBody(payload): JsonBody<CreateCategoryRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let category = services::create_category(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "Category Created Successfully", "category": category })),
    ))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.id))]
pub async fn update_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    payload: Result<JsonBody<UpdateCategoryRequest>, AppError>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id, "Category")?;
    let JsonBody(payload) = payload?;
    let category = services::update_category(&state, id, payload).await?;
    Ok(Json(json!({ "msg": "Category Updated Successfully", "category": category })))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> AppResult<Json<Value>> {
    let id = parse_id(&id, "Category")?;
    services::delete_category(&state, id).await?;
    Ok(Json(json!({ "msg": "Category Deleted Successfully" })))
}

#[instrument(skip(state))]
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let categories = services::list_categories(&state).await?;
    Ok(Json(json!({ "msg": "Categories Fetched Successfully", "categories": categories })))
}

#[instrument(skip(state))]
pub async fn get_category(State(state): State<AppState>, Path(id): Path<String>) -> AppResult<Json<Value>> {
    let id = parse_id(&id, "Category")?;
    let category = services::get_category(&state, id).await?;
    Ok(Json(json!({ "msg": "Category Fetched Successfully", "category": category })))
}
