use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::{
    dto::{AuthResponse, BlockRequest, ChangePasswordRequest, LoginRequest, RefreshRequest, SignupRequest},
    services,
};
use crate::{
    auth::{AdminUser, CurrentUser},
    error::{AppError, AppResult},
    extract::JsonBody,
    state::AppState,
    validation::parse_id,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/change-password", put(change_password))
        .route("/deleteProfile", delete(delete_profile))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/allUsers", get(list_users))
        .route("/user/:userId", delete(delete_user))
        .route("/user/block/:userId", put(block_user))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<SignupRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let res = services::signup(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(res)))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(services::login(&state, payload).await?))
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    Ok(Json(services::refresh(&state, payload).await?))
}

#[instrument(skip_all)]
pub async fn get_profile(CurrentUser(user): CurrentUser) -> Json<Value> {
    Json(json!({ "msg": "User Profile", "user": user }))
}

#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(payload): JsonBody<ChangePasswordRequest>,
) -> AppResult<Json<Value>> {
    services::change_password(&state, &user, payload).await?;
    Ok(Json(json!({ "msg": "Password Changed Successfully" })))
}

#[instrument(skip_all)]
pub async fn delete_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Value>> {
    services::delete_user(&state, user.id).await?;
    Ok(Json(json!({ "msg": "User Deleted Successfully" })))
}

#[instrument(skip_all, fields(admin_id = %admin.id))]
pub async fn list_users(State(state): State<AppState>, AdminUser(admin): AdminUser) -> AppResult<Json<Value>> {
    let users = services::list_users(&state).await?;
    Ok(Json(json!({ "msg": "Users Fetched Successfully", "users": users })))
}

#[instrument(skip(state, admin), fields(admin_id = %admin.id))]
pub async fn delete_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<String>,
) -> AppResult<Json<Value>> {
    let user_id = parse_id(&user_id, "User")?;
    services::delete_user(&state, user_id).await?;
    Ok(Json(json!({ "msg": "User Deleted Successfully" })))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.id))]
pub async fn block_user(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<String>,
    payload: Result<JsonBody<BlockRequest>, AppError>,
) -> AppResult<Json<Value>> {
    let user_id = parse_id(&user_id, "User")?;
    let JsonBody(payload) = payload?;
    let user = services::set_blocked(&state, user_id, payload.is_blocked).await?;
    let msg = if user.is_blocked {
        "User Blocked Successfully"
    } else {
        "User Unblocked Successfully"
    };
    Ok(Json(json!({ "msg": msg, "user": user })))
}
