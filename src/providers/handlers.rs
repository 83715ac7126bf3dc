use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::{
    dto::{ApplyProviderRequest, SelectServicesRequest, UpdateProviderRequest, VerificationRequest},
    repo_types::VerificationStatus,
    services,
};
use crate::{
    auth::{AdminUser, CurrentUser, ProviderUser},
    error::AppResult,
    extract::JsonBody,
    state::AppState,
    validation::parse_id,
};

pub fn provider_routes() -> Router<AppState> {
    Router::new()
        .route("/provider/apply", post(apply))
        .route("/provider/myProfile", get(my_profile))
        .route("/provider/update", put(update_profile))
        .route("/provider/add-services", put(select_services))
}

pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/provider/verification/:providerId", put(verify))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn apply(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(payload): JsonBody<ApplyProviderRequest>,
) -> AppResult<(StatusCode, Json<Value>)> {
    let provider = services::apply_as_provider(&state, user.id, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "msg": "Provider Application Submitted Successfully", "provider": provider })),
    ))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn my_profile(State(state): State<AppState>, CurrentUser(user): CurrentUser) -> AppResult<Json<Value>> {
    let provider = services::get_my_provider_profile(&state, user.id).await?;
    Ok(Json(json!({ "msg": "Provider Profile Fetched Successfully", "provider": provider })))
}

#[instrument(skip(state, user, payload), fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(payload): JsonBody<UpdateProviderRequest>,
) -> AppResult<Json<Value>> {
    let provider = services::update_provider_profile(&state, user.id, payload).await?;
    Ok(Json(json!({ "msg": "Provider Profile Updated Successfully", "provider": provider })))
}

#[instrument(skip(state, admin, payload), fields(admin_id = %admin.id))]
pub async fn verify(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(provider_id): Path<String>,
    JsonBody(payload): JsonBody<VerificationRequest>,
) -> AppResult<Json<Value>> {
    let action = services::verification_action(&payload)?;
    let provider_id = parse_id(&provider_id, "Provider")?;
    let status = services::approve_provider(&state, provider_id, action).await?;
    let msg = match status {
        VerificationStatus::Approved => "Provider approved successfully",
        _ => "Provider rejected successfully",
    };
    Ok(Json(json!({ "msg": msg })))
}

#[instrument(skip_all)]
pub async fn select_services(
    State(state): State<AppState>,
    ProviderUser(user): ProviderUser,
    JsonBody(payload): JsonBody<SelectServicesRequest>,
) -> AppResult<Json<Value>> {
    let provider = services::select_provider_services(&state, user.id, payload).await?;
    Ok(Json(json!({ "msg": "Services Selected Successfully", "provider": provider })))
}
