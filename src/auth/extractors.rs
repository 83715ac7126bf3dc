use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use super::tokens::{JwtKeys, TokenKind};
use crate::{
    error::AppError,
    state::AppState,
    users::repo_types::{Role, User},
};

/// Extracts and validates the bearer JWT, returning the user ID.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header"))?;

        let claims = keys.verify(token, TokenKind::Access).map_err(|e| {
            warn!(error = %e, "bearer token rejected");
            AppError::unauthorized(e.to_string())
        })?;

        Ok(AuthUser(claims.sub))
    }
}

/// Loads the caller and checks the blocked flag and, when given, the role.
pub async fn authorize(state: &AppState, user_id: Uuid, required: Option<Role>) -> Result<User, AppError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::unauthorized("User Not Found"))?;

    if user.is_blocked {
        warn!(%user_id, "blocked user rejected");
        return Err(AppError::forbidden("User is Blocked"));
    }

    if let Some(role) = required {
        if user.role != role {
            warn!(%user_id, have = %user.role, need = %role, "role check failed");
            return Err(AppError::forbidden(format!("Access Denied !!! {role} only")));
        }
    }

    Ok(user)
}

/// Any authenticated, non-blocked user.
pub struct CurrentUser(pub User);

/// Caller holding the `admin` role.
pub struct AdminUser(pub User);

/// Caller holding the `provider` role.
pub struct ProviderUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;
        authorize(state, user_id, None).await.map(CurrentUser)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;
        authorize(state, user_id, Some(Role::Admin)).await.map(AdminUser)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for ProviderUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user_id) = AuthUser::from_request_parts(parts, state).await?;
        authorize(state, user_id, Some(Role::Provider)).await.map(ProviderUser)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::repo_types::NewUser;

    async fn seed(state: &AppState, role: Role, blocked: bool) -> User {
        let user = state
            .users
            .create(NewUser {
                email: format!("{}@example.com", Uuid::new_v4()),
                name: "Test User".into(),
                password_hash: "x".into(),
                role,
            })
            .await
            .unwrap();
        if blocked {
            state.users.set_blocked(user.id, true).await.unwrap().unwrap()
        } else {
            user
        }
    }

    #[tokio::test]
    async fn role_gate() {
        let state = AppState::fake();
        let admin = seed(&state, Role::Admin, false).await;
        let user = seed(&state, Role::User, false).await;

        assert!(authorize(&state, admin.id, Some(Role::Admin)).await.is_ok());
        let err = authorize(&state, user.id, Some(Role::Admin)).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(authorize(&state, user.id, None).await.is_ok());
    }

    #[tokio::test]
    async fn blocked_and_missing_users() {
        let state = AppState::fake();
        let blocked = seed(&state, Role::Admin, true).await;
        let err = authorize(&state, blocked.id, None).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = authorize(&state, Uuid::new_v4(), None).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
