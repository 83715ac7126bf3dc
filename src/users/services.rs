use axum::extract::FromRef;
use tracing::{info, warn};
use uuid::Uuid;

use super::{
    dto::{AuthResponse, ChangePasswordRequest, LoginRequest, RefreshRequest, SignupRequest},
    repo_types::{NewUser, Role, User},
};
use crate::{
    auth::{password, tokens::TokenKind, JwtKeys},
    config::AdminSeed,
    error::{AppError, AppResult, StoreError},
    state::AppState,
    validation::{is_valid, is_valid_email, is_valid_name},
};

fn issue_tokens(st: &AppState, user: User, msg: &'static str) -> AppResult<AuthResponse> {
    let pair = JwtKeys::from_ref(st).issue(user.id)?;
    Ok(AuthResponse {
        msg,
        access_token: pair.access,
        refresh_token: pair.refresh,
        user,
    })
}

pub async fn signup(st: &AppState, req: SignupRequest) -> AppResult<AuthResponse> {
    let email = req
        .email
        .filter(|e| is_valid(Some(e)))
        .map(|e| e.trim().to_lowercase())
        .ok_or_else(|| AppError::validation("Email is Required"))?;
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid Email"));
    }

    let name = req
        .name
        .filter(|n| is_valid(Some(n)))
        .ok_or_else(|| AppError::validation("Name is Required"))?;
    if !is_valid_name(&name) {
        return Err(AppError::validation("Invalid Name"));
    }

    let password = req.password.unwrap_or_default();
    password::check_strength(&password)?;

    let password_hash = password::hash(&password)?;
    let user = match st
        .users
        .create(NewUser {
            email,
            name: name.trim().to_string(),
            password_hash,
            role: Role::User,
        })
        .await
    {
        Ok(u) => u,
        Err(StoreError::Duplicate) => return Err(AppError::conflict("Email already registered")),
        Err(e) => return Err(e.into()),
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    issue_tokens(st, user, "User Registered Successfully")
}

pub async fn login(st: &AppState, req: LoginRequest) -> AppResult<AuthResponse> {
    let email = req.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::validation("Invalid Email"));
    }

    let Some(user) = st.users.find_by_email(&email).await? else {
        warn!(%email, "login unknown email");
        return Err(AppError::unauthorized("Invalid credentials"));
    };

    if !password::verify(&req.password, &user.password_hash)? {
        warn!(%email, user_id = %user.id, "login invalid password");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    if user.is_blocked {
        warn!(user_id = %user.id, "blocked user login");
        return Err(AppError::forbidden("User is Blocked"));
    }

    info!(user_id = %user.id, "user logged in");
    issue_tokens(st, user, "Login Successful")
}

pub async fn refresh(st: &AppState, req: RefreshRequest) -> AppResult<AuthResponse> {
    let claims = JwtKeys::from_ref(st)
        .verify(&req.refresh_token, TokenKind::Refresh)
        .map_err(|e| AppError::unauthorized(e.to_string()))?;
    let user = st
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| AppError::unauthorized("User Not Found"))?;
    if user.is_blocked {
        return Err(AppError::forbidden("User is Blocked"));
    }
    issue_tokens(st, user, "Token Refreshed")
}

pub async fn change_password(st: &AppState, user: &User, req: ChangePasswordRequest) -> AppResult<()> {
    if !password::verify(&req.old_password, &user.password_hash)? {
        return Err(AppError::unauthorized("Old Password is Incorrect"));
    }
    password::check_strength(&req.new_password)?;
    let hash = password::hash(&req.new_password)?;
    if !st.users.set_password(user.id, &hash).await? {
        return Err(AppError::not_found("User Not Found"));
    }
    info!(user_id = %user.id, "password changed");
    Ok(())
}

pub async fn list_users(st: &AppState) -> AppResult<Vec<User>> {
    let users = st.users.list().await?;
    if users.is_empty() {
        return Err(AppError::not_found("No Users Found"));
    }
    Ok(users)
}

pub async fn delete_user(st: &AppState, user_id: Uuid) -> AppResult<()> {
    if !st.users.delete(user_id).await? {
        return Err(AppError::not_found("User Not Found"));
    }
    info!(%user_id, "user deleted");
    Ok(())
}

pub async fn set_blocked(st: &AppState, user_id: Uuid, blocked: bool) -> AppResult<User> {
    let user = st
        .users
        .set_blocked(user_id, blocked)
        .await?
        .ok_or_else(|| AppError::not_found("User Not Found"))?;
    info!(%user_id, blocked, "user block flag changed");
    Ok(user)
}

/// Creates the bootstrap admin unless an account with that email exists.
pub async fn seed_admin(st: &AppState, seed: &AdminSeed) -> anyhow::Result<()> {
    let email = seed.email.trim().to_lowercase();
    if st.users.find_by_email(&email).await.map_err(anyhow_store)?.is_some() {
        return Ok(());
    }
    let user = st
        .users
        .create(NewUser {
            email,
            name: "Administrator".into(),
            password_hash: password::hash(&seed.password)?,
            role: Role::Admin,
        })
        .await
        .map_err(anyhow_store)?;
    info!(user_id = %user.id, "admin account seeded");
    Ok(())
}

fn anyhow_store(e: StoreError) -> anyhow::Error {
    match e {
        StoreError::Backend(e) => e,
        other => anyhow::anyhow!(other),
    }
}
