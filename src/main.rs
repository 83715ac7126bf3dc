mod app;
mod auth;
mod catalog;
mod categories;
mod config;
mod db;
mod error;
mod extract;
#[cfg(test)]
mod memory;
mod providers;
mod state;
mod users;
mod validation;

use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "skillserve=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = state::AppState::init().await?;

    if let Some(admin) = &state.config.admin {
        users::services::seed_admin(&state, admin)
            .await
            .context("seed admin account")?;
    }

    app::serve(app::build_app(state)).await
}
