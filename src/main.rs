mod app;
mod config;
mod error;
mod pages;
mod recipes;
mod state;
mod views;

use crate::config::{AppConfig, AppEnv};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;
    init_tracing(config.env);

    let app_state = AppState::init(config).await?;
    tracing::info!(env = ?app_state.config.env, "recipe store ready");

    let config = app_state.config.clone();
    let app = app::build_app(app_state);
    app::serve(app, &config).await
}

fn init_tracing(env: AppEnv) {
    let default_filter = if env.is_development() {
        "recipebox=debug,axum=info,tower_http=debug,sqlx=info"
    } else {
        "recipebox=info,axum=info,tower_http=info,sqlx=warn"
    };
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
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
}
