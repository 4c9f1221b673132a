#![recursion_limit = "256"]

mod analysis;
mod app;
mod config;
mod error;
mod inference;
mod standards;
mod state;

use crate::{app::build_app, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "carb_advisor=debug,axum=info,tower_http=info".to_string());
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

    let config = AppConfig::from_env()?;
    if config.gemini_api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; /api/analyze will return 500");
    }
    tracing::info!(config = ?config, "configuration loaded");

    let state = AppState::init(config);
    let router = build_app(state.clone())?;
    app::serve(router, &state.config).await
}
