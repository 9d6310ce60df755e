use std::sync::Arc;

use axum::Router;

use crate::{
    config::AppConfig,
    db::{connection, seed},
    routes::app,
    state::AppState,
};

pub const TEST_SECRET: &str = "test-secret-key";
pub const TEST_ADMIN_USERNAME: &str = "admin";
pub const TEST_ADMIN_PASSWORD: &str = "adminpassword";

/// Defaults pointed at a private in-memory SQLite database. A single pooled
/// connection keeps every query on the same database. Admission control is
/// off unless a test turns it on.
pub fn test_config() -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.database.url = "sqlite::memory:".to_string();
    cfg.database.max_connections = 1;
    cfg.database.min_idle = 1;
    cfg.auth.secret_key = TEST_SECRET.to_string();
    cfg.auth.superuser_username = TEST_ADMIN_USERNAME.to_string();
    cfg.auth.superuser_password = TEST_ADMIN_PASSWORD.to_string();
    cfg.rate_limit.requests_per_minute = 0;
    cfg
}

/// Connects, syncs the schema and runs startup seeding.
pub async fn test_state_with(cfg: AppConfig) -> anyhow::Result<Arc<AppState>> {
    let db = connection::connect(&cfg.database).await?;
    seed::run(&db, &cfg.auth).await?;
    Ok(AppState::new(cfg, db))
}

pub async fn test_state() -> anyhow::Result<Arc<AppState>> {
    test_state_with(test_config()).await
}

pub async fn test_app() -> anyhow::Result<(Router, Arc<AppState>)> {
    let state = test_state().await?;
    Ok((app(Arc::clone(&state)), state))
}
