use anyhow::{Result, bail};
use axum::http::Method;

use super::{AppConfig, defaults};

const MIN_SUPERUSER_PASSWORD_LEN: usize = 8;

/// Checks the whole config and reports every problem at once.
pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    if cfg.database.url.trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    }

    if cfg.database.min_idle > cfg.database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            cfg.database.min_idle, cfg.database.max_connections
        ));
    }

    let auth = &cfg.auth;
    if auth.secret_key.trim().is_empty() {
        errors.push("auth.secret_key must not be empty".to_string());
    } else if !cfg!(debug_assertions) && auth.secret_key == defaults::DEFAULT_SECRET_KEY {
        errors.push("auth.secret_key must be set in release builds".to_string());
    }

    if auth.token_ttl_minutes == Some(0) {
        errors.push("auth.token_ttl_minutes must be > 0".to_string());
    }

    if auth.superuser_username.trim().is_empty() {
        errors.push("auth.superuser_username must not be empty".to_string());
    }

    if auth.superuser_password.len() < MIN_SUPERUSER_PASSWORD_LEN {
        errors.push(format!(
            "auth.superuser_password must be at least {MIN_SUPERUSER_PASSWORD_LEN} characters"
        ));
    }

    for method in &cfg.cors.methods {
        if Method::from_bytes(method.trim().as_bytes()).is_err() {
            errors.push(format!("cors.methods contains an invalid method: {method}"));
        }
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}

#[cfg(test)]
mod tests {
    use super::validate;
    use crate::config::AppConfig;

    #[test]
    fn default_config_is_valid_in_debug_builds() {
        validate(&AppConfig::default()).expect("defaults should validate");
    }

    #[test]
    fn collects_every_problem() {
        let mut cfg = AppConfig::default();
        cfg.general.host = " ".to_string();
        cfg.database.min_idle = 50;
        cfg.auth.superuser_password = "short".to_string();
        cfg.auth.token_ttl_minutes = Some(0);

        let message = validate(&cfg).expect_err("config should be rejected").to_string();
        assert!(message.contains("general.host"), "{message}");
        assert!(message.contains("database.min_idle"), "{message}");
        assert!(message.contains("superuser_password"), "{message}");
        assert!(message.contains("token_ttl_minutes"), "{message}");
    }
}
