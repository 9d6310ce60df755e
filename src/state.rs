use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    auth::JwtKeys,
    config::AppConfig,
    middleware::admission::{AdmissionControl, FixedWindowLimiter},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub db: DatabaseConnection,
    pub jwt: JwtKeys,
    /// Gate consulted before identity resolution; `None` admits everything.
    pub admission: Option<Arc<dyn AdmissionControl>>,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Arc<Self> {
        let admission = FixedWindowLimiter::per_minute(config.rate_limit.requests_per_minute)
            .map(|limiter| Arc::new(limiter) as Arc<dyn AdmissionControl>);
        Self::with_admission(config, db, admission)
    }

    pub fn with_admission(
        config: AppConfig,
        db: DatabaseConnection,
        admission: Option<Arc<dyn AdmissionControl>>,
    ) -> Arc<Self> {
        let jwt = JwtKeys::from_secret(config.auth.secret_key.as_bytes());
        Arc::new(Self {
            config,
            db,
            jwt,
            admission,
        })
    }
}
