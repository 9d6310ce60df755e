use anyhow::Context;
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::{config::AuthConfig, db::dao::DaoContext, services::ServiceContext};

/// Startup seeding: the priority levels and the superuser account. Safe to
/// run on every start; existing rows are left alone.
pub async fn run(db: &DatabaseConnection, auth: &AuthConfig) -> anyhow::Result<()> {
    let inserted = DaoContext::new(db)
        .priority()
        .ensure_seeded()
        .await
        .context("failed to seed task priorities")?;
    info!(inserted, "task priorities seeded");

    let created = ServiceContext::new(db)
        .user()
        .ensure_superuser(&auth.superuser_username, &auth.superuser_password)
        .await
        .context("failed to seed superuser")?;
    if created {
        info!(username = %auth.superuser_username, "superuser created");
    }
    Ok(())
}
