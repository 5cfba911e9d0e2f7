use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection, DbErr};
use tracing::info;

use super::registry::{DbProvider, DbProviderId, connect_options};
use crate::{
    config::{DatabaseConfig, Endpoint},
    db::bootstrap,
    error::RestaurantResult,
};

pub struct PostgresDbProvider;

#[async_trait]
impl DbProvider for PostgresDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::Postgres
    }

    fn supports_url(&self, url: &str) -> bool {
        let normalized = url.trim().to_ascii_lowercase();
        normalized.starts_with("postgres://") || normalized.starts_with("postgresql://")
    }

    /// Creates the target database when it is missing. Only a freshly created
    /// database warrants a retry.
    async fn recover(&self, endpoint: &Endpoint, cfg: &DatabaseConfig) -> RestaurantResult<bool> {
        if !cfg.bootstrap {
            return Ok(false);
        }
        let created = bootstrap::ensure_database(endpoint, cfg).await?;
        if created {
            info!(endpoint = %endpoint, "created database");
        }
        Ok(created)
    }

    async fn connect(
        &self,
        endpoint: &Endpoint,
        cfg: &DatabaseConfig,
    ) -> Result<DatabaseConnection, DbErr> {
        Database::connect(connect_options(endpoint, cfg)).await
    }
}
