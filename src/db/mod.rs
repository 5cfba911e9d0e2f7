//! Storage layer: entities, schema management, seeding, and reports, behind
//! one explicitly opened [`RestaurantDb`] session.

pub mod bootstrap;
pub mod connection;
pub mod entities;
pub mod providers;
pub mod reports;
pub mod schema;
pub mod seed;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::{
    config::{DatabaseConfig, Endpoint},
    error::{RestaurantError, RestaurantResult},
};

pub use providers::{DbProviders, default_registry};
pub use reports::{ReportKind, ReportOptions, ReportSet, Reports};
pub use schema::{TABLES, TableSnapshot};
pub use seed::{SeedData, SeedSummary};

/// A session on one database. Opened once at the start of a run and closed
/// at the end; every operation borrows it.
pub struct RestaurantDb {
    db: DatabaseConnection,
    endpoint: Endpoint,
}

impl RestaurantDb {
    /// Connects to the first reachable endpoint.
    pub async fn open(
        providers: &DbProviders,
        cfg: &DatabaseConfig,
        endpoints: &[Endpoint],
    ) -> RestaurantResult<Self> {
        let (endpoint, db) = connection::connect_first_reachable(providers, cfg, endpoints).await?;
        Ok(Self { db, endpoint })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn create_all(&self) -> RestaurantResult<()> {
        schema::create_all(&self.db).await
    }

    pub async fn drop_all(&self) -> RestaurantResult<()> {
        schema::drop_all(&self.db).await
    }

    pub async fn snapshot(&self) -> RestaurantResult<Vec<TableSnapshot>> {
        schema::snapshot(&self.db).await
    }

    pub async fn seed(&self, data: &SeedData) -> RestaurantResult<SeedSummary> {
        seed::seed(&self.db, data).await
    }

    pub fn reports(&self) -> Reports<'_> {
        Reports::new(&self.db)
    }

    pub async fn close(self) -> RestaurantResult<()> {
        let label = self.endpoint.to_string();
        self.db
            .close()
            .await
            .map_err(|err| RestaurantError::connectivity(label.clone(), err))?;
        info!(endpoint = %label, "database session closed");
        Ok(())
    }
}
