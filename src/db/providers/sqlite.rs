use async_trait::async_trait;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr};

use super::registry::{DbProvider, DbProviderId, connect_options};
use crate::config::{DatabaseConfig, Endpoint};

const SQLITE_BUSY_TIMEOUT_MS: u64 = 5_000;

/// SQLite backend. In-memory urls are pinned to a single pooled connection;
/// each new connection to `:memory:` opens a separate empty database.
pub struct SqliteDbProvider;

#[async_trait]
impl DbProvider for SqliteDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::Sqlite
    }

    fn supports_url(&self, url: &str) -> bool {
        url.trim().to_ascii_lowercase().starts_with("sqlite:")
    }

    async fn connect(
        &self,
        endpoint: &Endpoint,
        cfg: &DatabaseConfig,
    ) -> Result<DatabaseConnection, DbErr> {
        let mut options = connect_options(endpoint, cfg);
        if endpoint.url.contains(":memory:") {
            options.max_connections(1).min_connections(1);
        }
        Database::connect(options).await
    }

    async fn post_connect(&self, db: &DatabaseConnection) -> Result<(), DbErr> {
        db.execute_unprepared("PRAGMA foreign_keys = ON").await?;
        db.execute_unprepared(&format!("PRAGMA busy_timeout = {SQLITE_BUSY_TIMEOUT_MS}"))
            .await?;
        Ok(())
    }
}
