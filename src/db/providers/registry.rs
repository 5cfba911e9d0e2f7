use std::{collections::HashMap, sync::Arc, time::Duration};

use anyhow::{Result, bail};
use async_trait::async_trait;
use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};

use crate::{
    config::{DatabaseConfig, Endpoint, endpoints::redact_url},
    error::{RestaurantError, RestaurantResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbProviderId {
    Postgres,
    Sqlite,
}

impl DbProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            DbProviderId::Postgres => "postgres",
            DbProviderId::Sqlite => "sqlite",
        }
    }
}

/// One storage backend. `connect` and `post_connect` failures skip the
/// endpoint. `recover` runs after a failed connect and returns `true` when it
/// changed something that makes one more attempt worthwhile.
#[async_trait]
pub trait DbProvider: Send + Sync {
    fn id(&self) -> DbProviderId;
    fn supports_url(&self, url: &str) -> bool;
    async fn recover(&self, _endpoint: &Endpoint, _cfg: &DatabaseConfig) -> RestaurantResult<bool> {
        Ok(false)
    }
    async fn connect(
        &self,
        endpoint: &Endpoint,
        cfg: &DatabaseConfig,
    ) -> Result<DatabaseConnection, DbErr>;
    async fn post_connect(&self, _db: &DatabaseConnection) -> Result<(), DbErr> {
        Ok(())
    }
}

pub(super) fn connect_options(endpoint: &Endpoint, cfg: &DatabaseConfig) -> ConnectOptions {
    let mut options = ConnectOptions::new(endpoint.url.clone());
    options
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_idle)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .sqlx_logging(false);
    options
}

pub struct DbProviders {
    providers: HashMap<DbProviderId, Arc<dyn DbProvider>>,
}

impl DbProviders {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn DbProvider>) -> Result<Self> {
        self.add(provider)?;
        Ok(self)
    }

    pub fn add(&mut self, provider: Arc<dyn DbProvider>) -> Result<()> {
        let id = provider.id();
        if self.providers.contains_key(&id) {
            bail!("database provider already registered: {}", id.as_str());
        }
        self.providers.insert(id, provider);
        Ok(())
    }

    pub fn provider_for_url(&self, url: &str) -> RestaurantResult<Arc<dyn DbProvider>> {
        self.providers
            .values()
            .find(|provider| provider.supports_url(url))
            .cloned()
            .ok_or_else(|| RestaurantError::UnsupportedUrl {
                url: redact_url(url),
            })
    }
}

impl Default for DbProviders {
    fn default() -> Self {
        Self::new()
    }
}
