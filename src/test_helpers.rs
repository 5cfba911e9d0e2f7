use crate::{
    config::{DatabaseConfig, Endpoint},
    db::{RestaurantDb, default_registry},
};

pub const MEMORY_URL: &str = "sqlite::memory:";

/// A fresh, empty in-memory SQLite session with foreign keys enforced.
pub async fn memory_db() -> RestaurantDb {
    let providers = default_registry().expect("build provider registry");
    let cfg = DatabaseConfig {
        url: Some(MEMORY_URL.to_string()),
        max_connections: 1,
        min_idle: 1,
        bootstrap: false,
        fallback_profiles: false,
        ..DatabaseConfig::default()
    };
    RestaurantDb::open(&providers, &cfg, &[Endpoint::new("test", MEMORY_URL)])
        .await
        .expect("open in-memory database")
}

/// [`memory_db`] with the schema already created.
pub async fn memory_db_with_schema() -> RestaurantDb {
    let db = memory_db().await;
    db.create_all().await.expect("create schema");
    db
}
