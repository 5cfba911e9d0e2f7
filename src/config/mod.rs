pub mod configs;
pub mod defaults;
pub mod endpoints;
pub mod envconfig;
pub mod validate;

pub use configs::{AppConfig, DatabaseConfig, LoggingConfig};
pub use endpoints::{Endpoint, FallbackProfile, FALLBACK_PROFILES};
pub use envconfig::EnvConfig;
