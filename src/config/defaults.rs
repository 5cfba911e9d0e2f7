pub const DEFAULT_RUST_LOG: &str = "info";
pub const DEFAULT_DB_MAX_CONNECTIONS: i64 = 5;
pub const DEFAULT_DB_MIN_IDLE: i64 = 1;
pub const DEFAULT_DB_CONNECT_TIMEOUT_SECS: i64 = 10;
pub const DEFAULT_DB_BOOTSTRAP: bool = true;
pub const DEFAULT_DB_FALLBACK_PROFILES: bool = true;
pub const DEFAULT_DB_PORT: u16 = 5432;
pub const DEFAULT_DB_NAME: &str = "restaurant_db";
