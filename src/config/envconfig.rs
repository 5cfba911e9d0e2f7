use std::path::PathBuf;

use ::config as config_rs;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Layered settings: an optional TOML file, then `PREFIX_*` environment
/// variables on top of it.
pub trait EnvConfig: Sized + DeserializeOwned {
    const PREFIX: &'static str = "APP";
    const SEPARATOR: &'static str = "__";
    /// Environment variable naming the settings file.
    const FILE_VAR: &'static str = "RESTAURANT_DB_CONFIG";
    /// Settings file looked up in the working directory when `FILE_VAR` is unset.
    const DEFAULT_FILE: &'static str = "restaurant_db.toml";

    fn load_dotenv() {
        // A missing .env is fine; the process environment still applies.
        let _ = dotenvy::dotenv();
    }

    /// The settings file to read and whether its absence is an error.
    fn settings_file() -> (PathBuf, bool) {
        match std::env::var(Self::FILE_VAR) {
            Ok(path) if !path.trim().is_empty() => (PathBuf::from(path), true),
            _ => (PathBuf::from(Self::DEFAULT_FILE), false),
        }
    }

    fn validate(&self) -> Result<()> {
        Ok(())
    }

    fn from_env() -> Result<Self> {
        Self::load_dotenv();
        let (file, required) = Self::settings_file();

        let settings = config_rs::Config::builder()
            .add_source(
                config_rs::File::from(file.clone())
                    .format(config_rs::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config_rs::Environment::with_prefix(Self::PREFIX)
                    .prefix_separator("_")
                    .separator(Self::SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .with_context(|| format!("failed to read settings (file {})", file.display()))?;

        let cfg = settings
            .try_deserialize::<Self>()
            .context("failed to deserialize settings into config")?;

        cfg.validate()?;
        Ok(cfg)
    }
}
