//! Configuration Loader
//!
//! Environment-aware configuration loading: a `recipient-sync.yaml` base
//! file, an optional `recipient-sync.{environment}.yaml` overlay, and
//! `RECIPIENT_SYNC_*` environment variable overrides, merged in that order
//! and validated before use.

use std::env;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use tracing::debug;

use super::{ConfigResult, RecipientSyncConfig};

const BASE_FILE: &str = "recipient-sync";
const ENV_PREFIX: &str = "RECIPIENT_SYNC";

/// Loaded, validated configuration plus the context it was loaded from.
pub struct ConfigManager {
    config: RecipientSyncConfig,
    environment: String,
    config_directory: PathBuf,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection, searching the
    /// `config/` directory under the current working directory.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from_directory(None)
    }

    /// Load configuration from a specific directory.
    pub fn load_from_directory(config_dir: Option<PathBuf>) -> ConfigResult<Self> {
        let environment = Self::detect_environment();
        Self::load_from_directory_with_env(config_dir, &environment)
    }

    /// Load configuration from a specific directory with an explicit
    /// environment. Useful for tests that must not touch process-global
    /// environment variables.
    pub fn load_from_directory_with_env(
        config_dir: Option<PathBuf>,
        environment: &str,
    ) -> ConfigResult<Self> {
        let config_directory = config_dir.unwrap_or_else(Self::default_config_directory);

        debug!(
            environment,
            directory = %config_directory.display(),
            "loading recipient sync configuration"
        );

        let config = Self::build_config(&config_directory, environment)?;
        config.validate()?;

        Ok(Self {
            config,
            environment: environment.to_string(),
            config_directory,
        })
    }

    fn build_config(dir: &Path, environment: &str) -> ConfigResult<RecipientSyncConfig> {
        let base = dir.join(format!("{BASE_FILE}.yaml"));
        let overlay = dir.join(format!("{BASE_FILE}.{environment}.yaml"));

        let merged = Config::builder()
            .add_source(File::from(base).required(false))
            .add_source(File::from(overlay).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(merged.try_deserialize()?)
    }

    /// Detect the running environment: `RECIPIENT_SYNC_ENV`, then
    /// `APP_ENV`, then `development`.
    pub fn detect_environment() -> String {
        env::var("RECIPIENT_SYNC_ENV")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string())
    }

    fn default_config_directory() -> PathBuf {
        PathBuf::from("config")
    }

    pub fn config(&self) -> &RecipientSyncConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn config_directory(&self) -> &Path {
        &self.config_directory
    }
}
