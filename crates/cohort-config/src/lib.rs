//! # cohort-config
//!
//! Layered configuration loading for Cohort using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`COHORT_*` prefix, `__` as separator)
//! 2. Project-level `.cohort/config.toml`
//! 3. User-level `~/.config/cohort/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `COHORT_DATABASE__PATH` -> `database.path`,
//! `COHORT_WORKFLOW__TRANSACTION_TIMEOUT_MS` -> `workflow.transaction_timeout_ms`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use cohort_config::CohortConfig;
//!
//! let config = CohortConfig::load_with_dotenv().expect("config");
//! println!("database: {}", config.database.path);
//! ```

mod database;
mod error;
mod general;
mod workflow;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use workflow::WorkflowConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CohortConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl CohortConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source fails to parse or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment())
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Extract and validate from an arbitrary figment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` on extraction failure or invalid values.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can layer extra providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".cohort/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("COHORT_").split("__"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.workflow.transaction_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "workflow.transaction_timeout_ms".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.database.path.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "database.path".into(),
                reason: "must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cohort").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use figment::Jail;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_loads() {
        let config = CohortConfig::default();
        assert_eq!(config.database.path, ".cohort/cohort.db");
        assert_eq!(config.workflow.transaction_timeout_ms, 10_000);
        assert_eq!(config.general.default_limit, 20);
    }

    #[test]
    fn env_overrides_nested_keys() {
        Jail::expect_with(|jail| {
            jail.set_env("COHORT_DATABASE__PATH", ":memory:");
            jail.set_env("COHORT_WORKFLOW__TRANSACTION_TIMEOUT_MS", "250");
            let config = CohortConfig::from_figment(&CohortConfig::figment())
                .map_err(|e| e.to_string())?;
            assert!(config.database.is_in_memory());
            assert_eq!(config.workflow.transaction_timeout_ms, 250);
            Ok(())
        });
    }

    #[test]
    fn project_toml_is_merged() {
        Jail::expect_with(|jail| {
            std::fs::create_dir_all(jail.directory().join(".cohort"))
                .map_err(|e| e.to_string())?;
            jail.create_file(
                ".cohort/config.toml",
                "[general]\ndefault_limit = 5\n\n[database]\nbusy_timeout_ms = 100\n",
            )?;
            let config = CohortConfig::from_figment(&CohortConfig::figment())
                .map_err(|e| e.to_string())?;
            assert_eq!(config.general.default_limit, 5);
            assert_eq!(config.database.busy_timeout_ms, 100);
            Ok(())
        });
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let figment = Figment::from(Serialized::defaults(CohortConfig::default()))
            .merge(Serialized::default("workflow.transaction_timeout_ms", 0));
        let err = CohortConfig::from_figment(&figment).unwrap_err();
        assert!(err.to_string().contains("workflow.transaction_timeout_ms"));
    }
}
