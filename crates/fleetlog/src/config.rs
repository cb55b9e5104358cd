//! Configuration management for fleetlog.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::report::{Grouping, PreviewOptions};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "fleetlog";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "fleet.db";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "FLEETLOG_";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FLEETLOG_`, sections split by `__`)
/// 2. TOML config file at `~/.config/fleetlog/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Report configuration.
    pub report: ReportConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/fleetlog/fleet.db`
    pub database_path: Option<PathBuf>,
}

/// Report-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Grouping used when the command line does not pick one.
    pub grouping: Grouping,
    /// Heading printed above every report.
    pub title: String,
    /// Text shown for exits that have not returned.
    pub in_progress_label: String,
    /// Print exit observations in reports.
    pub show_observations: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        let preview = PreviewOptions::default();
        Self {
            grouping: Grouping::Month,
            title: preview.title,
            in_progress_label: preview.in_progress_label,
            show_observations: preview.show_observations,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.report.title.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "report.title must not be empty".to_string(),
            });
        }

        if self.report.in_progress_label.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "report.in_progress_label must not be empty".to_string(),
            });
        }

        if let Some(path) = &self.storage.database_path {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigValidation {
                    message: "storage.database_path must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Presentation settings for report previews.
    #[must_use]
    pub fn preview_options(&self) -> PreviewOptions {
        PreviewOptions {
            title: self.report.title.clone(),
            in_progress_label: self.report.in_progress_label.clone(),
            show_observations: self.report.show_observations,
        }
    }
}
