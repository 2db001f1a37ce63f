//! Configuration management for handlecheck.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration.
///
/// This is loaded from `~/.config/handlecheck/config.toml` (or platform equivalent).
/// If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Run behavior settings
    pub checker: CheckerConfig,
    /// Export settings for the active-accounts file
    pub export: ExportConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::debug!("Loading config from {}", path.display());
            let contents = fs::read_to_string(path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `HANDLECHECK_CONCURRENCY`: Override the number of concurrent lookups
    /// - `HANDLECHECK_TIMEOUT_SECS`: Override the per-request timeout
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("HANDLECHECK_CONCURRENCY") {
            if let Ok(concurrency) = val.parse() {
                self.checker.concurrency = concurrency;
                tracing::debug!("Override checker.concurrency from env: {}", concurrency);
            }
        }

        if let Ok(val) = std::env::var("HANDLECHECK_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.checker.request_timeout_secs = secs;
                tracing::debug!("Override checker.request_timeout_secs from env: {}", secs);
            }
        }
    }

    /// Check that every value is usable by the engine.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.checker.concurrency == 0 {
            return Err(ConfigError::InvalidValue {
                field: "checker.concurrency".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.checker.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "checker.request_timeout_secs".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to `path`, creating its parent directory.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        let config_dir = path.parent().ok_or_else(|| ConfigError::InvalidValue {
            field: "config_path".to_string(),
            reason: "no parent directory".to_string(),
        })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Directory the active-accounts export is written to.
    ///
    /// Uses `export.output_dir` when set, otherwise `<data dir>/exports`.
    pub fn export_dir(&self) -> ConfigResult<PathBuf> {
        match &self.export.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(Self::data_dir()?.join("exports")),
        }
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/handlecheck/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Get the data directory path.
    ///
    /// Uses XDG base directories: `~/.local/share/handlecheck`
    pub fn data_dir() -> ConfigResult<PathBuf> {
        let dirs = project_dirs()?;
        Ok(dirs.data_dir().to_path_buf())
    }
}

fn project_dirs() -> ConfigResult<ProjectDirs> {
    ProjectDirs::from("com", "handlecheck", "handlecheck").ok_or(ConfigError::NoConfigDir)
}

/// Run behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Maximum number of lookups in flight at once
    pub concurrency: usize,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            concurrency: 5,
            request_timeout_secs: 30,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where `final_<name>.json` files are written (defaults to the data dir)
    pub output_dir: Option<PathBuf>,
}
