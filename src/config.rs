//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use crate::query::DEFAULT_LOOKBACKS;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where readings are persisted
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

fn default_database_path() -> PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".config").join("perceived-load.csv"))
        .unwrap_or_else(|| PathBuf::from("./perceived-load.csv"))
}

impl DatabaseConfig {
    /// Database path with a leading `~/` expanded to the home directory
    pub fn resolved_path(&self) -> PathBuf {
        match (self.path.strip_prefix("~"), dirs::home_dir()) {
            (Ok(rest), Some(home)) => home.join(rest),
            _ => self.path.clone(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Which trailing averages to report
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_lookbacks")]
    pub lookbacks: Vec<u32>,
}

fn default_lookbacks() -> Vec<u32> {
    DEFAULT_LOOKBACKS.to_vec()
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            lookbacks: default_lookbacks(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Parse a comma separated list of lookback days, e.g. `1,5,15`
fn parse_lookbacks(value: &str) -> Option<Vec<u32>> {
    value
        .split(',')
        .map(|s| s.trim().parse::<u32>().ok())
        .collect()
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::from_toml(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("perceived-load").join("config.toml")),
            Some(PathBuf::from("./perceived-load.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("PERCEIVED_LOAD_DB") {
            self.database.path = PathBuf::from(path);
        }

        if let Ok(lookbacks) = std::env::var("PERCEIVED_LOAD_LOOKBACKS") {
            match parse_lookbacks(&lookbacks) {
                Some(days) => self.report.lookbacks = days,
                None => tracing::warn!("Ignoring PERCEIVED_LOAD_LOOKBACKS={:?}", lookbacks),
            }
        }

        if let Ok(level) = std::env::var("PERCEIVED_LOAD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PERCEIVED_LOAD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Perceived Load Configuration
#
# Environment variables override these settings:
# - PERCEIVED_LOAD_DB
# - PERCEIVED_LOAD_LOOKBACKS (comma separated, e.g. "1,5,15")
# - PERCEIVED_LOAD_LOG_LEVEL
# - PERCEIVED_LOAD_LOG_FORMAT

[database]
# CSV file holding one "timestamp,value" reading per line
path = "~/.config/perceived-load.csv"

[report]
# Trailing windows to average, in days
lookbacks = [1, 5, 15]

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json
format = "pretty"
"#
    .to_string()
}
