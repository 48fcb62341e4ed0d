//! Application configuration as loaded from YAML and the environment.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for paintquest
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Local owner identity
    #[serde(default)]
    pub user: UserConfig,

    /// Planning defaults
    #[serde(default)]
    pub planning: PlanningConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".paintquest/paintquest.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// sqlx connection URL for the configured path.
    pub fn url(&self) -> String {
        format!("sqlite:{}", self.path)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for stderr
    #[serde(default)]
    pub format: LogFormat,

    /// Directory for rolling JSON log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Log file rotation policy
    #[serde(default)]
    pub rotation: RotationPolicy,
}

/// Log line format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable lines.
    #[default]
    Pretty,
}

/// How often file logs roll over.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotationPolicy {
    /// New file each day.
    #[default]
    Daily,
    /// New file each hour.
    Hourly,
    /// A single file.
    Never,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            log_dir: None,
            rotation: RotationPolicy::default(),
        }
    }
}

/// The single local owner. Commands that touch owned data require an id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserConfig {
    /// Owner id; required by commands that touch owned data.
    #[serde(default)]
    pub id: Option<String>,
}

/// Planning defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PlanningConfig {
    /// Minutes assumed for quest recommendations when none are given
    #[serde(default = "default_minutes")]
    pub default_minutes: u32,
}

const fn default_minutes() -> u32 {
    60
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_minutes(),
        }
    }
}
