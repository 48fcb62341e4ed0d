//! Layered configuration loading and validation.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project-local directory holding config files and the default database.
pub const CONFIG_DIR: &str = ".paintquest";

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The level is not one `tracing` understands.
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    /// `database.path` is empty.
    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    /// `database.max_connections` is zero.
    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    /// `recommendation.default_minutes` is zero.
    #[error("Invalid default_minutes: {0}. Must be at least 1")]
    InvalidDefaultMinutes(u32),

    /// `user.id` is set but blank.
    #[error("User id cannot be blank")]
    BlankUserId,
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration relative to the working directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .paintquest/config.yaml (created by init)
    /// 3. .paintquest/local.yaml (optional overrides)
    /// 4. Environment variables (PAINTQUEST_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        Self::load_from_dir(Path::new(CONFIG_DIR))
    }

    /// Same layering as [`ConfigLoader::load`] with an explicit config directory.
    pub fn load_from_dir(dir: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(dir.join("config.yaml")))
            .merge(Yaml::file(dir.join("local.yaml")))
            .merge(Env::prefixed("PAINTQUEST_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a single file, without env overrides.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.as_ref().display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Check a merged config.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(config.database.max_connections));
        }

        if !VALID_LOG_LEVELS.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        if config.planning.default_minutes == 0 {
            return Err(ConfigError::InvalidDefaultMinutes(config.planning.default_minutes));
        }

        // Absent means anonymous; present but blank is a typo.
        if config.user.id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            return Err(ConfigError::BlankUserId);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{LogFormat, RotationPolicy};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.path, ".paintquest/paintquest.db");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.planning.default_minutes, 60);
        assert!(config.user.id.is_none());
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
database:
  path: /custom/path.db
  max_connections: 2
logging:
  level: debug
  format: json
  log_dir: /tmp/paintquest-logs
  rotation: hourly
user:
  id: painter
planning:
  default_minutes: 45
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");
        assert_eq!(config.database.path, "/custom/path.db");
        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.rotation, RotationPolicy::Hourly);
        assert_eq!(config.user.id.as_deref(), Some("painter"));
        assert_eq!(config.planning.default_minutes, 45);
        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        match ConfigLoader::validate(&config) {
            Err(ConfigError::InvalidLogLevel(level)) => assert_eq!(level, "loud"),
            other => panic!("Expected InvalidLogLevel, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_database_settings() {
        let mut config = Config::default();
        config.database.path = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyDatabasePath)
        ));

        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxConnections(0))
        ));
    }

    #[test]
    fn test_validate_planning_and_user() {
        let mut config = Config::default();
        config.planning.default_minutes = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidDefaultMinutes(0))
        ));

        let mut config = Config::default();
        config.user.id = Some(" ".to_string());
        assert!(matches!(ConfigLoader::validate(&config), Err(ConfigError::BlankUserId)));
    }

    #[test]
    fn test_hierarchical_merging() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("config.yaml"),
            "user:\n  id: base\nlogging:\n  level: info\n  format: json\n",
        )
        .unwrap();
        fs::write(dir.path().join("local.yaml"), "logging:\n  level: debug\n").unwrap();

        let config = temp_env::with_var_unset("PAINTQUEST_LOGGING__LEVEL", || {
            ConfigLoader::load_from_dir(dir.path()).unwrap()
        });
        assert_eq!(config.logging.level, "debug", "local overrides project config");
        assert_eq!(config.logging.format, LogFormat::Json, "unset fields keep the base value");
        assert_eq!(config.user.id.as_deref(), Some("base"));
    }

    #[test]
    fn test_env_override() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.yaml"), "user:\n  id: base\n").unwrap();

        let config = temp_env::with_vars(
            [
                ("PAINTQUEST_USER__ID", Some("from-env")),
                ("PAINTQUEST_PLANNING__DEFAULT_MINUTES", Some("30")),
            ],
            || ConfigLoader::load_from_dir(dir.path()).unwrap(),
        );
        assert_eq!(config.user.id.as_deref(), Some("from-env"));
        assert_eq!(config.planning.default_minutes, 30);
    }

    #[test]
    fn test_load_from_file_rejects_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "database:\n  max_connections: 0\n").unwrap();
        assert!(ConfigLoader::load_from_file(&path).is_err());
    }
}
