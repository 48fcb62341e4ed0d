//! Configuration management infrastructure
//!
//! Hierarchical configuration using figment:
//! - YAML file loading from the project-local `.paintquest/` directory
//! - `PAINTQUEST_` environment variable overrides
//! - Validation before use

pub mod loader;

pub use loader::{ConfigError, ConfigLoader, CONFIG_DIR};
