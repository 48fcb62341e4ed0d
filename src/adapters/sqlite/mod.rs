//! SQLite storage adapters.

pub mod arsenal_repository;
pub mod attempt_repository;
pub mod connection;
pub mod entry_repository;
pub mod migrations;
pub mod profile_repository;
pub mod progress_event_repository;
pub mod task_repository;
pub mod template_repository;

pub use arsenal_repository::SqliteArsenalRepository;
pub use attempt_repository::SqliteAttemptRepository;
pub use connection::{create_pool, create_test_pool, verify_connection, ConnectionError, PoolConfig};
pub use entry_repository::SqliteAttemptEntryRepository;
pub use migrations::{all_embedded_migrations, Migration, MigrationError, Migrator};
pub use profile_repository::{SqliteProfileRepository, SqliteRecommendationConfigRepository};
pub use progress_event_repository::SqliteProgressEventRepository;
pub use task_repository::SqliteTaskRepository;
pub use template_repository::SqliteTemplateRepository;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::DatabaseConfig;

/// Parse a UUID string from a SQLite row field.
pub fn parse_uuid(s: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DomainError::SerializationError(e.to_string()))
}

/// Parse an optional UUID string from a SQLite row field.
pub fn parse_optional_uuid(s: Option<&str>) -> DomainResult<Option<Uuid>> {
    s.map(parse_uuid).transpose()
}

/// Parse an RFC3339 datetime string from a SQLite row field.
pub fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map_err(|e| DomainError::SerializationError(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}

/// Decode a JSON tag column. Stored tags are always a JSON array.
pub fn parse_tags(s: &str) -> DomainResult<Vec<String>> {
    let value: serde_json::Value = serde_json::from_str(s)?;
    Ok(crate::domain::models::normalize_tags(&value))
}

/// Encode a tag list for storage.
pub fn encode_tags(tags: &[String]) -> DomainResult<String> {
    Ok(serde_json::to_string(tags)?)
}

/// Errors from [`initialize_database`].
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// Opening the pool failed.
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),
    /// Bringing the schema up to date failed.
    #[error("Migration error: {0}")]
    Migration(#[from] MigrationError),
}

/// Open the configured database and bring its schema up to date.
pub async fn initialize_database(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    let pool = create_pool(&config.url(), &PoolConfig::from(config)).await?;
    Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await?;
    Ok(pool)
}

/// Create an in-memory test pool with all migrations applied.
pub async fn create_migrated_test_pool() -> Result<SqlitePool, DatabaseError> {
    let pool = create_test_pool().await?;
    Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await?;
    Ok(pool)
}
