//! SQLite connection pool management.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::domain::models::DatabaseConfig;

const MEMORY_URL: &str = "sqlite::memory:";

/// Failures while opening the database.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The pool could not be built.
    #[error("Failed to open database pool: {0}")]
    PoolCreationFailed(#[source] sqlx::Error),
    /// The URL is not a usable SQLite location.
    #[error("Invalid database URL: {0}")]
    InvalidDatabaseUrl(String),
    /// The parent directory of the database file could not be created.
    #[error("Failed to create database directory: {0}")]
    DirectoryCreationFailed(#[source] std::io::Error),
    /// A trivial query against the pool failed.
    #[error("Database did not answer: {0}")]
    ConnectionFailed(#[source] sqlx::Error),
}

/// Pool sizing and timeouts.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Upper bound on open connections.
    pub max_connections: u32,
    /// How long to wait for a free connection.
    pub acquire_timeout: Duration,
    /// SQLite `busy_timeout` applied to every connection.
    pub busy_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(3),
            busy_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&DatabaseConfig> for PoolConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_connections: config.max_connections,
            ..Self::default()
        }
    }
}

/// Open a file-backed pool, creating the file and its directory if needed.
pub async fn create_pool(database_url: &str, config: &PoolConfig) -> Result<SqlitePool, ConnectionError> {
    ensure_database_directory(database_url)?;

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|_| ConnectionError::InvalidDatabaseUrl(database_url.to_string()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(config.busy_timeout);

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect_with(options)
        .await
        .map_err(ConnectionError::PoolCreationFailed)
}

/// Single-connection in-memory pool. Each call is an isolated database.
pub async fn create_test_pool() -> Result<SqlitePool, ConnectionError> {
    let options = SqliteConnectOptions::from_str(MEMORY_URL)
        .map_err(|_| ConnectionError::InvalidDatabaseUrl(MEMORY_URL.to_string()))?
        .foreign_keys(true)
        .shared_cache(true);

    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(ConnectionError::PoolCreationFailed)
}

fn ensure_database_directory(database_url: &str) -> Result<(), ConnectionError> {
    let path = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);

    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(ConnectionError::DirectoryCreationFailed)?;
        }
    }
    Ok(())
}

/// Round-trip a `SELECT 1` to prove the pool works.
pub async fn verify_connection(pool: &SqlitePool) -> Result<(), ConnectionError> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(ConnectionError::ConnectionFailed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_pool_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("quest.db");
        let url = format!("sqlite:{}", db_path.display());

        let pool = create_pool(&url, &PoolConfig::default()).await.unwrap();
        verify_connection(&pool).await.unwrap();
        assert!(db_path.exists());
        pool.close().await;
    }

    #[tokio::test]
    async fn test_memory_pool_answers() {
        let pool = create_test_pool().await.unwrap();
        verify_connection(&pool).await.unwrap();
    }

    #[test]
    fn test_pool_config_from_database_config() {
        let config = DatabaseConfig {
            path: "x.db".to_string(),
            max_connections: 9,
        };
        assert_eq!(PoolConfig::from(&config).max_connections, 9);
    }
}
