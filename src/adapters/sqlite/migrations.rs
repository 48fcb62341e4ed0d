//! Embedded schema migrations.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

/// Migration failures.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A migration's SQL failed to apply.
    #[error("Failed to execute migration {version}: {source}")]
    ExecutionError {
        version: i64,
        #[source]
        source: sqlx::Error,
    },
    /// The version table could not be read.
    #[error("Failed to get schema version: {0}")]
    VersionCheckError(#[source] sqlx::Error),
}

/// One embedded schema step.
#[derive(Debug, Clone)]
pub struct Migration {
    /// Monotonic version number.
    pub version: i64,
    /// Human-readable summary, stored alongside the version.
    pub description: &'static str,
    /// Statements to run.
    pub sql: &'static str,
}

/// Applies pending migrations in version order.
pub struct Migrator {
    pool: SqlitePool,
}

impl Migrator {
    /// Wrap an open pool.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply every migration newer than the recorded schema version.
    /// Returns how many were applied.
    pub async fn run_embedded_migrations(&self, migrations: Vec<Migration>) -> Result<usize, MigrationError> {
        self.ensure_migrations_table().await?;
        let current_version = self.get_current_version().await?;
        let pending: Vec<_> = migrations
            .into_iter()
            .filter(|m| m.version > current_version)
            .collect();

        for migration in &pending {
            self.apply_migration(migration).await?;
            info!(version = migration.version, description = migration.description, "applied migration");
        }

        Ok(pending.len())
    }

    async fn ensure_migrations_table(&self) -> Result<(), MigrationError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now')),
                description TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| MigrationError::ExecutionError { version: 0, source: e })?;
        Ok(())
    }

    /// Highest applied version, or 0 on a fresh database.
    pub async fn get_current_version(&self) -> Result<i64, MigrationError> {
        let (version,): (i64,) = sqlx::query_as("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(MigrationError::VersionCheckError)?;
        Ok(version)
    }

    /// Run the migration and record its version in one transaction.
    async fn apply_migration(&self, migration: &Migration) -> Result<(), MigrationError> {
        let to_error = |e: sqlx::Error| MigrationError::ExecutionError {
            version: migration.version,
            source: e,
        };

        let mut tx = self.pool.begin().await.map_err(to_error)?;
        sqlx::raw_sql(migration.sql).execute(&mut *tx).await.map_err(to_error)?;
        sqlx::query("INSERT INTO schema_migrations (version, description) VALUES (?, ?)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(&mut *tx)
            .await
            .map_err(to_error)?;
        tx.commit().await.map_err(to_error)?;
        Ok(())
    }
}

/// The base schema.
pub const fn initial_schema_migration() -> Migration {
    Migration {
        version: 1,
        description: "Initial schema",
        sql: include_str!("../../../migrations/001_initial_schema.sql"),
    }
}

/// Every migration compiled into the binary, oldest first.
pub fn all_embedded_migrations() -> Vec<Migration> {
    vec![initial_schema_migration()]
}
