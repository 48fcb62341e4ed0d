//! SQLite implementation of the AttemptEntryRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::AttemptEntry;
use crate::domain::ports::AttemptEntryRepository;

/// SQLite-backed journal entry store.
#[derive(Clone)]
pub struct SqliteAttemptEntryRepository {
    pool: SqlitePool,
}

impl SqliteAttemptEntryRepository {
    /// Wrap an open pool.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttemptEntryRepository for SqliteAttemptEntryRepository {
    async fn create(&self, entry: &AttemptEntry) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO attempt_entries (entry_id, attempt_id, user_id, entry_type, content, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(entry.entry_id.to_string())
        .bind(entry.attempt_id.to_string())
        .bind(&entry.user_id)
        .bind(&entry.entry_type)
        .bind(serde_json::to_string(&entry.content)?)
        .bind(entry.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_attempt(&self, attempt_id: Uuid) -> DomainResult<Vec<AttemptEntry>> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            r#"SELECT entry_id, attempt_id, user_id, entry_type, content, created_at
               FROM attempt_entries WHERE attempt_id = ?
               ORDER BY created_at DESC"#,
        )
        .bind(attempt_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct EntryRow {
    entry_id: String,
    attempt_id: String,
    user_id: String,
    entry_type: String,
    content: String,
    created_at: String,
}

impl TryFrom<EntryRow> for AttemptEntry {
    type Error = DomainError;

    fn try_from(row: EntryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            entry_id: parse_uuid(&row.entry_id)?,
            attempt_id: parse_uuid(&row.attempt_id)?,
            user_id: row.user_id,
            entry_type: row.entry_type,
            content: serde_json::from_str(&row.content)?,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteAttemptRepository};
    use crate::domain::models::Attempt;
    use crate::domain::ports::AttemptRepository;
    use chrono::{Duration, Utc};
    use serde_json::json;

    #[tokio::test]
    async fn test_entries_round_trip_newest_first() {
        let pool = create_migrated_test_pool().await.unwrap();
        let attempts = SqliteAttemptRepository::new(pool.clone());
        let repo = SqliteAttemptEntryRepository::new(pool);

        let attempt = Attempt::new("u1");
        attempts.create(&attempt).await.unwrap();

        let mut older = AttemptEntry::new(attempt.id, "u1", "note", json!({ "text": "thinned paint too much" }));
        older.created_at = Utc::now() - Duration::minutes(10);
        let newer = AttemptEntry::new(attempt.id, "u1", "photo", json!({ "path": "wip.jpg" }));

        repo.create(&older).await.unwrap();
        repo.create(&newer).await.unwrap();

        let entries = repo.list_for_attempt(attempt.id).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].entry_type, "photo");
        assert_eq!(entries[1].content["text"], "thinned paint too much");
    }
}
