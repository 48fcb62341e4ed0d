//! SQLite implementation of the append-only ProgressEventRepository.

use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ProgressEvent;
use crate::domain::ports::ProgressEventRepository;

const EVENT_COLUMNS: &str = "seq, event_id, attempt_id, timestamp, event_type, payload";

/// SQLite-backed append-only event log.
#[derive(Clone)]
pub struct SqliteProgressEventRepository {
    pool: SqlitePool,
}

impl SqliteProgressEventRepository {
    /// Wrap an open pool.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Insert statement for one event. The store assigns `seq`.
pub(super) fn insert_event_query(event: &ProgressEvent) -> DomainResult<Query<'_, Sqlite, SqliteArguments<'_>>> {
    let payload = event.payload.as_ref().map(serde_json::to_string).transpose()?;
    Ok(sqlx::query(
        r#"INSERT INTO progress_events (event_id, attempt_id, timestamp, event_type, payload)
           VALUES (?, ?, ?, ?, ?)"#,
    )
    .bind(event.event_id.to_string())
    .bind(event.attempt_id.to_string())
    .bind(event.timestamp.to_rfc3339())
    .bind(&event.event_type)
    .bind(payload))
}

#[async_trait]
impl ProgressEventRepository for SqliteProgressEventRepository {
    async fn append(&self, event: &ProgressEvent) -> DomainResult<ProgressEvent> {
        let result = insert_event_query(event)?.execute(&self.pool).await?;

        let mut stored = event.clone();
        stored.sequence = result.last_insert_rowid();
        Ok(stored)
    }

    async fn list_for_attempt(&self, attempt_id: Uuid) -> DomainResult<Vec<ProgressEvent>> {
        let rows: Vec<EventRow> = sqlx::query_as(&format!(
            "SELECT {EVENT_COLUMNS} FROM progress_events WHERE attempt_id = ? ORDER BY timestamp ASC, seq ASC"
        ))
        .bind(attempt_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_for_attempts(&self, attempt_ids: &[Uuid]) -> DomainResult<Vec<ProgressEvent>> {
        if attempt_ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; attempt_ids.len()].join(", ");
        let query = format!(
            "SELECT {EVENT_COLUMNS} FROM progress_events WHERE attempt_id IN ({placeholders}) \
             ORDER BY timestamp ASC, seq ASC"
        );

        let mut q = sqlx::query_as::<_, EventRow>(&query);
        for id in attempt_ids {
            q = q.bind(id.to_string());
        }

        let rows = q.fetch_all(&self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct EventRow {
    seq: i64,
    event_id: String,
    attempt_id: String,
    timestamp: String,
    event_type: String,
    payload: Option<String>,
}

impl TryFrom<EventRow> for ProgressEvent {
    type Error = DomainError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        let payload = row.payload.as_deref().map(serde_json::from_str).transpose()?;

        Ok(Self {
            event_id: parse_uuid(&row.event_id)?,
            attempt_id: parse_uuid(&row.attempt_id)?,
            timestamp: parse_datetime(&row.timestamp)?,
            event_type: row.event_type,
            payload,
            sequence: row.seq,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteAttemptRepository};
    use crate::domain::models::{Attempt, EventType};
    use crate::domain::ports::AttemptRepository;
    use serde_json::json;

    async fn setup_test_repo() -> (SqliteProgressEventRepository, SqliteAttemptRepository) {
        let pool = create_migrated_test_pool().await.unwrap();
        (
            SqliteProgressEventRepository::new(pool.clone()),
            SqliteAttemptRepository::new(pool),
        )
    }

    async fn seed_attempt(attempts: &SqliteAttemptRepository) -> Uuid {
        let attempt = Attempt::new("u1");
        attempts.create(&attempt).await.unwrap();
        attempt.id
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_sequence() {
        let (repo, attempts) = setup_test_repo().await;
        let attempt_id = seed_attempt(&attempts).await;

        let first = repo
            .append(&ProgressEvent::new(attempt_id, EventType::AttemptStarted, None))
            .await
            .unwrap();
        let second = repo
            .append(&ProgressEvent::new(attempt_id, EventType::ProgressRecorded, None))
            .await
            .unwrap();

        assert!(first.sequence > 0);
        assert!(second.sequence > first.sequence);
    }

    #[tokio::test]
    async fn test_payload_and_unknown_type_survive_reload() {
        let (repo, attempts) = setup_test_repo().await;
        let attempt_id = seed_attempt(&attempts).await;
        let template_id = Uuid::new_v4();

        let progress = ProgressEvent::new(
            attempt_id,
            EventType::ProgressRecorded,
            Some(json!({ "template_id": template_id.to_string() })),
        );
        repo.append(&progress).await.unwrap();

        let mut garbage = ProgressEvent::new(attempt_id, EventType::ProgressRecorded, None);
        garbage.event_type = "TELEPORTED".to_string();
        repo.append(&garbage).await.unwrap();

        let events = repo.list_for_attempt(attempt_id).await.unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().any(|e| e.template_id() == Some(template_id)));
        assert!(events.iter().any(|e| e.event_type == "TELEPORTED" && e.kind().is_none()));
    }

    #[tokio::test]
    async fn test_list_for_attempts_batches() {
        let (repo, attempts) = setup_test_repo().await;
        let a = seed_attempt(&attempts).await;
        let b = seed_attempt(&attempts).await;
        let c = seed_attempt(&attempts).await;

        for id in [a, b, c] {
            repo.append(&ProgressEvent::new(id, EventType::AttemptStarted, None))
                .await
                .unwrap();
        }

        let events = repo.list_for_attempts(&[a, c]).await.unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.attempt_id != b));
        assert!(repo.list_for_attempts(&[]).await.unwrap().is_empty());
    }
}
