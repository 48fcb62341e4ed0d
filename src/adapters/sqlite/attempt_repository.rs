//! SQLite implementation of the AttemptRepository.

use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::progress_event_repository::insert_event_query;
use super::{parse_datetime, parse_optional_uuid, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Attempt, ProgressEvent};
use crate::domain::ports::AttemptRepository;

/// SQLite-backed attempt store.
#[derive(Clone)]
pub struct SqliteAttemptRepository {
    pool: SqlitePool,
}

impl SqliteAttemptRepository {
    /// Wrap an open pool.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn insert_query(attempt: &Attempt) -> Query<'_, Sqlite, SqliteArguments<'_>> {
    sqlx::query("INSERT INTO attempts (id, user_id, task_id, created_at) VALUES (?, ?, ?, ?)")
        .bind(attempt.id.to_string())
        .bind(&attempt.user_id)
        .bind(attempt.task_id.map(|id| id.to_string()))
        .bind(attempt.created_at.to_rfc3339())
}

#[async_trait]
impl AttemptRepository for SqliteAttemptRepository {
    async fn create(&self, attempt: &Attempt) -> DomainResult<()> {
        insert_query(attempt).execute(&self.pool).await?;
        Ok(())
    }

    async fn create_with_event(&self, attempt: &Attempt, event: &ProgressEvent) -> DomainResult<ProgressEvent> {
        let mut tx = self.pool.begin().await?;
        insert_query(attempt).execute(&mut *tx).await?;
        let result = insert_event_query(event)?.execute(&mut *tx).await?;
        tx.commit().await?;

        let mut stored = event.clone();
        stored.sequence = result.last_insert_rowid();
        Ok(stored)
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Attempt>> {
        let row: Option<AttemptRow> =
            sqlx::query_as("SELECT id, user_id, task_id, created_at FROM attempts WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Attempt>> {
        let rows: Vec<AttemptRow> = sqlx::query_as(
            "SELECT id, user_id, task_id, created_at FROM attempts WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_for_task(&self, user_id: &str, task_id: Uuid) -> DomainResult<Vec<Attempt>> {
        let rows: Vec<AttemptRow> = sqlx::query_as(
            r#"SELECT id, user_id, task_id, created_at FROM attempts
               WHERE user_id = ? AND task_id = ?
               ORDER BY created_at DESC"#,
        )
        .bind(user_id)
        .bind(task_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct AttemptRow {
    id: String,
    user_id: String,
    task_id: Option<String>,
    created_at: String,
}

impl TryFrom<AttemptRow> for Attempt {
    type Error = DomainError;

    fn try_from(row: AttemptRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            user_id: row.user_id,
            task_id: parse_optional_uuid(row.task_id.as_deref())?,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteTaskRepository};
    use crate::domain::models::{EventType, Task};
    use crate::domain::ports::TaskRepository;
    use chrono::{Duration, Utc};

    async fn setup_test_repo() -> (SqliteAttemptRepository, SqliteTaskRepository) {
        let pool = create_migrated_test_pool().await.unwrap();
        (SqliteAttemptRepository::new(pool.clone()), SqliteTaskRepository::new(pool))
    }

    async fn seed_task(tasks: &SqliteTaskRepository, user_id: &str) -> Uuid {
        let task = Task::new(user_id, "Space marines");
        tasks.create(&task).await.unwrap();
        task.id
    }

    #[tokio::test]
    async fn test_create_and_get_attempt() {
        let (repo, tasks) = setup_test_repo().await;
        let task_id = seed_task(&tasks, "u1").await;
        let attempt = Attempt::new("u1").with_task(task_id);

        repo.create(&attempt).await.unwrap();

        let retrieved = repo.get(attempt.id).await.unwrap().unwrap();
        assert_eq!(retrieved.user_id, "u1");
        assert_eq!(retrieved.task_id, Some(task_id));
        assert!(repo.get(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        let (repo, _) = setup_test_repo().await;
        let mut first = Attempt::new("u1");
        first.created_at = Utc::now() - Duration::hours(1);
        let second = Attempt::new("u1");
        let other = Attempt::new("u2");

        for attempt in [&first, &second, &other] {
            repo.create(attempt).await.unwrap();
        }

        let listed = repo.list_for_user("u1").await.unwrap();
        let ids: Vec<_> = listed.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_create_with_event_is_atomic() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteAttemptRepository::new(pool.clone());

        let attempt = Attempt::new("u1");
        let started = ProgressEvent::new(attempt.id, EventType::AttemptStarted, None);
        let stored = repo.create_with_event(&attempt, &started).await.unwrap();
        assert!(stored.sequence > 0);
        assert!(repo.get(attempt.id).await.unwrap().is_some());

        sqlx::query(
            "CREATE TRIGGER reject_events BEFORE INSERT ON progress_events \
             BEGIN SELECT RAISE(ABORT, 'event log unavailable'); END",
        )
        .execute(&pool)
        .await
        .unwrap();

        let doomed = Attempt::new("u1");
        let started = ProgressEvent::new(doomed.id, EventType::AttemptStarted, None);
        assert!(repo.create_with_event(&doomed, &started).await.is_err());
        assert!(repo.get(doomed.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_for_task_scopes_user() {
        let (repo, tasks) = setup_test_repo().await;
        let task_id = seed_task(&tasks, "u1").await;
        repo.create(&Attempt::new("u1").with_task(task_id)).await.unwrap();
        repo.create(&Attempt::new("u1")).await.unwrap();
        repo.create(&Attempt::new("u2").with_task(task_id)).await.unwrap();

        let listed = repo.list_for_task("u1", task_id).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].task_id, Some(task_id));
    }
}
