//! SQLite implementation of the TaskRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{encode_tags, parse_datetime, parse_tags, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Task, TaskStatus};
use crate::domain::ports::{TaskFilter, TaskRepository};

const TASK_COLUMNS: &str = "id, user_id, title, game, mfg, estimated_minutes_min, estimated_minutes_max, \
     priority, required_tools_tags, skills_tags, status, created_at, updated_at";

/// SQLite-backed task store.
#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    /// Wrap an open pool.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn create(&self, task: &Task) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO tasks (id, user_id, title, game, mfg, estimated_minutes_min, estimated_minutes_max,
                   priority, required_tools_tags, skills_tags, status, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(task.id.to_string())
        .bind(&task.user_id)
        .bind(&task.title)
        .bind(&task.game)
        .bind(&task.mfg)
        .bind(task.estimated_minutes_min)
        .bind(task.estimated_minutes_max)
        .bind(task.priority)
        .bind(encode_tags(&task.required_tools_tags)?)
        .bind(encode_tags(&task.skills_tags)?)
        .bind(task.status.as_str())
        .bind(task.created_at.to_rfc3339())
        .bind(task.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Task>> {
        let row: Option<TaskRow> = sqlx::query_as(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update(&self, task: &Task) -> DomainResult<()> {
        let result = sqlx::query(
            r#"UPDATE tasks SET title = ?, game = ?, mfg = ?, estimated_minutes_min = ?,
                   estimated_minutes_max = ?, priority = ?, required_tools_tags = ?, skills_tags = ?,
                   status = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&task.title)
        .bind(&task.game)
        .bind(&task.mfg)
        .bind(task.estimated_minutes_min)
        .bind(task.estimated_minutes_max)
        .bind(task.priority)
        .bind(encode_tags(&task.required_tools_tags)?)
        .bind(encode_tags(&task.skills_tags)?)
        .bind(task.status.as_str())
        .bind(task.updated_at.to_rfc3339())
        .bind(task.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TaskNotFound(task.id));
        }

        Ok(())
    }

    async fn update_status(&self, id: Uuid, status: TaskStatus, updated_at: DateTime<Utc>) -> DomainResult<()> {
        let result = sqlx::query("UPDATE tasks SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(updated_at.to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TaskNotFound(id));
        }

        Ok(())
    }

    async fn list(&self, user_id: &str, filter: TaskFilter) -> DomainResult<Vec<Task>> {
        let mut query = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?");
        let mut bindings: Vec<String> = vec![user_id.to_string()];

        if let Some(status) = filter.status {
            query.push_str(" AND status = ?");
            bindings.push(status.as_str().to_string());
        } else if filter.exclude_archived {
            query.push_str(" AND status != ?");
            bindings.push(TaskStatus::Archived.as_str().to_string());
        }

        query.push_str(" ORDER BY updated_at DESC, created_at DESC");

        let mut q = sqlx::query_as::<_, TaskRow>(&query);
        for binding in &bindings {
            q = q.bind(binding);
        }

        let rows: Vec<TaskRow> = q.fetch_all(&self.pool).await?;
        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    user_id: String,
    title: String,
    game: Option<String>,
    mfg: Option<String>,
    estimated_minutes_min: Option<i64>,
    estimated_minutes_max: Option<i64>,
    priority: i64,
    required_tools_tags: String,
    skills_tags: String,
    status: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TaskRow> for Task {
    type Error = DomainError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        let status = TaskStatus::from_str(&row.status)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid status: {}", row.status)))?;

        Ok(Self {
            id: parse_uuid(&row.id)?,
            user_id: row.user_id,
            title: row.title,
            game: row.game,
            mfg: row.mfg,
            estimated_minutes_min: row.estimated_minutes_min,
            estimated_minutes_max: row.estimated_minutes_max,
            priority: row.priority,
            required_tools_tags: parse_tags(&row.required_tools_tags)?,
            skills_tags: parse_tags(&row.skills_tags)?,
            status,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}
