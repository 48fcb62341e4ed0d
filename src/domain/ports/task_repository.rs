//! Task repository port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Task, TaskStatus};

/// Filter criteria for listing tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Only this status.
    pub status: Option<TaskStatus>,
    /// Leave out archived tasks (ignored when `status` is set).
    pub exclude_archived: bool,
}

impl TaskFilter {
    /// Candidates for recommendation: everything not archived.
    pub fn recommendable() -> Self {
        Self {
            status: None,
            exclude_archived: true,
        }
    }
}

/// Repository interface for Task persistence.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task.
    async fn create(&self, task: &Task) -> DomainResult<()>;

    /// Get a task by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Task>>;

    /// Update an existing task.
    async fn update(&self, task: &Task) -> DomainResult<()>;

    /// Set only the status column.
    async fn update_status(
        &self,
        id: Uuid,
        status: TaskStatus,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<()>;

    /// List a user's tasks, most recently updated first.
    async fn list(&self, user_id: &str, filter: TaskFilter) -> DomainResult<Vec<Task>>;
}
