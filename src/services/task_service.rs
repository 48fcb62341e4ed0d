//! Task service implementing backlog management.

use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{tidy_tags, Task, TaskStatus};
use crate::domain::ports::{TaskFilter, TaskRepository};
use crate::services::authenticated;

/// Fields for a new task. Unset priority defaults to 3.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTask {
    /// Required title.
    pub title: String,
    /// Game system.
    pub game: Option<String>,
    /// Miniature manufacturer.
    pub mfg: Option<String>,
    /// Lower bound of the time estimate.
    pub estimated_minutes_min: Option<i64>,
    /// Upper bound of the time estimate.
    pub estimated_minutes_max: Option<i64>,
    /// Priority; defaults when absent.
    pub priority: Option<i64>,
    /// Tools needed.
    #[serde(default)]
    pub required_tools_tags: Vec<String>,
    /// Skills exercised.
    #[serde(default)]
    pub skills_tags: Vec<String>,
    /// Initial status; backlog when absent.
    pub status: Option<TaskStatus>,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    /// New title.
    pub title: Option<String>,
    /// New game system.
    pub game: Option<String>,
    /// New manufacturer.
    pub mfg: Option<String>,
    /// New lower estimate.
    pub estimated_minutes_min: Option<i64>,
    /// New upper estimate.
    pub estimated_minutes_max: Option<i64>,
    /// New priority.
    pub priority: Option<i64>,
    /// Replacement tool tags.
    pub required_tools_tags: Option<Vec<String>>,
    /// Replacement skill tags.
    pub skills_tags: Option<Vec<String>>,
    /// New status.
    pub status: Option<TaskStatus>,
}

/// Owner-scoped task CRUD.
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
    owner: Option<String>,
}

impl<R: TaskRepository> TaskService<R> {
    /// Build a service for `owner`.
    pub fn new(repository: Arc<R>, owner: Option<String>) -> Self {
        Self { repository, owner }
    }

    /// Create a new task.
    pub async fn create_task(&self, new: NewTask) -> DomainResult<Task> {
        let owner = authenticated(self.owner.as_deref())?;

        let mut task = Task::new(owner, new.title.trim())
            .with_minutes(new.estimated_minutes_min, new.estimated_minutes_max)
            .with_tools(tidy_tags(new.required_tools_tags))
            .with_skills(tidy_tags(new.skills_tags));
        task.game = non_blank(new.game);
        task.mfg = non_blank(new.mfg);
        if let Some(priority) = new.priority {
            task = task.with_priority(priority);
        }
        if let Some(status) = new.status {
            task = task.with_status(status);
        }

        task.validate().map_err(DomainError::ValidationFailed)?;
        self.repository
            .create(&task)
            .await
            .map_err(|e| DomainError::store("Failed to create task", e))?;

        info!(task_id = %task.id, "created task");
        Ok(task)
    }

    /// Get one of the owner's tasks.
    pub async fn get_task(&self, id: Uuid) -> DomainResult<Task> {
        let owner = authenticated(self.owner.as_deref())?;
        self.owned(owner, id).await
    }

    /// List the owner's tasks, most recently updated first.
    pub async fn list_tasks(&self, status: Option<TaskStatus>) -> DomainResult<Vec<Task>> {
        let owner = authenticated(self.owner.as_deref())?;
        let filter = TaskFilter {
            status,
            exclude_archived: false,
        };
        self.repository
            .list(owner, filter)
            .await
            .map_err(|e| DomainError::store("Failed to load tasks", e))
    }

    /// Apply a partial update and bump `updated_at`.
    pub async fn update_task(&self, id: Uuid, update: TaskUpdate) -> DomainResult<Task> {
        let owner = authenticated(self.owner.as_deref())?;
        let mut task = self.owned(owner, id).await?;

        if let Some(title) = update.title {
            task.title = title.trim().to_string();
        }
        if update.game.is_some() {
            task.game = non_blank(update.game);
        }
        if update.mfg.is_some() {
            task.mfg = non_blank(update.mfg);
        }
        if let Some(min) = update.estimated_minutes_min {
            task.estimated_minutes_min = Some(min);
        }
        if let Some(max) = update.estimated_minutes_max {
            task.estimated_minutes_max = Some(max);
        }
        if let Some(priority) = update.priority {
            task.priority = priority;
        }
        if let Some(tools) = update.required_tools_tags {
            task.required_tools_tags = tidy_tags(tools);
        }
        if let Some(skills) = update.skills_tags {
            task.skills_tags = tidy_tags(skills);
        }
        if let Some(status) = update.status {
            task.status = status;
        }
        task.updated_at = chrono::Utc::now();

        task.validate().map_err(DomainError::ValidationFailed)?;
        self.repository
            .update(&task)
            .await
            .map_err(|e| DomainError::store("Failed to update task", e))?;
        Ok(task)
    }

    /// Archive a task. Archived tasks are never recommended.
    pub async fn archive_task(&self, id: Uuid) -> DomainResult<Task> {
        self.update_task(
            id,
            TaskUpdate {
                status: Some(TaskStatus::Archived),
                ..TaskUpdate::default()
            },
        )
        .await
    }

    async fn owned(&self, owner: &str, id: Uuid) -> DomainResult<Task> {
        self.repository
            .get(id)
            .await
            .map_err(|e| DomainError::store("Failed to load task", e))?
            .filter(|task| task.user_id == owner)
            .ok_or(DomainError::TaskNotFound(id))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
