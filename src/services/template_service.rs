//! User-managed attempt templates for a quest.

use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{tidy_tags, AttemptTemplate, Energy};
use crate::domain::ports::{TaskRepository, TemplateRepository};
use crate::services::authenticated;

/// Input for a new user template.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewTemplate {
    /// Required title.
    pub title: String,
    /// Optional longer text.
    pub description: Option<String>,
    /// Shortest expected duration.
    pub estimated_minutes_min: i64,
    /// Longest expected duration.
    pub estimated_minutes_max: i64,
    /// Effort level.
    #[serde(default)]
    pub energy: Energy,
    /// Tools needed.
    #[serde(default)]
    pub required_tools_tags: Vec<String>,
    /// Skills trained.
    #[serde(default)]
    pub focus_skills_tags: Vec<String>,
    /// What finishing the template achieves.
    pub progress_value: Option<String>,
}

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TemplateUpdate {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New shortest duration.
    pub estimated_minutes_min: Option<i64>,
    /// New longest duration.
    pub estimated_minutes_max: Option<i64>,
    /// New effort level.
    pub energy: Option<Energy>,
    /// Replacement tool tags.
    pub required_tools_tags: Option<Vec<String>>,
    /// Replacement skill tags.
    pub focus_skills_tags: Option<Vec<String>>,
    /// New progress value.
    pub progress_value: Option<String>,
}

/// User template CRUD; global templates are read-only.
pub struct TemplateService {
    templates: Arc<dyn TemplateRepository>,
    tasks: Arc<dyn TaskRepository>,
    owner: Option<String>,
}

impl TemplateService {
    /// Wire the service to its stores.
    pub fn new(templates: Arc<dyn TemplateRepository>, tasks: Arc<dyn TaskRepository>, owner: Option<String>) -> Self {
        Self { templates, tasks, owner }
    }

    /// Templates for a quest plus the owner's global templates.
    pub async fn list_templates(&self, task_id: Uuid) -> DomainResult<Vec<AttemptTemplate>> {
        let owner = authenticated(self.owner.as_deref())?;
        self.ensure_quest(owner, task_id).await?;
        self.templates
            .list_for_quest(owner, task_id)
            .await
            .map_err(|e| DomainError::store("Failed to load templates", e))
    }

    /// Add a user-authored template to a quest.
    pub async fn create_template(&self, task_id: Uuid, new: NewTemplate) -> DomainResult<AttemptTemplate> {
        let owner = authenticated(self.owner.as_deref())?;
        self.ensure_quest(owner, task_id).await?;

        let mut template = AttemptTemplate::new(
            owner,
            Some(task_id),
            new.title.trim(),
            (new.estimated_minutes_min, new.estimated_minutes_max),
            new.energy,
        )
        .with_tools(tidy_tags(new.required_tools_tags))
        .with_skills(tidy_tags(new.focus_skills_tags));
        template.description = new.description;
        template.progress_value = new.progress_value;

        template.validate().map_err(DomainError::ValidationFailed)?;
        self.templates
            .create(&template)
            .await
            .map_err(|e| DomainError::store("Failed to create template", e))?;

        info!(template_id = %template.id, %task_id, "created template");
        Ok(template)
    }

    /// Apply a partial update to an owned template.
    pub async fn update_template(&self, template_id: Uuid, update: TemplateUpdate) -> DomainResult<AttemptTemplate> {
        let owner = authenticated(self.owner.as_deref())?;
        let mut template = self.owned(owner, template_id).await?;

        if let Some(title) = update.title {
            template.title = title.trim().to_string();
        }
        if update.description.is_some() {
            template.description = update.description;
        }
        if let Some(min) = update.estimated_minutes_min {
            template.estimated_minutes_min = min;
        }
        if let Some(max) = update.estimated_minutes_max {
            template.estimated_minutes_max = max;
        }
        if let Some(energy) = update.energy {
            template.energy = energy;
        }
        if let Some(tools) = update.required_tools_tags {
            template.required_tools_tags = tidy_tags(tools);
        }
        if let Some(skills) = update.focus_skills_tags {
            template.focus_skills_tags = tidy_tags(skills);
        }
        if update.progress_value.is_some() {
            template.progress_value = update.progress_value;
        }
        template.updated_at = chrono::Utc::now();

        template.validate().map_err(DomainError::ValidationFailed)?;
        self.templates
            .update(&template)
            .await
            .map_err(|e| DomainError::store("Failed to update template", e))?;
        Ok(template)
    }

    /// Delete an owned template.
    pub async fn delete_template(&self, template_id: Uuid) -> DomainResult<()> {
        let owner = authenticated(self.owner.as_deref())?;
        self.owned(owner, template_id).await?;
        self.templates
            .delete(template_id)
            .await
            .map_err(|e| DomainError::store("Failed to delete template", e))
    }

    async fn ensure_quest(&self, owner: &str, task_id: Uuid) -> DomainResult<()> {
        let task = self
            .tasks
            .get(task_id)
            .await
            .map_err(|e| DomainError::store("Failed to load quest", e))?;
        match task {
            Some(task) if task.user_id == owner => Ok(()),
            _ => Err(DomainError::QuestNotFound(task_id)),
        }
    }

    async fn owned(&self, owner: &str, template_id: Uuid) -> DomainResult<AttemptTemplate> {
        self.templates
            .get(template_id)
            .await
            .map_err(|e| DomainError::store("Failed to load template", e))?
            .filter(|template| template.user_id == owner)
            .ok_or(DomainError::TemplateNotFound(template_id))
    }
}
