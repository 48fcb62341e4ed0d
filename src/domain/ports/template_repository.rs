//! Attempt template repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::AttemptTemplate;

/// Storage for attempt templates.
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    async fn create(&self, template: &AttemptTemplate) -> DomainResult<()>;

    /// Insert several templates in one transaction.
    async fn create_many(&self, templates: &[AttemptTemplate]) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<AttemptTemplate>>;

    async fn update(&self, template: &AttemptTemplate) -> DomainResult<()>;

    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Templates scoped to exactly this task.
    async fn list_for_task(&self, user_id: &str, task_id: Uuid) -> DomainResult<Vec<AttemptTemplate>>;

    /// Templates scoped to this task plus the user's global templates.
    async fn list_for_quest(&self, user_id: &str, task_id: Uuid) -> DomainResult<Vec<AttemptTemplate>>;
}
