//! Attempt repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Attempt, ProgressEvent};

/// Repository interface for Attempt persistence.
///
/// Attempts are immutable and never deleted, so there is no update or delete.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Create a new attempt.
    async fn create(&self, attempt: &Attempt) -> DomainResult<()>;

    /// Create an attempt together with its first event, atomically.
    ///
    /// Either both rows are stored or neither is. Returns the event with its
    /// store sequence filled in.
    async fn create_with_event(&self, attempt: &Attempt, event: &ProgressEvent) -> DomainResult<ProgressEvent>;

    /// Get an attempt by ID.
    async fn get(&self, id: Uuid) -> DomainResult<Option<Attempt>>;

    /// All attempts owned by a user, newest first.
    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Attempt>>;

    /// Attempts a user has made against one task, newest first.
    async fn list_for_task(&self, user_id: &str, task_id: Uuid) -> DomainResult<Vec<Attempt>>;
}
