//! Event log store port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::ProgressEvent;

/// Append-only store of progress events.
///
/// Implementations must never update or delete events. Callers do not rely
/// on the order of returned events; the deriver sorts them itself.
#[async_trait]
pub trait ProgressEventRepository: Send + Sync {
    /// Append an event, returning it with its store sequence assigned.
    async fn append(&self, event: &ProgressEvent) -> DomainResult<ProgressEvent>;

    /// Events for one attempt.
    async fn list_for_attempt(&self, attempt_id: Uuid) -> DomainResult<Vec<ProgressEvent>>;

    /// Events for several attempts at once.
    async fn list_for_attempts(&self, attempt_ids: &[Uuid]) -> DomainResult<Vec<ProgressEvent>>;
}
