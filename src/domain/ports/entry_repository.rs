//! Attempt journal entry port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::AttemptEntry;

/// Storage for attempt journal entries.
#[async_trait]
pub trait AttemptEntryRepository: Send + Sync {
    async fn create(&self, entry: &AttemptEntry) -> DomainResult<()>;

    /// Entries for an attempt, newest first.
    async fn list_for_attempt(&self, attempt_id: Uuid) -> DomainResult<Vec<AttemptEntry>>;
}
