//! Arsenal repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::ArsenalItem;

/// Storage for arsenal items.
#[async_trait]
pub trait ArsenalRepository: Send + Sync {
    async fn create(&self, item: &ArsenalItem) -> DomainResult<()>;

    /// Insert several items in one transaction.
    async fn create_many(&self, items: &[ArsenalItem]) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<ArsenalItem>>;

    async fn update(&self, item: &ArsenalItem) -> DomainResult<()>;

    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// A user's items, most recently updated first.
    async fn list(&self, user_id: &str, available_only: bool) -> DomainResult<Vec<ArsenalItem>>;
}
