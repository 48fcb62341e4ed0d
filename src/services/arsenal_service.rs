//! Arsenal inventory management.

use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{tidy_tags, ArsenalItem, PaintRow};
use crate::domain::ports::ArsenalRepository;
use crate::services::authenticated;

/// Partial update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArsenalUpdate {
    /// New category.
    pub category: Option<String>,
    /// New name.
    pub name: Option<String>,
    /// Replacement tags.
    pub tags: Option<Vec<String>>,
    /// New availability.
    pub available: Option<bool>,
}

/// Owner-scoped arsenal CRUD.
pub struct ArsenalService<R: ArsenalRepository> {
    repository: Arc<R>,
    owner: Option<String>,
}

impl<R: ArsenalRepository> ArsenalService<R> {
    /// Build a service for `owner`.
    pub fn new(repository: Arc<R>, owner: Option<String>) -> Self {
        Self { repository, owner }
    }

    /// The owner's items, optionally only those on hand.
    pub async fn list_items(&self, available_only: bool) -> DomainResult<Vec<ArsenalItem>> {
        let owner = authenticated(self.owner.as_deref())?;
        self.repository
            .list(owner, available_only)
            .await
            .map_err(|e| DomainError::store("Failed to load arsenal", e))
    }

    /// Validate and store a new item.
    pub async fn create_item(&self, category: &str, name: &str, tags: Vec<String>) -> DomainResult<ArsenalItem> {
        let owner = authenticated(self.owner.as_deref())?;
        let item = ArsenalItem::new(owner, category.trim(), name.trim()).with_tags(tidy_tags(tags));

        item.validate().map_err(DomainError::ValidationFailed)?;
        self.repository
            .create(&item)
            .await
            .map_err(|e| DomainError::store("Failed to create arsenal item", e))?;
        Ok(item)
    }

    /// Apply a partial update.
    pub async fn update_item(&self, id: Uuid, update: ArsenalUpdate) -> DomainResult<ArsenalItem> {
        let owner = authenticated(self.owner.as_deref())?;
        let mut item = self.owned(owner, id).await?;

        if let Some(category) = update.category {
            item.category = category.trim().to_string();
        }
        if let Some(name) = update.name {
            item.name = name.trim().to_string();
        }
        if let Some(tags) = update.tags {
            item.tags = tidy_tags(tags);
        }
        if let Some(available) = update.available {
            item.available = available;
        }
        item.updated_at = chrono::Utc::now();

        item.validate().map_err(DomainError::ValidationFailed)?;
        self.repository
            .update(&item)
            .await
            .map_err(|e| DomainError::store("Failed to update arsenal item", e))?;
        Ok(item)
    }

    /// Delete an owned item.
    pub async fn delete_item(&self, id: Uuid) -> DomainResult<()> {
        let owner = authenticated(self.owner.as_deref())?;
        self.owned(owner, id).await?;
        self.repository
            .delete(id)
            .await
            .map_err(|e| DomainError::store("Failed to delete arsenal item", e))
    }

    /// Insert one paint per row with a non-blank colour. All or nothing.
    pub async fn import_paints(&self, rows: Vec<PaintRow>) -> DomainResult<Vec<ArsenalItem>> {
        let owner = authenticated(self.owner.as_deref())?;
        let items: Vec<ArsenalItem> = rows.into_iter().filter_map(|row| row.into_item(owner)).collect();
        if items.is_empty() {
            return Ok(items);
        }

        self.repository
            .create_many(&items)
            .await
            .map_err(|e| DomainError::store("Failed to bulk import paint items", e))?;
        info!(count = items.len(), "imported paints");
        Ok(items)
    }

    async fn owned(&self, owner: &str, id: Uuid) -> DomainResult<ArsenalItem> {
        self.repository
            .get(id)
            .await
            .map_err(|e| DomainError::store("Failed to load arsenal item", e))?
            .filter(|item| item.user_id == owner)
            .ok_or(DomainError::ArsenalItemNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteArsenalRepository};
    use crate::domain::models::PAINT_CATEGORY;

    async fn setup_service(owner: &str) -> ArsenalService<SqliteArsenalRepository> {
        let pool = create_migrated_test_pool().await.unwrap();
        ArsenalService::new(Arc::new(SqliteArsenalRepository::new(pool)), Some(owner.to_string()))
    }

    fn paint(color: &str, brand: Option<&str>) -> PaintRow {
        PaintRow {
            color: color.to_string(),
            brand: brand.map(str::to_string),
            ..PaintRow::default()
        }
    }

    #[tokio::test]
    async fn test_import_paints_skips_blank_rows() {
        let service = setup_service("u1").await;
        let imported = service
            .import_paints(vec![
                paint(" Leadbelcher ", Some("Citadel")),
                paint("   ", Some("Vallejo")),
                PaintRow {
                    available: Some(false),
                    medium: Some("contrast".to_string()),
                    ..paint("Black Templar", None)
                },
            ])
            .await
            .unwrap();

        assert_eq!(imported.len(), 2);
        assert_eq!(imported[0].name, "Leadbelcher");
        assert_eq!(imported[0].category, PAINT_CATEGORY);
        assert_eq!(imported[0].tags, vec!["Citadel"]);
        assert!(!imported[1].available);
        assert_eq!(service.list_items(true).await.unwrap().len(), 1);

        assert!(service.import_paints(vec![paint("", None)]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_item_lifecycle() {
        let service = setup_service("u1").await;
        let item = service
            .create_item("brush", "Series 7 #1", vec!["round brush".to_string()])
            .await
            .unwrap();

        let updated = service
            .update_item(
                item.id,
                ArsenalUpdate {
                    available: Some(false),
                    ..ArsenalUpdate::default()
                },
            )
            .await
            .unwrap();
        assert!(!updated.available);

        service.delete_item(item.id).await.unwrap();
        let err = service.delete_item(item.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Arsenal item not found");
    }

    #[tokio::test]
    async fn test_create_item_requires_name() {
        let service = setup_service("u1").await;
        let err = service.create_item("brush", "  ", Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Name is required");
    }
}
