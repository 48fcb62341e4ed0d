//! SQLite implementation of the ArsenalRepository.

use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{encode_tags, parse_datetime, parse_tags, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::ArsenalItem;
use crate::domain::ports::ArsenalRepository;

const ITEM_COLUMNS: &str = "id, user_id, category, name, tags, available, created_at, updated_at";

/// SQLite-backed arsenal store.
#[derive(Clone)]
pub struct SqliteArsenalRepository {
    pool: SqlitePool,
}

impl SqliteArsenalRepository {
    /// Wrap an open pool.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn insert_query(item: &ArsenalItem) -> DomainResult<Query<'_, Sqlite, SqliteArguments<'_>>> {
    Ok(sqlx::query(
        r#"INSERT INTO arsenal_items (id, user_id, category, name, tags, available, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(item.id.to_string())
    .bind(&item.user_id)
    .bind(&item.category)
    .bind(&item.name)
    .bind(encode_tags(&item.tags)?)
    .bind(item.available)
    .bind(item.created_at.to_rfc3339())
    .bind(item.updated_at.to_rfc3339()))
}

#[async_trait]
impl ArsenalRepository for SqliteArsenalRepository {
    async fn create(&self, item: &ArsenalItem) -> DomainResult<()> {
        insert_query(item)?.execute(&self.pool).await?;
        Ok(())
    }

    async fn create_many(&self, items: &[ArsenalItem]) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;
        for item in items {
            insert_query(item)?.execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<ArsenalItem>> {
        let row: Option<ItemRow> =
            sqlx::query_as(&format!("SELECT {ITEM_COLUMNS} FROM arsenal_items WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update(&self, item: &ArsenalItem) -> DomainResult<()> {
        let result = sqlx::query(
            r#"UPDATE arsenal_items SET category = ?, name = ?, tags = ?, available = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&item.category)
        .bind(&item.name)
        .bind(encode_tags(&item.tags)?)
        .bind(item.available)
        .bind(item.updated_at.to_rfc3339())
        .bind(item.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ArsenalItemNotFound(item.id));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM arsenal_items WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ArsenalItemNotFound(id));
        }

        Ok(())
    }

    async fn list(&self, user_id: &str, available_only: bool) -> DomainResult<Vec<ArsenalItem>> {
        let filter = if available_only { " AND available = 1" } else { "" };
        let rows: Vec<ItemRow> = sqlx::query_as(&format!(
            "SELECT {ITEM_COLUMNS} FROM arsenal_items WHERE user_id = ?{filter} ORDER BY updated_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct ItemRow {
    id: String,
    user_id: String,
    category: String,
    name: String,
    tags: String,
    available: bool,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ItemRow> for ArsenalItem {
    type Error = DomainError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            user_id: row.user_id,
            category: row.category,
            name: row.name,
            tags: parse_tags(&row.tags)?,
            available: row.available,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    async fn setup_test_repo() -> SqliteArsenalRepository {
        let pool = create_migrated_test_pool().await.unwrap();
        SqliteArsenalRepository::new(pool)
    }

    #[tokio::test]
    async fn test_create_many_and_filter_available() {
        let repo = setup_test_repo().await;
        let brush = ArsenalItem::new("u1", "brush", "Size 0 round").with_tags(["round brush"]);
        let airbrush = ArsenalItem::new("u1", "tool", "Airbrush").with_tags(["airbrush"]).unavailable();
        let foreign = ArsenalItem::new("u2", "brush", "Drybrush").with_tags(["drybrush"]);

        repo.create_many(&[brush.clone(), airbrush, foreign]).await.unwrap();

        assert_eq!(repo.list("u1", false).await.unwrap().len(), 2);
        let available = repo.list("u1", true).await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].id, brush.id);
        assert_eq!(available[0].tags, vec!["round brush"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_item() {
        let repo = setup_test_repo().await;
        let mut item = ArsenalItem::new("u1", "paint", "Abaddon Black");
        repo.create(&item).await.unwrap();

        item.available = false;
        repo.update(&item).await.unwrap();
        assert!(!repo.get(item.id).await.unwrap().unwrap().available);

        repo.delete(item.id).await.unwrap();
        assert!(repo.get(item.id).await.unwrap().is_none());
        assert!(matches!(
            repo.update(&item).await,
            Err(DomainError::ArsenalItemNotFound(_))
        ));
    }
}
