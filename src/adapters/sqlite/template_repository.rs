//! SQLite implementation of the TemplateRepository.

use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{encode_tags, parse_datetime, parse_optional_uuid, parse_tags, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AttemptTemplate, Energy};
use crate::domain::ports::TemplateRepository;

const TEMPLATE_COLUMNS: &str = "id, user_id, task_id, title, description, estimated_minutes_min, \
     estimated_minutes_max, energy, required_tools_tags, focus_skills_tags, progress_value, \
     is_system_generated, created_at, updated_at";

/// SQLite-backed template store.
#[derive(Clone)]
pub struct SqliteTemplateRepository {
    pool: SqlitePool,
}

impl SqliteTemplateRepository {
    /// Wrap an open pool.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn insert_query(template: &AttemptTemplate) -> DomainResult<Query<'_, Sqlite, SqliteArguments<'_>>> {
    Ok(sqlx::query(
        r#"INSERT INTO quest_attempt_templates (id, user_id, task_id, title, description,
               estimated_minutes_min, estimated_minutes_max, energy, required_tools_tags,
               focus_skills_tags, progress_value, is_system_generated, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(template.id.to_string())
    .bind(&template.user_id)
    .bind(template.task_id.map(|id| id.to_string()))
    .bind(&template.title)
    .bind(&template.description)
    .bind(template.estimated_minutes_min)
    .bind(template.estimated_minutes_max)
    .bind(template.energy.as_str())
    .bind(encode_tags(&template.required_tools_tags)?)
    .bind(encode_tags(&template.focus_skills_tags)?)
    .bind(&template.progress_value)
    .bind(template.is_system_generated)
    .bind(template.created_at.to_rfc3339())
    .bind(template.updated_at.to_rfc3339()))
}

#[async_trait]
impl TemplateRepository for SqliteTemplateRepository {
    async fn create(&self, template: &AttemptTemplate) -> DomainResult<()> {
        insert_query(template)?.execute(&self.pool).await?;
        Ok(())
    }

    async fn create_many(&self, templates: &[AttemptTemplate]) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;
        for template in templates {
            insert_query(template)?.execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<AttemptTemplate>> {
        let row: Option<TemplateRow> = sqlx::query_as(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM quest_attempt_templates WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn update(&self, template: &AttemptTemplate) -> DomainResult<()> {
        let result = sqlx::query(
            r#"UPDATE quest_attempt_templates SET task_id = ?, title = ?, description = ?,
                   estimated_minutes_min = ?, estimated_minutes_max = ?, energy = ?,
                   required_tools_tags = ?, focus_skills_tags = ?, progress_value = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(template.task_id.map(|id| id.to_string()))
        .bind(&template.title)
        .bind(&template.description)
        .bind(template.estimated_minutes_min)
        .bind(template.estimated_minutes_max)
        .bind(template.energy.as_str())
        .bind(encode_tags(&template.required_tools_tags)?)
        .bind(encode_tags(&template.focus_skills_tags)?)
        .bind(&template.progress_value)
        .bind(template.updated_at.to_rfc3339())
        .bind(template.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TemplateNotFound(template.id));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM quest_attempt_templates WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::TemplateNotFound(id));
        }

        Ok(())
    }

    async fn list_for_task(&self, user_id: &str, task_id: Uuid) -> DomainResult<Vec<AttemptTemplate>> {
        let rows: Vec<TemplateRow> = sqlx::query_as(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM quest_attempt_templates \
             WHERE user_id = ? AND task_id = ? ORDER BY created_at ASC"
        ))
        .bind(user_id)
        .bind(task_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_for_quest(&self, user_id: &str, task_id: Uuid) -> DomainResult<Vec<AttemptTemplate>> {
        let rows: Vec<TemplateRow> = sqlx::query_as(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM quest_attempt_templates \
             WHERE user_id = ? AND (task_id = ? OR task_id IS NULL) ORDER BY created_at ASC"
        ))
        .bind(user_id)
        .bind(task_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}

#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: String,
    user_id: String,
    task_id: Option<String>,
    title: String,
    description: Option<String>,
    estimated_minutes_min: i64,
    estimated_minutes_max: i64,
    energy: String,
    required_tools_tags: String,
    focus_skills_tags: String,
    progress_value: Option<String>,
    is_system_generated: bool,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TemplateRow> for AttemptTemplate {
    type Error = DomainError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        let energy = Energy::from_str(&row.energy)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid energy: {}", row.energy)))?;

        Ok(Self {
            id: parse_uuid(&row.id)?,
            user_id: row.user_id,
            task_id: parse_optional_uuid(row.task_id.as_deref())?,
            title: row.title,
            description: row.description,
            estimated_minutes_min: row.estimated_minutes_min,
            estimated_minutes_max: row.estimated_minutes_max,
            energy,
            required_tools_tags: parse_tags(&row.required_tools_tags)?,
            focus_skills_tags: parse_tags(&row.focus_skills_tags)?,
            progress_value: row.progress_value,
            is_system_generated: row.is_system_generated,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}
