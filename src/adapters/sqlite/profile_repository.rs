//! SQLite implementations of the profile and recommendation config stores.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use super::{encode_tags, parse_datetime, parse_tags};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Energy, Profile, RecommendationConfig};
use crate::domain::ports::{ProfileRepository, RecommendationConfigRepository};

/// SQLite-backed profile store.
#[derive(Clone)]
pub struct SqliteProfileRepository {
    pool: SqlitePool,
}

impl SqliteProfileRepository {
    /// Wrap an open pool.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqliteProfileRepository {
    async fn get(&self, user_id: &str) -> DomainResult<Option<Profile>> {
        let row: Option<ProfileRow> = sqlx::query_as(
            r#"SELECT user_id, media, focus_skills_top3, focus_skills_bottom3, default_time_bucket,
                   constraints, energy_preference, created_at, updated_at
               FROM profiles WHERE user_id = ?"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn upsert(&self, profile: &Profile) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO profiles (user_id, media, focus_skills_top3, focus_skills_bottom3,
                   default_time_bucket, constraints, energy_preference, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(user_id) DO UPDATE SET
                   media = excluded.media,
                   focus_skills_top3 = excluded.focus_skills_top3,
                   focus_skills_bottom3 = excluded.focus_skills_bottom3,
                   default_time_bucket = excluded.default_time_bucket,
                   constraints = excluded.constraints,
                   energy_preference = excluded.energy_preference,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&profile.user_id)
        .bind(encode_tags(&profile.media)?)
        .bind(encode_tags(&profile.focus_skills_top3)?)
        .bind(encode_tags(&profile.focus_skills_bottom3)?)
        .bind(profile.default_time_bucket)
        .bind(encode_tags(&profile.constraints)?)
        .bind(profile.energy_preference.map(|e| e.as_str()))
        .bind(profile.created_at.to_rfc3339())
        .bind(profile.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    user_id: String,
    media: String,
    focus_skills_top3: String,
    focus_skills_bottom3: String,
    default_time_bucket: Option<i64>,
    constraints: String,
    energy_preference: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = DomainError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let energy_preference = row
            .energy_preference
            .as_deref()
            .map(|s| {
                Energy::from_str(s).ok_or_else(|| DomainError::SerializationError(format!("Invalid energy: {s}")))
            })
            .transpose()?;

        Ok(Self {
            user_id: row.user_id,
            media: parse_tags(&row.media)?,
            focus_skills_top3: parse_tags(&row.focus_skills_top3)?,
            focus_skills_bottom3: parse_tags(&row.focus_skills_bottom3)?,
            default_time_bucket: row.default_time_bucket,
            constraints: parse_tags(&row.constraints)?,
            energy_preference,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

/// SQLite-backed store for scoring weights.
#[derive(Clone)]
pub struct SqliteRecommendationConfigRepository {
    pool: SqlitePool,
}

impl SqliteRecommendationConfigRepository {
    /// Wrap an open pool.
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecommendationConfigRepository for SqliteRecommendationConfigRepository {
    async fn get(&self, user_id: &str) -> DomainResult<Option<RecommendationConfig>> {
        let row: Option<ConfigRow> = sqlx::query_as(
            r#"SELECT user_id, weight_priority, weight_time_fit, weight_skill_match, weight_stale,
                   weight_recency_penalty, stale_days_threshold, recent_days_threshold, focus_skills
               FROM recommendation_configs WHERE user_id = ?"#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn upsert(&self, config: &RecommendationConfig) -> DomainResult<()> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            r#"INSERT INTO recommendation_configs (user_id, weight_priority, weight_time_fit,
                   weight_skill_match, weight_stale, weight_recency_penalty, stale_days_threshold,
                   recent_days_threshold, focus_skills, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT(user_id) DO UPDATE SET
                   weight_priority = excluded.weight_priority,
                   weight_time_fit = excluded.weight_time_fit,
                   weight_skill_match = excluded.weight_skill_match,
                   weight_stale = excluded.weight_stale,
                   weight_recency_penalty = excluded.weight_recency_penalty,
                   stale_days_threshold = excluded.stale_days_threshold,
                   recent_days_threshold = excluded.recent_days_threshold,
                   focus_skills = excluded.focus_skills,
                   updated_at = excluded.updated_at"#,
        )
        .bind(&config.user_id)
        .bind(config.weight_priority)
        .bind(config.weight_time_fit)
        .bind(config.weight_skill_match)
        .bind(config.weight_stale)
        .bind(config.weight_recency_penalty)
        .bind(config.stale_days_threshold)
        .bind(config.recent_days_threshold)
        .bind(encode_tags(&config.focus_skills)?)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct ConfigRow {
    user_id: String,
    weight_priority: f64,
    weight_time_fit: f64,
    weight_skill_match: f64,
    weight_stale: f64,
    weight_recency_penalty: f64,
    stale_days_threshold: f64,
    recent_days_threshold: f64,
    focus_skills: String,
}

impl TryFrom<ConfigRow> for RecommendationConfig {
    type Error = DomainError;

    fn try_from(row: ConfigRow) -> Result<Self, Self::Error> {
        Ok(Self {
            user_id: row.user_id,
            weight_priority: row.weight_priority,
            weight_time_fit: row.weight_time_fit,
            weight_skill_match: row.weight_skill_match,
            weight_stale: row.weight_stale,
            weight_recency_penalty: row.weight_recency_penalty,
            stale_days_threshold: row.stale_days_threshold,
            recent_days_threshold: row.recent_days_threshold,
            focus_skills: parse_tags(&row.focus_skills)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    #[tokio::test]
    async fn test_profile_upsert_replaces() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteProfileRepository::new(pool);
        assert!(repo.get("u1").await.unwrap().is_none());

        let mut profile = Profile::new("u1");
        profile.focus_skills_bottom3 = vec!["blending".to_string()];
        profile.energy_preference = Some(Energy::Low);
        repo.upsert(&profile).await.unwrap();

        profile.focus_skills_bottom3 = vec!["glazing".to_string(), "freehand".to_string()];
        profile.energy_preference = None;
        profile.default_time_bucket = Some(45);
        repo.upsert(&profile).await.unwrap();

        let stored = repo.get("u1").await.unwrap().unwrap();
        assert_eq!(stored.focus_skills_bottom3, vec!["glazing", "freehand"]);
        assert_eq!(stored.energy_preference, None);
        assert_eq!(stored.default_time_bucket, Some(45));
    }

    #[tokio::test]
    async fn test_recommendation_config_upsert() {
        let pool = create_migrated_test_pool().await.unwrap();
        let repo = SqliteRecommendationConfigRepository::new(pool);

        let mut config = RecommendationConfig::new("u1");
        config.weight_stale = 2.5;
        config.focus_skills = vec!["blending".to_string()];
        repo.upsert(&config).await.unwrap();

        config.weight_priority = 0.5;
        repo.upsert(&config).await.unwrap();

        let stored = repo.get("u1").await.unwrap().unwrap();
        assert_eq!(stored, config);
        assert!(repo.get("u2").await.unwrap().is_none());
    }
}
