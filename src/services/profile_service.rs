//! Painter profile and recommendation tuning.

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{tidy_tags, Profile, RecommendationConfig};
use crate::domain::ports::{ProfileRepository, RecommendationConfigRepository};
use crate::services::authenticated;

/// Profile and scoring-weight management.
pub struct ProfileService {
    profiles: Arc<dyn ProfileRepository>,
    configs: Arc<dyn RecommendationConfigRepository>,
    owner: Option<String>,
}

impl ProfileService {
    /// Wire the service to its stores.
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        configs: Arc<dyn RecommendationConfigRepository>,
        owner: Option<String>,
    ) -> Self {
        Self {
            profiles,
            configs,
            owner,
        }
    }

    /// The owner's profile, if one was saved.
    pub async fn get_profile(&self) -> DomainResult<Option<Profile>> {
        let owner = authenticated(self.owner.as_deref())?;
        self.profiles
            .get(owner)
            .await
            .map_err(|e| DomainError::store("Failed to load profile", e))
    }

    /// Replace the owner's profile. The original `created_at` survives.
    pub async fn upsert_profile(&self, mut profile: Profile) -> DomainResult<Profile> {
        let owner = authenticated(self.owner.as_deref())?;
        let existing = self.get_profile().await?;

        profile.user_id = owner.to_string();
        profile.media = tidy_tags(profile.media);
        profile.focus_skills_top3 = tidy_tags(profile.focus_skills_top3);
        profile.focus_skills_bottom3 = tidy_tags(profile.focus_skills_bottom3);
        profile.constraints = tidy_tags(profile.constraints);
        if profile.default_time_bucket.is_some_and(|minutes| minutes <= 0) {
            return Err(DomainError::validation("Default time bucket must be positive"));
        }
        profile.updated_at = Utc::now();
        if let Some(existing) = existing {
            profile.created_at = existing.created_at;
        }

        self.profiles
            .upsert(&profile)
            .await
            .map_err(|e| DomainError::store("Failed to save profile", e))?;
        info!("saved profile");
        Ok(profile)
    }

    /// The owner's stored weights, if any.
    pub async fn get_config(&self) -> DomainResult<Option<RecommendationConfig>> {
        let owner = authenticated(self.owner.as_deref())?;
        self.configs
            .get(owner)
            .await
            .map_err(|e| DomainError::store("Failed to load recommendation config", e))
    }

    /// Validate and store weights for the owner.
    pub async fn upsert_config(&self, mut config: RecommendationConfig) -> DomainResult<RecommendationConfig> {
        let owner = authenticated(self.owner.as_deref())?;
        config.user_id = owner.to_string();
        config.focus_skills = tidy_tags(config.focus_skills);
        config.validate().map_err(DomainError::ValidationFailed)?;

        self.configs
            .upsert(&config)
            .await
            .map_err(|e| DomainError::store("Failed to save recommendation config", e))?;
        Ok(config)
    }
}
