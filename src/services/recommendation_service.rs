//! Loads everything task scoring needs for the current owner.

use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::{
    ArsenalRepository, AttemptRepository, ProfileRepository, RecommendationConfigRepository, TaskFilter,
    TaskRepository,
};
use crate::services::authenticated;
use crate::services::task_recommender::{TaskRecommendation, TaskRecommendationInput, TaskRecommender};

/// Loads scoring inputs and ranks the owner's tasks.
pub struct TaskRecommendationService {
    tasks: Arc<dyn TaskRepository>,
    attempts: Arc<dyn AttemptRepository>,
    configs: Arc<dyn RecommendationConfigRepository>,
    profiles: Arc<dyn ProfileRepository>,
    arsenal: Arc<dyn ArsenalRepository>,
    owner: Option<String>,
}

impl TaskRecommendationService {
    /// Wire the service to its stores.
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        attempts: Arc<dyn AttemptRepository>,
        configs: Arc<dyn RecommendationConfigRepository>,
        profiles: Arc<dyn ProfileRepository>,
        arsenal: Arc<dyn ArsenalRepository>,
        owner: Option<String>,
    ) -> Self {
        Self {
            tasks,
            attempts,
            configs,
            profiles,
            arsenal,
            owner,
        }
    }

    /// Best tasks for a session of `minutes`.
    ///
    /// An owner with no arsenal items at all is scored as having no arsenal
    /// data; otherwise only available items count as owned tools.
    pub async fn recommend_tasks(&self, minutes: u32) -> DomainResult<Vec<TaskRecommendation>> {
        if minutes == 0 {
            return Err(DomainError::validation("minutes is required"));
        }
        let owner = authenticated(self.owner.as_deref())?;

        let (tasks, attempts, config, profile, items) = futures::try_join!(
            async {
                self.tasks
                    .list(owner, TaskFilter::recommendable())
                    .await
                    .map_err(|e| DomainError::store("Failed to load tasks", e))
            },
            async {
                self.attempts
                    .list_for_user(owner)
                    .await
                    .map_err(|e| DomainError::store("Failed to load attempts", e))
            },
            async {
                self.configs
                    .get(owner)
                    .await
                    .map_err(|e| DomainError::store("Failed to load recommendation config", e))
            },
            async {
                self.profiles
                    .get(owner)
                    .await
                    .map_err(|e| DomainError::store("Failed to load profile", e))
            },
            async {
                self.arsenal
                    .list(owner, false)
                    .await
                    .map_err(|e| DomainError::store("Failed to load arsenal", e))
            },
        )?;

        let tool_tags: Option<Vec<String>> = (!items.is_empty()).then(|| {
            items
                .into_iter()
                .filter(|item| item.available)
                .flat_map(|item| item.tags)
                .collect()
        });

        let recommender = TaskRecommender::from_config(config.as_ref());
        let recommendations = recommender.recommend(&TaskRecommendationInput {
            tasks: &tasks,
            attempts: &attempts,
            available_minutes: minutes,
            profile: profile.as_ref(),
            available_tool_tags: tool_tags.as_deref(),
            now: Utc::now(),
        });

        debug!(candidates = tasks.len(), returned = recommendations.len(), "ranked tasks");
        Ok(recommendations)
    }
}
