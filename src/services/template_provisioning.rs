//! Attempt template provisioning for quests.
//!
//! Before scoring, a quest is topped up with system-generated templates so
//! the user always has at least three unplayed, quest-specific options.

use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AttemptTemplate, Energy, EventType, ProgressEvent};
use crate::domain::ports::{
    ArsenalRepository, AttemptRepository, ProfileRepository, ProgressEventRepository, TaskRepository,
    TemplateRepository,
};
use crate::services::authenticated;
use crate::services::template_recommender::{
    recommend_templates, TemplateRecommendation, TemplateRecommendationInput,
};

/// Unplayed quest-specific templates to keep on hand.
const MIN_UNPLAYED_TEMPLATES: usize = 3;

/// How many of the most recently used templates count as "recent".
const RECENT_TEMPLATE_WINDOW: usize = 20;

struct DefaultTemplate {
    name: &'static str,
    description: &'static str,
    minutes: (i64, i64),
    energy: Energy,
    tools: &'static [&'static str],
    skills: &'static [&'static str],
    progress_value: &'static str,
}

impl DefaultTemplate {
    fn build(&self, user_id: &str, task_id: Option<Uuid>, title: String) -> AttemptTemplate {
        AttemptTemplate::new(user_id, task_id, title, self.minutes, self.energy)
            .with_description(self.description)
            .with_tools(self.tools.iter().copied())
            .with_skills(self.skills.iter().copied())
            .with_progress_value(self.progress_value)
            .system_generated()
    }
}

const QUEST_DEFAULTS: [DefaultTemplate; 6] = [
    DefaultTemplate {
        name: "Prep + Basecoat pass",
        description: "Block in base colors for the next chunk of models.",
        minutes: (25, 45),
        energy: Energy::Low,
        tools: &["round brush"],
        skills: &["basecoating"],
        progress_value: "Base layers complete on 2-3 models",
    },
    DefaultTemplate {
        name: "Shade + Cleanup",
        description: "Apply washes and cleanup transitions on key panels.",
        minutes: (30, 60),
        energy: Energy::Med,
        tools: &["round brush", "detail brush"],
        skills: &["washing", "layering"],
        progress_value: "Shadows and cleanup done for one unit section",
    },
    DefaultTemplate {
        name: "Highlight push",
        description: "Edge highlight focal details to push finish quality.",
        minutes: (30, 75),
        energy: Energy::High,
        tools: &["highlight brush", "detail brush"],
        skills: &["highlighting", "blending"],
        progress_value: "Visible finish upgrade on key models",
    },
    DefaultTemplate {
        name: "Detail cleanup",
        description: "Sharpen panel lines and tidy spillover from earlier layers.",
        minutes: (20, 40),
        energy: Energy::Low,
        tools: &["detail brush"],
        skills: &["basecoating", "layering"],
        progress_value: "Cleaner details across one model group",
    },
    DefaultTemplate {
        name: "Basing progress pass",
        description: "Advance base texture and tones for a subset of models.",
        minutes: (25, 50),
        energy: Energy::Med,
        tools: &["drybrush"],
        skills: &["basing", "drybrushing"],
        progress_value: "Bases advanced for 2-3 models",
    },
    DefaultTemplate {
        name: "Glaze refinement",
        description: "Smooth rough transitions and unify target color zones.",
        minutes: (30, 55),
        energy: Energy::High,
        tools: &["round brush"],
        skills: &["glazing", "blending"],
        progress_value: "Smoother transitions on key surfaces",
    },
];

const GENERIC_DEFAULTS: [DefaultTemplate; 2] = [
    DefaultTemplate {
        name: "5 model highlighting practice",
        description: "Practice controlled highlights on five small areas.",
        minutes: (20, 45),
        energy: Energy::Med,
        tools: &["highlight brush"],
        skills: &["highlighting"],
        progress_value: "Improved highlight consistency",
    },
    DefaultTemplate {
        name: "Layering transition drill",
        description: "Build smooth transitions on armor panels.",
        minutes: (25, 50),
        energy: Energy::Med,
        tools: &["round brush"],
        skills: &["layering", "glazing"],
        progress_value: "Smoother transitions across test area",
    },
];

/// The six quest-specific defaults, titled `"{quest title}: {name}"`.
pub fn quest_default_templates(user_id: &str, task_id: Uuid, quest_title: &str) -> Vec<AttemptTemplate> {
    QUEST_DEFAULTS
        .iter()
        .map(|d| d.build(user_id, Some(task_id), format!("{quest_title}: {}", d.name)))
        .collect()
}

/// Global skill drills, offered for every quest.
pub fn generic_skill_templates(user_id: &str) -> Vec<AttemptTemplate> {
    GENERIC_DEFAULTS
        .iter()
        .map(|d| d.build(user_id, None, d.name.to_string()))
        .collect()
}

/// Quest defaults followed by the generic drills.
pub fn default_template_set(user_id: &str, task_id: Uuid, quest_title: &str) -> Vec<AttemptTemplate> {
    let mut templates = quest_default_templates(user_id, task_id, quest_title);
    templates.extend(generic_skill_templates(user_id));
    templates
}

/// Request context echoed back with quest recommendations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestRecommendationMeta {
    /// The quest's task id.
    pub quest_id: Uuid,
    /// Session length used for scoring.
    pub available_minutes: u32,
    /// Energy used for scoring.
    pub energy: Energy,
    /// Unplayed templates that were scored.
    pub template_count: usize,
}

/// Ranked templates for one quest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestRecommendations {
    /// Best first.
    pub recommendations: Vec<TemplateRecommendation>,
    /// Request context.
    pub meta: QuestRecommendationMeta,
}

/// Quest template provisioning, ranking and quest starts.
pub struct TemplateProvisioningService {
    tasks: Arc<dyn TaskRepository>,
    attempts: Arc<dyn AttemptRepository>,
    events: Arc<dyn ProgressEventRepository>,
    templates: Arc<dyn TemplateRepository>,
    profiles: Arc<dyn ProfileRepository>,
    arsenal: Arc<dyn ArsenalRepository>,
    owner: Option<String>,
    default_minutes: u32,
}

impl TemplateProvisioningService {
    /// Wire the service to its stores.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tasks: Arc<dyn TaskRepository>,
        attempts: Arc<dyn AttemptRepository>,
        events: Arc<dyn ProgressEventRepository>,
        templates: Arc<dyn TemplateRepository>,
        profiles: Arc<dyn ProfileRepository>,
        arsenal: Arc<dyn ArsenalRepository>,
        owner: Option<String>,
        default_minutes: u32,
    ) -> Self {
        Self {
            tasks,
            attempts,
            events,
            templates,
            profiles,
            arsenal,
            owner,
            default_minutes,
        }
    }

    /// Provision templates for a quest if needed, then rank the unplayed ones.
    #[instrument(skip(self))]
    pub async fn recommend_for_quest(
        &self,
        task_id: Uuid,
        minutes: Option<u32>,
        energy: Option<Energy>,
    ) -> DomainResult<QuestRecommendations> {
        let owner = authenticated(self.owner.as_deref())?;
        let task = self
            .tasks
            .get(task_id)
            .await
            .map_err(|e| DomainError::store("Failed to load quest", e))?
            .filter(|task| task.user_id == owner)
            .ok_or(DomainError::QuestNotFound(task_id))?;

        let available_minutes = minutes.unwrap_or(self.default_minutes).max(1);
        let profile = self
            .profiles
            .get(owner)
            .await
            .map_err(|e| DomainError::store("Failed to load profile", e))?;
        let energy = energy
            .or_else(|| profile.as_ref().and_then(|p| p.energy_preference))
            .unwrap_or_default();

        let used = self.used_template_ids(owner, task_id).await?;
        let used_set: HashSet<Uuid> = used.iter().copied().collect();
        let recent: Vec<Uuid> = used.iter().copied().take(RECENT_TEMPLATE_WINDOW).collect();

        self.top_up_quest_templates(owner, task_id, &task.title, &used_set).await?;

        let mut templates = self.load_quest_templates(owner, task_id).await?;
        if templates.is_empty() {
            let defaults = default_template_set(owner, task_id, &task.title);
            self.templates
                .create_many(&defaults)
                .await
                .map_err(|e| DomainError::store("Failed to create templates", e))?;
            info!(%task_id, count = defaults.len(), "seeded default template set");
            templates = self.load_quest_templates(owner, task_id).await?;
        }

        let unplayed: Vec<AttemptTemplate> = templates
            .into_iter()
            .filter(|template| !used_set.contains(&template.id))
            .collect();

        let tool_tags: Vec<String> = self
            .arsenal
            .list(owner, true)
            .await
            .map_err(|e| DomainError::store("Failed to load arsenal", e))?
            .into_iter()
            .flat_map(|item| item.tags)
            .collect();
        let bottom_skills = profile.map(|p| p.focus_skills_bottom3).unwrap_or_default();

        let recommendations = recommend_templates(&TemplateRecommendationInput {
            templates: &unplayed,
            available_minutes,
            energy,
            bottom_skills: &bottom_skills,
            available_tool_tags: &tool_tags,
            recent_template_ids: &recent,
        });

        debug!(%task_id, scored = unplayed.len(), returned = recommendations.len(), "ranked templates");
        Ok(QuestRecommendations {
            recommendations,
            meta: QuestRecommendationMeta {
                quest_id: task_id,
                available_minutes,
                energy,
                template_count: unplayed.len(),
            },
        })
    }

    /// Template ids recorded on the owner's attempts for this task, newest first.
    async fn used_template_ids(&self, owner: &str, task_id: Uuid) -> DomainResult<Vec<Uuid>> {
        let attempt_ids: Vec<Uuid> = self
            .attempts
            .list_for_task(owner, task_id)
            .await
            .map_err(|e| DomainError::store("Failed to load attempts", e))?
            .into_iter()
            .map(|attempt| attempt.id)
            .collect();

        let mut progress: Vec<ProgressEvent> = self
            .events
            .list_for_attempts(&attempt_ids)
            .await
            .map_err(|e| DomainError::store("Failed to load events", e))?
            .into_iter()
            .filter(|event| event.kind() == Some(EventType::ProgressRecorded))
            .collect();
        progress.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.sequence.cmp(&a.sequence)));

        Ok(progress.iter().filter_map(ProgressEvent::template_id).collect())
    }

    async fn top_up_quest_templates(
        &self,
        owner: &str,
        task_id: Uuid,
        quest_title: &str,
        used: &HashSet<Uuid>,
    ) -> DomainResult<()> {
        let existing = self
            .templates
            .list_for_task(owner, task_id)
            .await
            .map_err(|e| DomainError::store("Failed to load templates", e))?;

        let unplayed = existing.iter().filter(|t| !used.contains(&t.id)).count();
        if unplayed >= MIN_UNPLAYED_TEMPLATES {
            return Ok(());
        }

        let taken: HashSet<&str> = existing.iter().map(|t| t.title.as_str()).collect();
        let to_insert: Vec<AttemptTemplate> = quest_default_templates(owner, task_id, quest_title)
            .into_iter()
            .filter(|t| !taken.contains(t.title.as_str()))
            .take(MIN_UNPLAYED_TEMPLATES - unplayed)
            .collect();

        if !to_insert.is_empty() {
            self.templates
                .create_many(&to_insert)
                .await
                .map_err(|e| DomainError::store("Failed to create templates", e))?;
            info!(%task_id, count = to_insert.len(), "topped up quest templates");
        }
        Ok(())
    }

    async fn load_quest_templates(&self, owner: &str, task_id: Uuid) -> DomainResult<Vec<AttemptTemplate>> {
        self.templates
            .list_for_quest(owner, task_id)
            .await
            .map_err(|e| DomainError::store("Failed to load templates", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{
        create_migrated_test_pool, SqliteArsenalRepository, SqliteAttemptRepository, SqliteProfileRepository,
        SqliteProgressEventRepository, SqliteTaskRepository, SqliteTemplateRepository,
    };
    use crate::domain::models::{ArsenalItem, Attempt, Profile, Task};
    use serde_json::json;
    use sqlx::SqlitePool;

    fn service_for(pool: &SqlitePool, owner: &str) -> TemplateProvisioningService {
        TemplateProvisioningService::new(
            Arc::new(SqliteTaskRepository::new(pool.clone())),
            Arc::new(SqliteAttemptRepository::new(pool.clone())),
            Arc::new(SqliteProgressEventRepository::new(pool.clone())),
            Arc::new(SqliteTemplateRepository::new(pool.clone())),
            Arc::new(SqliteProfileRepository::new(pool.clone())),
            Arc::new(SqliteArsenalRepository::new(pool.clone())),
            Some(owner.to_string()),
            60,
        )
    }

    async fn setup() -> (SqlitePool, TemplateProvisioningService, Task) {
        let pool = create_migrated_test_pool().await.unwrap();
        let task = Task::new("u1", "Ultramarines");
        SqliteTaskRepository::new(pool.clone()).create(&task).await.unwrap();
        let service = service_for(&pool, "u1");
        (pool, service, task)
    }

    #[test]
    fn test_default_set_shape() {
        let task_id = Uuid::new_v4();
        let set = default_template_set("u1", task_id, "Orks");
        assert_eq!(set.len(), 8);
        assert_eq!(set[0].title, "Orks: Prep + Basecoat pass");
        assert_eq!(set[0].task_id, Some(task_id));
        assert!(set.iter().all(|t| t.is_system_generated && t.validate().is_ok()));
        assert!(set[6..].iter().all(AttemptTemplate::is_global));
        assert_eq!(set[7].title, "Layering transition drill");
    }

    #[tokio::test]
    async fn test_first_request_provisions_three_quest_templates() {
        let (pool, service, task) = setup().await;

        let result = service.recommend_for_quest(task.id, None, None).await.unwrap();
        assert_eq!(result.meta.available_minutes, 60);
        assert_eq!(result.meta.energy, Energy::Med);
        assert_eq!(result.meta.template_count, 3);
        assert_eq!(result.recommendations.len(), 3);

        let stored = SqliteTemplateRepository::new(pool).list_for_task("u1", task.id).await.unwrap();
        let titles: Vec<_> = stored.iter().map(|t| t.title.as_str()).collect();
        assert!(titles.contains(&"Ultramarines: Prep + Basecoat pass"));
        assert!(titles.contains(&"Ultramarines: Highlight push"));

        // No further inserts once three unplayed templates exist.
        let again = service.recommend_for_quest(task.id, Some(30), None).await.unwrap();
        assert_eq!(again.meta.template_count, 3);
    }

    #[tokio::test]
    async fn test_used_templates_are_filtered_and_replaced() {
        let (pool, service, task) = setup().await;
        let first = service.recommend_for_quest(task.id, None, None).await.unwrap();
        let played = first.recommendations[0].template.id;

        let attempts = SqliteAttemptRepository::new(pool.clone());
        let attempt = Attempt::new("u1").with_task(task.id);
        attempts.create(&attempt).await.unwrap();
        let events = SqliteProgressEventRepository::new(pool.clone());
        events
            .append(&ProgressEvent::new(attempt.id, EventType::AttemptStarted, None))
            .await
            .unwrap();
        events
            .append(&ProgressEvent::new(
                attempt.id,
                EventType::ProgressRecorded,
                Some(json!({ "template_id": played.to_string() })),
            ))
            .await
            .unwrap();

        let next = service.recommend_for_quest(task.id, None, None).await.unwrap();
        assert_eq!(next.meta.template_count, 3);
        assert!(next.recommendations.iter().all(|r| r.template.id != played));

        let stored = SqliteTemplateRepository::new(pool).list_for_task("u1", task.id).await.unwrap();
        assert_eq!(stored.len(), 4);
        assert!(stored.iter().any(|t| t.title == "Ultramarines: Detail cleanup"));
    }

    #[tokio::test]
    async fn test_profile_energy_skills_and_arsenal_feed_scoring() {
        let (pool, service, task) = setup().await;

        let mut profile = Profile::new("u1");
        profile.energy_preference = Some(Energy::High);
        profile.focus_skills_bottom3 = vec!["highlighting".to_string()];
        SqliteProfileRepository::new(pool.clone()).upsert(&profile).await.unwrap();
        SqliteArsenalRepository::new(pool.clone())
            .create(&ArsenalItem::new("u1", "brush", "Highlighter").with_tags(["highlight brush", "detail brush"]))
            .await
            .unwrap();

        let result = service.recommend_for_quest(task.id, Some(45), None).await.unwrap();
        assert_eq!(result.meta.energy, Energy::High);

        let top = &result.recommendations[0];
        assert_eq!(top.template.title, "Ultramarines: Highlight push");
        assert!(top.reasons.contains(&"energy fit high".to_string()));
        assert!(top.reasons.contains(&"targets skill: highlighting".to_string()));
        assert!(top.reasons.contains(&"tools ready".to_string()));
        assert_eq!(top.recommended_minutes, 45);

        let requested = service.recommend_for_quest(task.id, Some(0), Some(Energy::Low)).await.unwrap();
        assert_eq!(requested.meta.energy, Energy::Low);
        assert_eq!(requested.meta.available_minutes, 1);
    }

    #[tokio::test]
    async fn test_foreign_or_missing_quest() {
        let (pool, _service, task) = setup().await;
        let intruder = service_for(&pool, "u2");
        let err = intruder.recommend_for_quest(task.id, None, None).await.unwrap_err();
        assert_eq!(err.to_string(), "Quest not found");
        assert_eq!(err.kind().http_status(), 404);
    }
}
