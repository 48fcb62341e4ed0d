//! Service layer: lifecycle commands, recommendation scoring and the
//! owner-scoped management services built on the repository ports.

pub mod arsenal_service;
pub mod attempt_service;
pub mod attempt_state;
pub mod profile_service;
pub mod recommendation_service;
pub mod scoring;
pub mod task_recommender;
pub mod task_service;
pub mod template_provisioning;
pub mod template_recommender;
pub mod template_service;
pub mod weekly_review;

pub use arsenal_service::{ArsenalService, ArsenalUpdate};
pub use attempt_service::{AttemptDetails, AttemptService, AttemptSummary, RecordedEvent};
pub use attempt_state::derive_attempt_state;
pub use profile_service::ProfileService;
pub use recommendation_service::TaskRecommendationService;
pub use task_recommender::{
    RecommendationWeights, TaskRecommendation, TaskRecommendationInput, TaskRecommender,
};
pub use task_service::{NewTask, TaskService, TaskUpdate};
pub use template_provisioning::{
    default_template_set, QuestRecommendationMeta, QuestRecommendations, TemplateProvisioningService,
};
pub use template_recommender::{recommend_templates, TemplateRecommendation, TemplateRecommendationInput};
pub use template_service::{NewTemplate, TemplateService, TemplateUpdate};
pub use weekly_review::{CompletedAttempt, WeeklyReview, WeeklyReviewService};

use crate::domain::errors::{DomainError, DomainResult};

/// The acting owner, or `NotAuthenticated` when none is configured.
pub(crate) fn authenticated(owner: Option<&str>) -> DomainResult<&str> {
    owner
        .filter(|id| !id.trim().is_empty())
        .ok_or(DomainError::NotAuthenticated)
}
