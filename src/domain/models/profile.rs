//! Per-user profile and recommendation tuning.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::tags::deserialize_tags;
use super::template::Energy;

/// Painter profile. One per user, always replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Owner; one profile per user.
    pub user_id: String,
    /// Paint media the user works in.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub media: Vec<String>,
    /// Skills the user is strongest at.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub focus_skills_top3: Vec<String>,
    /// Skills the user wants to improve; targeted by template scoring.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub focus_skills_bottom3: Vec<String>,
    /// Usual session length in minutes.
    #[serde(default)]
    pub default_time_bucket: Option<i64>,
    /// Tool tags the user cannot or will not use.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub constraints: Vec<String>,
    /// Preferred session energy.
    #[serde(default)]
    pub energy_preference: Option<Energy>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    /// Empty profile for a user.
    pub fn new(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            media: Vec::new(),
            focus_skills_top3: Vec::new(),
            focus_skills_bottom3: Vec::new(),
            default_time_bucket: None,
            constraints: Vec::new(),
            energy_preference: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Weights and thresholds for task recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Owner.
    pub user_id: String,
    /// Multiplier on task priority.
    #[serde(default = "default_weight")]
    pub weight_priority: f64,
    /// Multiplier on how well the task fits the session.
    #[serde(default = "default_weight")]
    pub weight_time_fit: f64,
    /// Multiplier on overlap with focus skills.
    #[serde(default = "default_weight")]
    pub weight_skill_match: f64,
    /// Multiplier on the stale boost.
    #[serde(default = "default_weight")]
    pub weight_stale: f64,
    /// Multiplier on the recency penalty.
    #[serde(default = "default_weight")]
    pub weight_recency_penalty: f64,
    /// Days without an attempt before a task counts as stale.
    #[serde(default = "default_stale_days")]
    pub stale_days_threshold: f64,
    /// Days within which a task counts as recently attempted.
    #[serde(default = "default_recent_days")]
    pub recent_days_threshold: f64,
    /// Explicit focus list; overrides the profile's top skills when non-empty.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub focus_skills: Vec<String>,
}

const fn default_weight() -> f64 {
    1.0
}

const fn default_stale_days() -> f64 {
    14.0
}

const fn default_recent_days() -> f64 {
    3.0
}

impl RecommendationConfig {
    /// Config with default weights.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            weight_priority: default_weight(),
            weight_time_fit: default_weight(),
            weight_skill_match: default_weight(),
            weight_stale: default_weight(),
            weight_recency_penalty: default_weight(),
            stale_days_threshold: default_stale_days(),
            recent_days_threshold: default_recent_days(),
            focus_skills: Vec::new(),
        }
    }

    /// Reject non-finite weights and negative day thresholds.
    pub fn validate(&self) -> Result<(), String> {
        let weights = [
            self.weight_priority,
            self.weight_time_fit,
            self.weight_skill_match,
            self.weight_stale,
            self.weight_recency_penalty,
        ];
        if weights.iter().any(|w| !w.is_finite()) {
            return Err("Weights must be finite numbers".to_string());
        }
        if self.stale_days_threshold < 0.0 || self.recent_days_threshold < 0.0 {
            return Err("Day thresholds cannot be negative".to_string());
        }
        Ok(())
    }
}
