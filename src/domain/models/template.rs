//! Quest attempt template domain model.
//!
//! A template is a reusable, suggested scope of work. Templates with a
//! `task_id` belong to one quest; templates without one are global drills
//! offered for every quest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::tags::deserialize_tags;

/// Energy tier a session demands (or the user has available).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Energy {
    /// Low effort.
    Low,
    /// Medium effort.
    #[default]
    Med,
    /// High effort.
    High,
}

impl Energy {
    /// Wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Med => "med",
            Self::High => "high",
        }
    }

    /// Parse a wire name.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(Self::Low),
            "med" | "medium" => Some(Self::Med),
            "high" => Some(Self::High),
            _ => None,
        }
    }

    /// Energy bucket implied by a time budget: up to 30 minutes is low, up to
    /// 60 is medium, anything longer is high.
    pub const fn for_minutes(minutes: u32) -> Self {
        if minutes <= 30 {
            Self::Low
        } else if minutes <= 60 {
            Self::Med
        } else {
            Self::High
        }
    }
}

impl fmt::Display for Energy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A suggested unit of work for a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptTemplate {
    /// Unique id.
    pub id: Uuid,
    /// Owner.
    pub user_id: String,
    /// Quest the template belongs to, if any.
    pub task_id: Option<Uuid>,
    /// Short title.
    pub title: String,
    /// Optional longer text.
    pub description: Option<String>,
    /// Shortest expected duration in minutes.
    pub estimated_minutes_min: i64,
    /// Longest expected duration in minutes.
    pub estimated_minutes_max: i64,
    /// Effort level.
    pub energy: Energy,
    /// Tools the template needs.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub required_tools_tags: Vec<String>,
    /// Skills the template trains.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub focus_skills_tags: Vec<String>,
    /// What completing the template yields, e.g. "Bases advanced for 2-3 models"
    pub progress_value: Option<String>,
    /// Created by provisioning rather than by the user.
    pub is_system_generated: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl AttemptTemplate {
    /// New template with no tags or description.
    pub fn new(
        user_id: impl Into<String>,
        task_id: Option<Uuid>,
        title: impl Into<String>,
        minutes: (i64, i64),
        energy: Energy,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            task_id,
            title: title.into(),
            description: None,
            estimated_minutes_min: minutes.0,
            estimated_minutes_max: minutes.1,
            energy,
            required_tools_tags: Vec::new(),
            focus_skills_tags: Vec::new(),
            progress_value: None,
            is_system_generated: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace tool tags.
    pub fn with_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_tools_tags = tools.into_iter().map(Into::into).collect();
        self
    }

    /// Replace skill tags.
    pub fn with_skills<I, S>(mut self, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focus_skills_tags = skills.into_iter().map(Into::into).collect();
        self
    }

    /// Set the progress value.
    pub fn with_progress_value(mut self, value: impl Into<String>) -> Self {
        self.progress_value = Some(value.into());
        self
    }

    /// Mark as created by provisioning.
    pub const fn system_generated(mut self) -> Self {
        self.is_system_generated = true;
        self
    }

    /// Whether the template is not tied to a quest.
    pub const fn is_global(&self) -> bool {
        self.task_id.is_none()
    }

    /// Check the title and the minutes range.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.estimated_minutes_min < 0 {
            return Err("Estimated minutes cannot be negative".to_string());
        }
        if self.estimated_minutes_min > self.estimated_minutes_max {
            return Err("Estimated minutes min cannot exceed max".to_string());
        }
        Ok(())
    }
}
