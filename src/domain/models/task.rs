//! Backlog task domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::tags::deserialize_tags;

/// Lifecycle status of a backlog task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not scheduled yet.
    #[default]
    Backlog,
    /// Being worked on.
    Active,
    /// Finished.
    Done,
    /// Maybe later.
    Someday,
    /// Hidden from recommendations.
    Archived,
}

impl TaskStatus {
    /// Persisted name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Active => "active",
            Self::Done => "done",
            Self::Someday => "someday",
            Self::Archived => "archived",
        }
    }

    /// Parse a persisted name.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "backlog" => Some(Self::Backlog),
            "active" => Some(Self::Active),
            "done" => Some(Self::Done),
            "someday" => Some(Self::Someday),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// Lowest priority.
pub const MIN_PRIORITY: i64 = 1;
/// Highest priority.
pub const MAX_PRIORITY: i64 = 5;

/// A backlog item the user intends to paint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique id.
    pub id: Uuid,
    /// Owner.
    pub user_id: String,
    /// What to paint.
    pub title: String,
    /// Game system label, e.g. "Warhammer 40k"
    pub game: Option<String>,
    /// Manufacturer label
    pub mfg: Option<String>,
    /// Lower bound of the time estimate.
    pub estimated_minutes_min: Option<i64>,
    /// Upper bound of the time estimate.
    pub estimated_minutes_max: Option<i64>,
    /// 1 (lowest) to 5 (highest)
    pub priority: i64,
    /// Tools the task needs.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub required_tools_tags: Vec<String>,
    /// Skills the task exercises.
    #[serde(default, deserialize_with = "deserialize_tags")]
    pub skills_tags: Vec<String>,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// New backlog task with middle priority.
    pub fn new(user_id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            title: title.into(),
            game: None,
            mfg: None,
            estimated_minutes_min: None,
            estimated_minutes_max: None,
            priority: 3,
            required_tools_tags: Vec::new(),
            skills_tags: Vec::new(),
            status: TaskStatus::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the priority.
    pub const fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Set the time estimate.
    pub const fn with_minutes(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.estimated_minutes_min = min;
        self.estimated_minutes_max = max;
        self
    }

    /// Replace skill tags.
    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills_tags = skills;
        self
    }

    /// Replace tool tags.
    pub fn with_tools(mut self, tools: Vec<String>) -> Self {
        self.required_tools_tags = tools;
        self
    }

    /// Set the status.
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Whether the task is archived.
    pub const fn is_archived(&self) -> bool {
        matches!(self.status, TaskStatus::Archived)
    }

    /// Validate user-editable fields.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(format!(
                "Priority must be between {MIN_PRIORITY} and {MAX_PRIORITY}"
            ));
        }
        for minutes in [self.estimated_minutes_min, self.estimated_minutes_max].into_iter().flatten() {
            if minutes < 0 {
                return Err("Estimated minutes cannot be negative".to_string());
            }
        }
        if let (Some(min), Some(max)) = (self.estimated_minutes_min, self.estimated_minutes_max) {
            if min > max {
                return Err("Estimated minutes min cannot exceed max".to_string());
            }
        }
        Ok(())
    }
}
