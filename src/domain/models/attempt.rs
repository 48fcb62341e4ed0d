//! Attempt domain model.
//!
//! An attempt is one work session, optionally tied to a task. It carries no
//! status of its own: the lifecycle state is always derived from the
//! attempt's append-only progress event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Closed vocabulary of progress event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    /// Work on the attempt began.
    AttemptStarted,
    /// A checkpoint while in progress.
    ProgressRecorded,
    /// The attempt finished.
    Completed,
    /// The attempt was given up.
    Abandoned,
}

impl EventType {
    /// Every event type, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::AttemptStarted,
        Self::ProgressRecorded,
        Self::Completed,
        Self::Abandoned,
    ];

    /// Persisted tag.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AttemptStarted => "ATTEMPT_STARTED",
            Self::ProgressRecorded => "PROGRESS_RECORDED",
            Self::Completed => "COMPLETED",
            Self::Abandoned => "ABANDONED",
        }
    }

    /// Parse a persisted or user-supplied tag. Matching is exact.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "ATTEMPT_STARTED" => Some(Self::AttemptStarted),
            "PROGRESS_RECORDED" => Some(Self::ProgressRecorded),
            "COMPLETED" => Some(Self::Completed),
            "ABANDONED" => Some(Self::Abandoned),
            _ => None,
        }
    }

    /// Whether this event moves an attempt into a terminal state.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived lifecycle state of an attempt.
///
/// `Invalid` is a pseudo-state for histories the transition table cannot
/// explain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AttemptState {
    /// No events yet.
    #[default]
    #[serde(rename = "NONE")]
    NotStarted,
    /// Started and not finished.
    #[serde(rename = "IN_PROGRESS")]
    InProgress,
    /// Finished.
    #[serde(rename = "COMPLETED")]
    Completed,
    /// Given up.
    #[serde(rename = "ABANDONED")]
    Abandoned,
    /// The log breaks the transition rules.
    #[serde(rename = "INVALID")]
    Invalid,
}

impl AttemptState {
    /// Wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "NONE",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Abandoned => "ABANDONED",
            Self::Invalid => "INVALID",
        }
    }

    /// The state reached by applying `event` here, if the table defines one.
    pub const fn transition(self, event: EventType) -> Option<Self> {
        match (self, event) {
            (Self::NotStarted, EventType::AttemptStarted) => Some(Self::InProgress),
            (Self::InProgress, EventType::ProgressRecorded) => Some(Self::InProgress),
            (Self::InProgress, EventType::Completed) => Some(Self::Completed),
            (Self::InProgress, EventType::Abandoned) => Some(Self::Abandoned),
            _ => None,
        }
    }

    /// Events with a defined transition out of this state, in table order.
    pub fn allowed_actions(self) -> Vec<EventType> {
        EventType::ALL
            .into_iter()
            .filter(|event| self.transition(*event).is_some())
            .collect()
    }

    /// Completed, abandoned or invalid.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Abandoned)
    }
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of folding an attempt's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedAttemptState {
    /// Current state.
    pub derived_state: AttemptState,
    /// Why the deriver reached this state.
    pub reasoning: String,
    /// Events that may be appended next.
    pub allowed_actions: Vec<EventType>,
}

/// A single work session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    /// Unique id.
    pub id: Uuid,
    /// Owner.
    pub user_id: String,
    /// Task worked on, if any.
    pub task_id: Option<Uuid>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Attempt {
    /// Fresh attempt with no task.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            task_id: None,
            created_at: Utc::now(),
        }
    }

    /// Link this attempt to a task (a "quest").
    pub const fn with_task(mut self, task_id: Uuid) -> Self {
        self.task_id = Some(task_id);
        self
    }
}

/// An immutable fact in an attempt's history.
///
/// `event_type` holds the persisted tag as-is so that a corrupted log can be
/// reported by the deriver instead of failing to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    /// Unique id.
    pub event_id: Uuid,
    /// Attempt the event belongs to.
    pub attempt_id: Uuid,
    /// When the event happened.
    pub timestamp: DateTime<Utc>,
    /// Persisted tag; see [`EventType::as_str`].
    pub event_type: String,
    /// Optional event data.
    pub payload: Option<serde_json::Value>,
    /// Store insertion order; breaks ties between equal timestamps.
    #[serde(default)]
    pub sequence: i64,
}

impl ProgressEvent {
    /// New event stamped with the current time.
    pub fn new(attempt_id: Uuid, event_type: EventType, payload: Option<serde_json::Value>) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            attempt_id,
            timestamp: Utc::now(),
            event_type: event_type.as_str().to_string(),
            payload,
            sequence: 0,
        }
    }

    /// Override the timestamp.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Parsed event type; `None` for an unknown tag.
    pub fn kind(&self) -> Option<EventType> {
        EventType::from_str(&self.event_type)
    }

    /// `payload.template_id` when present and parseable.
    pub fn template_id(&self) -> Option<Uuid> {
        self.payload
            .as_ref()?
            .get("template_id")?
            .as_str()
            .and_then(|s| Uuid::parse_str(s).ok())
    }
}

/// Free-form journal note on an attempt. Purely descriptive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptEntry {
    /// Unique id.
    pub entry_id: Uuid,
    /// Attempt the entry belongs to.
    pub attempt_id: Uuid,
    /// Owner.
    pub user_id: String,
    /// Caller-chosen entry kind, such as `note`.
    pub entry_type: String,
    /// Entry body.
    pub content: serde_json::Value,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl AttemptEntry {
    /// New entry stamped with the current time.
    pub fn new(
        attempt_id: Uuid,
        user_id: impl Into<String>,
        entry_type: impl Into<String>,
        content: serde_json::Value,
    ) -> Self {
        Self {
            entry_id: Uuid::new_v4(),
            attempt_id,
            user_id: user_id.into(),
            entry_type: entry_type.into(),
            content,
            created_at: Utc::now(),
        }
    }
}
