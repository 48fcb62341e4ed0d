//! Domain models for the painting planner.

pub mod arsenal;
pub mod attempt;
pub mod config;
pub mod profile;
pub mod tags;
pub mod task;
pub mod template;

pub use arsenal::{ArsenalItem, PaintRow, PAINT_CATEGORY};
pub use attempt::{
    Attempt, AttemptEntry, AttemptState, DerivedAttemptState, EventType, ProgressEvent,
};
pub use config::{
    Config, DatabaseConfig, LogFormat, LoggingConfig, PlanningConfig, RotationPolicy, UserConfig,
};
pub use profile::{Profile, RecommendationConfig};
pub use tags::{normalize_tags, split_tags, tidy_tags};
pub use task::{Task, TaskStatus};
pub use template::{AttemptTemplate, Energy};
