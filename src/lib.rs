//! Paintquest - painting session planner
//!
//! Tracks painting attempts through an event-sourced lifecycle and
//! recommends what to paint next.
//!
//! # Architecture
//!
//! Hexagonal layout:
//!
//! - **Domain Layer** (`domain`): models, repository ports and errors
//! - **Service Layer** (`services`): the state deriver, scorers and
//!   owner-scoped command services
//! - **Adapters** (`adapters`): SQLite repositories and migrations
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```
//! use paintquest::domain::models::{AttemptState, EventType, ProgressEvent};
//! use paintquest::services::derive_attempt_state;
//! use uuid::Uuid;
//!
//! let attempt_id = Uuid::new_v4();
//! let events = vec![ProgressEvent::new(attempt_id, EventType::AttemptStarted, None)];
//! let derived = derive_attempt_state(&events);
//! assert_eq!(derived.derived_state, AttemptState::InProgress);
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::errors::{DomainError, DomainResult, ErrorKind};
pub use domain::models::{
    Attempt, AttemptState, AttemptTemplate, Config, DerivedAttemptState, Energy, EventType, ProgressEvent,
    Task, TaskStatus,
};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{derive_attempt_state, AttemptService, TaskRecommender};
