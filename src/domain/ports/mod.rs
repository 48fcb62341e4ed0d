//! Port trait definitions (Hexagonal Architecture)
//!
//! Async repository interfaces that storage adapters implement:
//! - AttemptRepository / AttemptEntryRepository: sessions and their journal
//! - ProgressEventRepository: the append-only event log
//! - TaskRepository, TemplateRepository: backlog and suggested work units
//! - ProfileRepository, RecommendationConfigRepository: per-user tuning
//! - ArsenalRepository: tool and paint inventory

pub mod arsenal_repository;
pub mod attempt_repository;
pub mod entry_repository;
pub mod profile_repository;
pub mod progress_event_repository;
pub mod task_repository;
pub mod template_repository;

pub use arsenal_repository::ArsenalRepository;
pub use attempt_repository::AttemptRepository;
pub use entry_repository::AttemptEntryRepository;
pub use profile_repository::{ProfileRepository, RecommendationConfigRepository};
pub use progress_event_repository::ProgressEventRepository;
pub use task_repository::{TaskFilter, TaskRepository};
pub use template_repository::TemplateRepository;
