//! Common test utilities for integration tests
//!
//! Builds every service over one migrated in-memory database so scenarios
//! can cross service boundaries the way the CLI does.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use std::sync::Arc;
use uuid::Uuid;

use paintquest::adapters::sqlite::{
    create_migrated_test_pool, SqliteArsenalRepository, SqliteAttemptEntryRepository, SqliteAttemptRepository,
    SqliteProfileRepository, SqliteProgressEventRepository, SqliteRecommendationConfigRepository,
    SqliteTaskRepository, SqliteTemplateRepository,
};
use paintquest::domain::models::{EventType, ProgressEvent};
use paintquest::services::{
    ArsenalService, AttemptService, ProfileService, TaskRecommendationService, TaskService,
    TemplateProvisioningService, TemplateService, WeeklyReviewService,
};

pub const OWNER: &str = "painter-1";
pub const DEFAULT_MINUTES: u32 = 60;

pub struct TestApp {
    pub pool: SqlitePool,
    pub owner: Option<String>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_owner(Some(OWNER)).await
    }

    pub async fn with_owner(owner: Option<&str>) -> Self {
        let pool = create_migrated_test_pool().await.expect("Failed to create test pool");
        Self {
            pool,
            owner: owner.map(str::to_string),
        }
    }

    /// Another owner sharing the same database.
    pub fn as_owner(&self, owner: &str) -> Self {
        Self {
            pool: self.pool.clone(),
            owner: Some(owner.to_string()),
        }
    }

    pub fn task_repo(&self) -> Arc<SqliteTaskRepository> {
        Arc::new(SqliteTaskRepository::new(self.pool.clone()))
    }

    pub fn event_repo(&self) -> Arc<SqliteProgressEventRepository> {
        Arc::new(SqliteProgressEventRepository::new(self.pool.clone()))
    }

    pub fn tasks(&self) -> TaskService<SqliteTaskRepository> {
        TaskService::new(self.task_repo(), self.owner.clone())
    }

    pub fn attempts(&self) -> AttemptService {
        AttemptService::new(
            Arc::new(SqliteAttemptRepository::new(self.pool.clone())),
            self.event_repo(),
            Arc::new(SqliteAttemptEntryRepository::new(self.pool.clone())),
            self.task_repo(),
            self.owner.clone(),
        )
    }

    pub fn recommendations(&self) -> TaskRecommendationService {
        TaskRecommendationService::new(
            self.task_repo(),
            Arc::new(SqliteAttemptRepository::new(self.pool.clone())),
            Arc::new(SqliteRecommendationConfigRepository::new(self.pool.clone())),
            Arc::new(SqliteProfileRepository::new(self.pool.clone())),
            Arc::new(SqliteArsenalRepository::new(self.pool.clone())),
            self.owner.clone(),
        )
    }

    pub fn provisioning(&self) -> TemplateProvisioningService {
        TemplateProvisioningService::new(
            self.task_repo(),
            Arc::new(SqliteAttemptRepository::new(self.pool.clone())),
            self.event_repo(),
            Arc::new(SqliteTemplateRepository::new(self.pool.clone())),
            Arc::new(SqliteProfileRepository::new(self.pool.clone())),
            Arc::new(SqliteArsenalRepository::new(self.pool.clone())),
            self.owner.clone(),
            DEFAULT_MINUTES,
        )
    }

    pub fn templates(&self) -> TemplateService {
        TemplateService::new(
            Arc::new(SqliteTemplateRepository::new(self.pool.clone())),
            self.task_repo(),
            self.owner.clone(),
        )
    }

    pub fn arsenal(&self) -> ArsenalService<SqliteArsenalRepository> {
        ArsenalService::new(Arc::new(SqliteArsenalRepository::new(self.pool.clone())), self.owner.clone())
    }

    pub fn profile(&self) -> ProfileService {
        ProfileService::new(
            Arc::new(SqliteProfileRepository::new(self.pool.clone())),
            Arc::new(SqliteRecommendationConfigRepository::new(self.pool.clone())),
            self.owner.clone(),
        )
    }

    pub fn review(&self) -> WeeklyReviewService {
        WeeklyReviewService::new(
            Arc::new(SqliteAttemptRepository::new(self.pool.clone())),
            self.event_repo(),
            self.owner.clone(),
        )
    }
}

/// Events for one attempt at one-minute spacing from `start`.
pub fn event_log(attempt_id: Uuid, start: DateTime<Utc>, types: &[EventType]) -> Vec<ProgressEvent> {
    types
        .iter()
        .enumerate()
        .map(|(i, event_type)| {
            let offset = i64::try_from(i).unwrap_or(i64::MAX);
            ProgressEvent::new(attempt_id, *event_type, None).at(start + Duration::minutes(offset))
        })
        .collect()
}
