//! Wiring from configuration to services for one CLI invocation.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::adapters::sqlite::{
    initialize_database, SqliteArsenalRepository, SqliteAttemptEntryRepository, SqliteAttemptRepository,
    SqliteProfileRepository, SqliteProgressEventRepository, SqliteRecommendationConfigRepository,
    SqliteTaskRepository, SqliteTemplateRepository,
};
use crate::domain::models::Config;
use crate::services::{
    ArsenalService, AttemptService, ProfileService, TaskRecommendationService, TaskService,
    TemplateProvisioningService, TemplateService, WeeklyReviewService,
};

/// Open database plus config; hands out wired services.
pub struct AppContext {
    /// Effective configuration.
    pub config: Config,
    /// Migrated pool shared by every repository.
    pub pool: SqlitePool,
}

impl AppContext {
    /// Open and migrate the configured database.
    pub async fn open(config: &Config) -> Result<Self> {
        let pool = initialize_database(&config.database)
            .await
            .context("Failed to initialize database. Run 'paintquest init' first.")?;
        Ok(Self {
            config: config.clone(),
            pool,
        })
    }

    fn owner(&self) -> Option<String> {
        self.config.user.id.clone()
    }

    fn tasks(&self) -> Arc<SqliteTaskRepository> {
        Arc::new(SqliteTaskRepository::new(self.pool.clone()))
    }

    fn attempts(&self) -> Arc<SqliteAttemptRepository> {
        Arc::new(SqliteAttemptRepository::new(self.pool.clone()))
    }

    fn events(&self) -> Arc<SqliteProgressEventRepository> {
        Arc::new(SqliteProgressEventRepository::new(self.pool.clone()))
    }

    fn templates(&self) -> Arc<SqliteTemplateRepository> {
        Arc::new(SqliteTemplateRepository::new(self.pool.clone()))
    }

    fn profiles(&self) -> Arc<SqliteProfileRepository> {
        Arc::new(SqliteProfileRepository::new(self.pool.clone()))
    }

    fn configs(&self) -> Arc<SqliteRecommendationConfigRepository> {
        Arc::new(SqliteRecommendationConfigRepository::new(self.pool.clone()))
    }

    fn arsenal(&self) -> Arc<SqliteArsenalRepository> {
        Arc::new(SqliteArsenalRepository::new(self.pool.clone()))
    }

    /// Task CRUD for the configured owner.
    pub fn task_service(&self) -> TaskService<SqliteTaskRepository> {
        TaskService::new(self.tasks(), self.owner())
    }

    /// Attempt lifecycle for the configured owner.
    pub fn attempt_service(&self) -> AttemptService {
        AttemptService::new(
            self.attempts(),
            self.events(),
            Arc::new(SqliteAttemptEntryRepository::new(self.pool.clone())),
            self.tasks(),
            self.owner(),
        )
    }

    /// Task ranking for the configured owner.
    pub fn recommendation_service(&self) -> TaskRecommendationService {
        TaskRecommendationService::new(
            self.tasks(),
            self.attempts(),
            self.configs(),
            self.profiles(),
            self.arsenal(),
            self.owner(),
        )
    }

    /// Quest templates and quest starts.
    pub fn provisioning_service(&self) -> TemplateProvisioningService {
        TemplateProvisioningService::new(
            self.tasks(),
            self.attempts(),
            self.events(),
            self.templates(),
            self.profiles(),
            self.arsenal(),
            self.owner(),
            self.config.planning.default_minutes,
        )
    }

    /// Template CRUD.
    pub fn template_service(&self) -> TemplateService {
        TemplateService::new(self.templates(), self.tasks(), self.owner())
    }

    /// Arsenal CRUD.
    pub fn arsenal_service(&self) -> ArsenalService<SqliteArsenalRepository> {
        ArsenalService::new(self.arsenal(), self.owner())
    }

    /// Profile and scoring weights.
    pub fn profile_service(&self) -> ProfileService {
        ProfileService::new(self.profiles(), self.configs(), self.owner())
    }

    /// Weekly review.
    pub fn review_service(&self) -> WeeklyReviewService {
        WeeklyReviewService::new(self.attempts(), self.events(), self.owner())
    }
}
