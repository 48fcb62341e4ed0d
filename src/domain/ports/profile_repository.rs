//! Profile and recommendation config ports.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{Profile, RecommendationConfig};

/// Storage for user profiles.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn get(&self, user_id: &str) -> DomainResult<Option<Profile>>;

    /// Insert or replace the whole profile.
    async fn upsert(&self, profile: &Profile) -> DomainResult<()>;
}

/// Storage for per-user scoring weights.
#[async_trait]
pub trait RecommendationConfigRepository: Send + Sync {
    async fn get(&self, user_id: &str) -> DomainResult<Option<RecommendationConfig>>;

    async fn upsert(&self, config: &RecommendationConfig) -> DomainResult<()>;
}
