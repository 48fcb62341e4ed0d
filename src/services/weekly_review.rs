//! Completed attempts over the trailing week.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{AttemptState, EventType, ProgressEvent};
use crate::domain::ports::{AttemptRepository, ProgressEventRepository};
use crate::services::attempt_state::derive_attempt_state;
use crate::services::authenticated;

/// Length of the review window in days.
pub const REVIEW_WINDOW_DAYS: i64 = 7;

/// One attempt completed inside the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedAttempt {
    /// The attempt.
    pub attempt_id: Uuid,
    /// Its task, if any.
    pub task_id: Option<Uuid>,
    /// Timestamp of the completion event.
    pub completed_at: DateTime<Utc>,
}

/// Summary of the last [`REVIEW_WINDOW_DAYS`] days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReview {
    /// Start of the window.
    pub since: DateTime<Utc>,
    /// Number of completed attempts.
    pub count: usize,
    /// Newest attempt first.
    pub completed: Vec<CompletedAttempt>,
}

/// Builds the weekly review from stored attempts and events.
pub struct WeeklyReviewService {
    attempts: Arc<dyn AttemptRepository>,
    events: Arc<dyn ProgressEventRepository>,
    owner: Option<String>,
}

impl WeeklyReviewService {
    /// Wire the service to its stores.
    pub fn new(
        attempts: Arc<dyn AttemptRepository>,
        events: Arc<dyn ProgressEventRepository>,
        owner: Option<String>,
    ) -> Self {
        Self { attempts, events, owner }
    }

    /// Completed attempts in the window ending at `now`.
    pub async fn review(&self, now: DateTime<Utc>) -> DomainResult<WeeklyReview> {
        let owner = authenticated(self.owner.as_deref())?;
        let attempts = self
            .attempts
            .list_for_user(owner)
            .await
            .map_err(|e| DomainError::store("Failed to load attempts", e))?;
        let ids: Vec<Uuid> = attempts.iter().map(|a| a.id).collect();
        let events = self
            .events
            .list_for_attempts(&ids)
            .await
            .map_err(|e| DomainError::store("Failed to load events", e))?;

        let since = now - Duration::days(REVIEW_WINDOW_DAYS);
        let completed: Vec<CompletedAttempt> = attempts
            .iter()
            .filter_map(|attempt| {
                let history: Vec<ProgressEvent> =
                    events.iter().filter(|e| e.attempt_id == attempt.id).cloned().collect();
                let completed_at = completed_at(&history)?;
                (completed_at >= since).then_some(CompletedAttempt {
                    attempt_id: attempt.id,
                    task_id: attempt.task_id,
                    completed_at,
                })
            })
            .collect();

        Ok(WeeklyReview {
            since,
            count: completed.len(),
            completed,
        })
    }
}

/// Timestamp of the latest COMPLETED event, if the attempt derives to COMPLETED.
fn completed_at(history: &[ProgressEvent]) -> Option<DateTime<Utc>> {
    if derive_attempt_state(history).derived_state != AttemptState::Completed {
        return None;
    }
    history
        .iter()
        .filter(|e| e.kind() == Some(EventType::Completed))
        .map(|e| e.timestamp)
        .max()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteAttemptRepository, SqliteProgressEventRepository};
    use crate::domain::models::Attempt;

    #[tokio::test]
    async fn test_counts_recent_completions_only() {
        let pool = create_migrated_test_pool().await.unwrap();
        let attempts = Arc::new(SqliteAttemptRepository::new(pool.clone()));
        let events = Arc::new(SqliteProgressEventRepository::new(pool));
        let now = Utc::now();

        let seed = |offset_days: i64, finish: Option<EventType>| {
            let attempt = Attempt::new("u1");
            let start = now - Duration::days(offset_days) - Duration::hours(1);
            let mut log = vec![ProgressEvent::new(attempt.id, EventType::AttemptStarted, None).at(start)];
            if let Some(finish) = finish {
                log.push(ProgressEvent::new(attempt.id, finish, None).at(now - Duration::days(offset_days)));
            }
            (attempt, log)
        };
        let fixtures = vec![
            seed(1, Some(EventType::Completed)),
            seed(10, Some(EventType::Completed)),
            seed(2, Some(EventType::Abandoned)),
            seed(0, None),
        ];
        for (attempt, log) in &fixtures {
            attempts.create(attempt).await.unwrap();
            for event in log {
                events.append(event).await.unwrap();
            }
        }

        let service = WeeklyReviewService::new(attempts, events, Some("u1".to_string()));
        let review = service.review(now).await.unwrap();
        assert_eq!(review.count, 1);
        assert_eq!(review.completed[0].attempt_id, fixtures[0].0.id);
    }

    #[test]
    fn test_completed_at_requires_completed_state() {
        let id = Uuid::new_v4();
        let t0 = Utc::now();
        let history = vec![
            ProgressEvent::new(id, EventType::AttemptStarted, None).at(t0),
            ProgressEvent::new(id, EventType::Completed, None).at(t0 + Duration::minutes(5)),
            ProgressEvent::new(id, EventType::Completed, None).at(t0 + Duration::minutes(9)),
        ];
        // Two COMPLETED events derive to INVALID.
        assert_eq!(completed_at(&history), None);
        assert_eq!(completed_at(&history[..2]), Some(t0 + Duration::minutes(5)));
    }
}
