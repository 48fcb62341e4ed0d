//! Attempt commands and queries.
//!
//! Every write validates against the state derived from the attempt's event
//! log. Nothing here stores a status; the log is the only source of truth.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Attempt, AttemptEntry, AttemptState, DerivedAttemptState, EventType, ProgressEvent, TaskStatus,
};
use crate::domain::ports::{AttemptEntryRepository, AttemptRepository, ProgressEventRepository, TaskRepository};
use crate::services::attempt_state::derive_attempt_state;
use crate::services::authenticated;

/// An attempt together with the state derived from its log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptSummary {
    /// The attempt.
    pub attempt: Attempt,
    /// State derived from its log.
    pub derived: DerivedAttemptState,
}

/// Everything known about one attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptDetails {
    /// The attempt.
    pub attempt: Attempt,
    /// Ascending by timestamp, then store sequence.
    pub events: Vec<ProgressEvent>,
    /// Newest first.
    pub entries: Vec<AttemptEntry>,
    /// State derived from `events`.
    pub derived: DerivedAttemptState,
}

/// Result of a successful append.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedEvent {
    /// The stored event, sequence filled in.
    pub event: ProgressEvent,
    /// State after the append.
    pub derived: DerivedAttemptState,
}

/// Attempt lifecycle: creation, event appends and derivation.
pub struct AttemptService {
    attempts: Arc<dyn AttemptRepository>,
    events: Arc<dyn ProgressEventRepository>,
    entries: Arc<dyn AttemptEntryRepository>,
    tasks: Arc<dyn TaskRepository>,
    owner: Option<String>,
    /// Serialises event writes: history load, both checks, and the append.
    write_lock: Mutex<()>,
}

impl AttemptService {
    /// Wire the service to its stores.
    pub fn new(
        attempts: Arc<dyn AttemptRepository>,
        events: Arc<dyn ProgressEventRepository>,
        entries: Arc<dyn AttemptEntryRepository>,
        tasks: Arc<dyn TaskRepository>,
        owner: Option<String>,
    ) -> Self {
        Self {
            attempts,
            events,
            entries,
            tasks,
            owner,
            write_lock: Mutex::new(()),
        }
    }

    /// Append a lifecycle event after checking it against the derived state.
    #[instrument(skip(self, payload))]
    pub async fn append_event(
        &self,
        attempt_id: Uuid,
        event_type: EventType,
        payload: Option<serde_json::Value>,
    ) -> DomainResult<RecordedEvent> {
        let owner = authenticated(self.owner.as_deref())?;
        let attempt = self.owned_attempt(owner, attempt_id).await?;

        let guard = self.write_lock.lock().await;
        let mut history = self.load_events(attempt_id).await?;
        let derived = derive_attempt_state(&history);
        if derived.derived_state == AttemptState::Invalid {
            warn!(%attempt_id, reasoning = %derived.reasoning, "refusing event on invalid history");
            return Err(DomainError::InvalidHistory(derived.reasoning));
        }
        if !derived.allowed_actions.contains(&event_type) {
            return Err(DomainError::ActionNotAllowed(event_type));
        }

        if event_type == EventType::AttemptStarted {
            self.ensure_no_active_attempt(owner, Some(attempt_id)).await?;
        }
        let stored = self.record(attempt_id, event_type, payload).await?;
        drop(guard);

        if let Some(task_id) = attempt.task_id {
            self.sync_task_status(task_id, event_type).await;
        }

        history.push(stored.clone());
        let derived = derive_attempt_state(&history);
        info!(%attempt_id, state = %derived.derived_state, "recorded event");

        Ok(RecordedEvent { event: stored, derived })
    }

    /// Create a standalone attempt, optionally starting it straight away.
    #[instrument(skip(self))]
    pub async fn create_attempt(&self, auto_start: bool, task_id: Option<Uuid>) -> DomainResult<AttemptSummary> {
        let owner = authenticated(self.owner.as_deref())?;
        if let Some(task_id) = task_id {
            self.owned_task(owner, task_id, DomainError::TaskNotFound(task_id)).await?;
        }

        let _guard = self.write_lock.lock().await;
        self.ensure_no_active_attempt(owner, None).await?;

        let mut attempt = Attempt::new(owner);
        attempt.task_id = task_id;

        let mut events = Vec::new();
        if auto_start {
            let started = ProgressEvent::new(attempt.id, EventType::AttemptStarted, None);
            let stored = self
                .attempts
                .create_with_event(&attempt, &started)
                .await
                .map_err(|e| DomainError::store("Failed to start attempt", e))?;
            events.push(stored);
        } else {
            self.attempts
                .create(&attempt)
                .await
                .map_err(|e| DomainError::store("Failed to create attempt", e))?;
        }

        let derived = derive_attempt_state(&events);
        info!(attempt_id = %attempt.id, state = %derived.derived_state, "created attempt");
        Ok(AttemptSummary { attempt, derived })
    }

    /// Open a new attempt against one of the owner's tasks. The attempt is
    /// left in `NONE` until explicitly started.
    #[instrument(skip(self))]
    pub async fn start_quest(&self, task_id: Uuid) -> DomainResult<AttemptSummary> {
        let owner = authenticated(self.owner.as_deref())?;
        self.owned_task(owner, task_id, DomainError::QuestNotFound(task_id)).await?;

        let attempt = Attempt::new(owner).with_task(task_id);
        self.attempts
            .create(&attempt)
            .await
            .map_err(|e| DomainError::store("Failed to create quest", e))?;

        info!(attempt_id = %attempt.id, %task_id, "opened quest attempt");
        Ok(AttemptSummary {
            attempt,
            derived: derive_attempt_state(&[]),
        })
    }

    /// Attempt with events, entries and derived state.
    pub async fn get_attempt_details(&self, attempt_id: Uuid) -> DomainResult<AttemptDetails> {
        let owner = authenticated(self.owner.as_deref())?;
        let attempt = self.owned_attempt(owner, attempt_id).await?;

        let mut events = self.load_events(attempt_id).await?;
        events.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.sequence.cmp(&b.sequence)));

        let entries = self
            .entries
            .list_for_attempt(attempt_id)
            .await
            .map_err(|e| DomainError::store("Failed to load entries", e))?;

        let derived = derive_attempt_state(&events);
        Ok(AttemptDetails {
            attempt,
            events,
            entries,
            derived,
        })
    }

    /// Every attempt of the owner, newest first, with its derived state.
    pub async fn list_attempts(&self) -> DomainResult<Vec<AttemptSummary>> {
        let owner = authenticated(self.owner.as_deref())?;
        let attempts = self
            .attempts
            .list_for_user(owner)
            .await
            .map_err(|e| DomainError::store("Failed to load attempts", e))?;

        let mut by_attempt = self.events_by_attempt(&attempts).await?;
        Ok(attempts
            .into_iter()
            .map(|attempt| {
                let events = by_attempt.remove(&attempt.id).unwrap_or_default();
                AttemptSummary {
                    derived: derive_attempt_state(&events),
                    attempt,
                }
            })
            .collect())
    }

    /// Add a journal entry. Entries never affect the derived state.
    pub async fn add_entry(
        &self,
        attempt_id: Uuid,
        entry_type: &str,
        content: serde_json::Value,
    ) -> DomainResult<AttemptEntry> {
        let owner = authenticated(self.owner.as_deref())?;

        let entry_type = entry_type.trim();
        if entry_type.is_empty() {
            return Err(DomainError::validation("Entry type is required"));
        }
        if content.is_null() {
            return Err(DomainError::validation("Entry content is required"));
        }

        self.owned_attempt(owner, attempt_id).await?;

        let entry = AttemptEntry::new(attempt_id, owner, entry_type, content);
        self.entries
            .create(&entry)
            .await
            .map_err(|e| DomainError::store("Failed to create entry", e))?;

        debug!(%attempt_id, entry_type, "added entry");
        Ok(entry)
    }

    /// Journal entries of an owned attempt, newest first.
    pub async fn list_entries(&self, attempt_id: Uuid) -> DomainResult<Vec<AttemptEntry>> {
        let owner = authenticated(self.owner.as_deref())?;
        self.owned_attempt(owner, attempt_id).await?;
        self.entries
            .list_for_attempt(attempt_id)
            .await
            .map_err(|e| DomainError::store("Failed to load entries", e))
    }

    async fn owned_attempt(&self, owner: &str, attempt_id: Uuid) -> DomainResult<Attempt> {
        self.attempts
            .get(attempt_id)
            .await
            .map_err(|e| DomainError::store("Failed to load attempt", e))?
            .filter(|attempt| attempt.user_id == owner)
            .ok_or(DomainError::AttemptNotFound(attempt_id))
    }

    async fn owned_task(&self, owner: &str, task_id: Uuid, missing: DomainError) -> DomainResult<()> {
        let task = self
            .tasks
            .get(task_id)
            .await
            .map_err(|e| DomainError::store("Failed to load task", e))?;

        match task {
            Some(task) if task.user_id == owner => Ok(()),
            _ => Err(missing),
        }
    }

    async fn load_events(&self, attempt_id: Uuid) -> DomainResult<Vec<ProgressEvent>> {
        self.events
            .list_for_attempt(attempt_id)
            .await
            .map_err(|e| DomainError::store("Failed to load events", e))
    }

    async fn events_by_attempt(&self, attempts: &[Attempt]) -> DomainResult<HashMap<Uuid, Vec<ProgressEvent>>> {
        let ids: Vec<Uuid> = attempts.iter().map(|a| a.id).collect();
        let events = self
            .events
            .list_for_attempts(&ids)
            .await
            .map_err(|e| DomainError::store("Failed to load events", e))?;

        let mut grouped: HashMap<Uuid, Vec<ProgressEvent>> = HashMap::new();
        for event in events {
            grouped.entry(event.attempt_id).or_default().push(event);
        }
        Ok(grouped)
    }

    /// Fails if any of the owner's attempts, other than `except`, is in progress.
    async fn ensure_no_active_attempt(&self, owner: &str, except: Option<Uuid>) -> DomainResult<()> {
        let attempts: Vec<Attempt> = self
            .attempts
            .list_for_user(owner)
            .await
            .map_err(|e| DomainError::store("Failed to load attempts", e))?
            .into_iter()
            .filter(|attempt| Some(attempt.id) != except)
            .collect();

        let by_attempt = self.events_by_attempt(&attempts).await?;
        let active = by_attempt
            .values()
            .find(|events| derive_attempt_state(events).derived_state == AttemptState::InProgress);

        if let Some(events) = active {
            let active_id = events.first().map(|e| e.attempt_id);
            warn!(?active_id, "another attempt is in progress");
            return Err(DomainError::AttemptAlreadyActive);
        }
        Ok(())
    }

    async fn record(
        &self,
        attempt_id: Uuid,
        event_type: EventType,
        payload: Option<serde_json::Value>,
    ) -> DomainResult<ProgressEvent> {
        self.events
            .append(&ProgressEvent::new(attempt_id, event_type, payload))
            .await
            .map_err(|e| DomainError::store("Failed to record event", e))
    }

    /// Mirror a terminal event onto the linked task. The event is already
    /// recorded, so a failure here is logged rather than returned.
    async fn sync_task_status(&self, task_id: Uuid, event_type: EventType) {
        let status = match event_type {
            EventType::Completed => TaskStatus::Done,
            EventType::Abandoned => TaskStatus::Archived,
            EventType::AttemptStarted | EventType::ProgressRecorded => return,
        };

        if let Err(err) = self.tasks.update_status(task_id, status, chrono::Utc::now()).await {
            warn!(%task_id, error = %err, "failed to update task status");
        }
    }
}
