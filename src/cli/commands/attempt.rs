//! Attempt CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Cell;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::context::AppContext;
use crate::cli::output::{list_table, output, render_list, style_state, truncate, CommandOutput};
use crate::cli::{parse_event_type, parse_json_or_text};
use crate::domain::models::{AttemptEntry, Config, DerivedAttemptState};
use crate::services::{AttemptDetails, AttemptSummary, RecordedEvent};

/// Record and inspect attempts
#[derive(Args, Debug)]
pub struct AttemptArgs {
    /// Attempt subcommand
    #[command(subcommand)]
    pub command: AttemptCommands,
}

/// Attempt subcommands
#[derive(Subcommand, Debug)]
pub enum AttemptCommands {
    /// Create an attempt
    Create {
        /// Record ATTEMPT_STARTED immediately
        #[arg(long)]
        start: bool,
        /// Link the attempt to a task
        #[arg(long)]
        task: Option<Uuid>,
    },
    /// Append a lifecycle event
    Event {
        id: Uuid,
        /// ATTEMPT_STARTED, PROGRESS_RECORDED, COMPLETED or ABANDONED
        event_type: String,
        /// JSON payload, e.g. '{"template_id": "..."}'
        #[arg(long)]
        payload: Option<String>,
    },
    /// Show an attempt with its events and entries
    Show { id: Uuid },
    /// List attempts with their derived state
    List,
    /// Add a journal entry
    Note {
        id: Uuid,
        /// Entry type, e.g. note or photo
        entry_type: String,
        /// Entry content; JSON is kept as-is, anything else becomes a string
        content: String,
    },
    /// List journal entries, newest first
    Entries { id: Uuid },
}

fn derived_lines(derived: &DerivedAttemptState) -> Vec<String> {
    let actions: Vec<&str> = derived.allowed_actions.iter().map(|a| a.as_str()).collect();
    vec![
        format!("State: {}", style_state(derived.derived_state)),
        format!("Reasoning: {}", derived.reasoning),
        format!(
            "Allowed actions: {}",
            if actions.is_empty() { "-".to_string() } else { actions.join(", ") }
        ),
    ]
}

impl CommandOutput for AttemptSummary {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Attempt: {}", self.attempt.id)];
        if let Some(task_id) = self.attempt.task_id {
            lines.push(format!("Task: {task_id}"));
        }
        lines.extend(derived_lines(&self.derived));
        lines.join("\n")
    }
}

impl CommandOutput for RecordedEvent {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Recorded {} at {}",
            self.event.event_type,
            self.event.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        )];
        lines.extend(derived_lines(&self.derived));
        lines.join("\n")
    }
}

impl CommandOutput for AttemptDetails {
    fn to_human(&self) -> String {
        let mut lines = vec![format!("Attempt: {}", self.attempt.id)];
        if let Some(task_id) = self.attempt.task_id {
            lines.push(format!("Task: {task_id}"));
        }
        lines.push(format!("Created: {}", self.attempt.created_at.format("%Y-%m-%d %H:%M UTC")));
        lines.extend(derived_lines(&self.derived));

        if !self.events.is_empty() {
            lines.push("\nEvents:".to_string());
            for event in &self.events {
                let payload = event.payload.as_ref().map(|p| format!(" {p}")).unwrap_or_default();
                lines.push(format!(
                    "  {} {}{}",
                    event.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    event.event_type,
                    truncate(&payload, 60)
                ));
            }
        }
        if !self.entries.is_empty() {
            lines.push("\nEntries:".to_string());
            for entry in &self.entries {
                lines.push(format!("  [{}] {}", entry.entry_type, truncate(&entry.content.to_string(), 60)));
            }
        }
        lines.join("\n")
    }
}

/// Listing of attempts with their derived state.
#[derive(Debug, Serialize)]
pub struct AttemptListOutput {
    /// Attempts, newest first.
    pub attempts: Vec<AttemptSummary>,
    /// Number of attempts listed.
    pub total: usize,
}

impl CommandOutput for AttemptListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "task", "state", "created"]);
        for summary in &self.attempts {
            table.add_row(vec![
                Cell::new(&summary.attempt.id.to_string()[..8]),
                Cell::new(
                    summary
                        .attempt
                        .task_id
                        .map_or_else(|| "-".to_string(), |id| id.to_string()[..8].to_string()),
                ),
                Cell::new(style_state(summary.derived.derived_state)),
                Cell::new(summary.attempt.created_at.format("%Y-%m-%d %H:%M")),
            ]);
        }
        render_list("attempt", &table, self.total)
    }
}

/// Journal entries of one attempt.
#[derive(Debug, Serialize)]
pub struct EntryListOutput {
    /// Entries, newest first.
    pub entries: Vec<AttemptEntry>,
    /// Number of entries listed.
    pub total: usize,
}

impl CommandOutput for EntryListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["created", "type", "content"]);
        for entry in &self.entries {
            table.add_row(vec![
                Cell::new(entry.created_at.format("%Y-%m-%d %H:%M")),
                Cell::new(&entry.entry_type),
                Cell::new(truncate(&entry.content.to_string(), 60)),
            ]);
        }
        render_list("entry", &table, self.total)
    }
}

impl CommandOutput for AttemptEntry {
    fn to_human(&self) -> String {
        format!("Added {} entry to attempt {}", self.entry_type, self.attempt_id)
    }
}

/// Run an attempt subcommand.
pub async fn execute(args: AttemptArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;
    let service = ctx.attempt_service();

    match args.command {
        AttemptCommands::Create { start, task } => {
            let summary = service.create_attempt(start, task).await?;
            output(&summary, json_mode);
        }

        AttemptCommands::Event { id, event_type, payload } => {
            let event_type = parse_event_type(&event_type)?;
            let payload = payload.as_deref().map(parse_json_or_text);
            let recorded = service.append_event(id, event_type, payload).await?;
            output(&recorded, json_mode);
        }

        AttemptCommands::Show { id } => {
            let details = service.get_attempt_details(id).await?;
            output(&details, json_mode);
        }

        AttemptCommands::List => {
            let attempts = service.list_attempts().await?;
            output(
                &AttemptListOutput {
                    total: attempts.len(),
                    attempts,
                },
                json_mode,
            );
        }

        AttemptCommands::Note { id, entry_type, content } => {
            let entry = service.add_entry(id, &entry_type, parse_json_or_text(&content)).await?;
            output(&entry, json_mode);
        }

        AttemptCommands::Entries { id } => {
            let entries = service.list_entries(id).await?;
            output(
                &EntryListOutput {
                    total: entries.len(),
                    entries,
                },
                json_mode,
            );
        }
    }

    Ok(())
}
