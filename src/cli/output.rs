//! Output formatting utilities for the CLI.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use console::{style, StyledObject};
use serde::Serialize;

use crate::domain::models::{AttemptState, TaskStatus};

/// A command result that renders as JSON or as text.
pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Print a result in the selected mode.
pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate to at most `max_len` characters, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Borderless list table with upper-case headers.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

/// Render a table under a count line, or a "No ... found." line.
pub fn render_list(entity_name: &str, table: &Table, total: usize) -> String {
    if total == 0 {
        return format!("No {entity_name}s found.");
    }
    let noun = if total == 1 {
        entity_name.to_string()
    } else {
        format!("{entity_name}s")
    };
    format!("{} {noun}:\n{table}", style(total).bold())
}

/// Colour an attempt state for terminal output.
pub fn style_state(state: AttemptState) -> StyledObject<&'static str> {
    let label = state.as_str();
    match state {
        AttemptState::InProgress => style(label).yellow(),
        AttemptState::Completed => style(label).green().bold(),
        AttemptState::Abandoned => style(label).dim(),
        AttemptState::Invalid => style(label).red().bold(),
        AttemptState::NotStarted => style(label).blue(),
    }
}

/// Colour a task status for terminal output.
pub fn style_status(status: TaskStatus) -> StyledObject<&'static str> {
    let label = status.as_str();
    match status {
        TaskStatus::Done => style(label).green(),
        TaskStatus::Archived => style(label).dim(),
        _ => style(label).white(),
    }
}

/// Acknowledgement for a delete.
#[derive(Debug, Serialize)]
pub struct Removed {
    /// Id of the deleted record.
    pub id: uuid::Uuid,
    /// Always true.
    pub removed: bool,
}

impl Removed {
    /// Acknowledge a delete of `id`.
    pub const fn new(id: uuid::Uuid) -> Self {
        Self { id, removed: true }
    }
}

impl CommandOutput for Removed {
    fn to_human(&self) -> String {
        format!("Removed {}", self.id)
    }
}

/// Tags joined with `, `, or `-` when empty.
pub fn join_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        "-".to_string()
    } else {
        tags.join(", ")
    }
}

/// Render an estimate such as `30-60 min`.
pub fn format_range(min: Option<i64>, max: Option<i64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("{min}-{max} min"),
        (Some(min), None) => format!("{min}+ min"),
        (None, Some(max)) => format!("up to {max} min"),
        (None, None) => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("Blood Angels sergeant", 10), "Blood A...");
        assert_eq!(truncate("ééééééé", 5), "éé...");
    }

    #[test]
    fn test_render_empty_list() {
        let table = list_table(&["id"]);
        assert_eq!(render_list("task", &table, 0), "No tasks found.");
    }

    #[test]
    fn test_format_range() {
        assert_eq!(format_range(Some(20), Some(40)), "20-40 min");
        assert_eq!(format_range(None, Some(15)), "up to 15 min");
        assert_eq!(format_range(None, None), "-");
    }
}
