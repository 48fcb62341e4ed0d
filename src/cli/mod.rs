//! Command-line interface.

pub mod commands;
pub mod context;
pub mod output;

use clap::{Parser, Subcommand};
use console::style;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Energy, EventType, TaskStatus};

/// Command-line entry point.
#[derive(Parser, Debug)]
#[command(name = "paintquest", version, about = "Plan painting sessions and track attempts")]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the project directory, config and database
    Init(commands::init::InitArgs),
    /// Manage backlog tasks
    Task(commands::task::TaskArgs),
    /// Record attempts and their lifecycle events
    Attempt(commands::attempt::AttemptArgs),
    /// Work on a task as a quest
    Quest(commands::quest::QuestArgs),
    /// Recommend tasks for a time budget
    Recommend(commands::recommend::RecommendArgs),
    /// Manage attempt templates
    Template(commands::template::TemplateArgs),
    /// Manage tools and paints
    Arsenal(commands::arsenal::ArsenalArgs),
    /// Painter profile and recommendation tuning
    Profile(commands::profile::ProfileArgs),
    /// Completions over the last week
    Review(commands::review::ReviewArgs),
    /// Print a suggested tag vocabulary
    Tags(commands::tags::TagsArgs),
}

/// Print an error and exit with a code derived from its kind.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    let kind = err
        .chain()
        .find_map(|cause| cause.downcast_ref::<DomainError>())
        .map(DomainError::kind);

    if json_mode {
        let body = serde_json::json!({
            "error": err.to_string(),
            "status": kind.map(|k| k.http_status()),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", style("error:").red().bold());
    }

    std::process::exit(kind.map_or(1, |k| k.exit_code()));
}

/// Parse an event type argument such as `completed`.
pub fn parse_event_type(value: &str) -> DomainResult<EventType> {
    EventType::from_str(value.trim()).ok_or_else(|| DomainError::validation("Invalid event type"))
}

/// Parse an energy argument: `low`, `med` or `high`.
pub fn parse_energy(value: &str) -> DomainResult<Energy> {
    Energy::from_str(value.trim()).ok_or_else(|| DomainError::validation("Invalid energy"))
}

/// Parse a task status argument.
pub fn parse_status(value: &str) -> DomainResult<TaskStatus> {
    TaskStatus::from_str(value.trim()).ok_or_else(|| DomainError::validation("Invalid status"))
}

/// Parse a JSON argument, falling back to a plain string value.
pub fn parse_json_or_text(value: &str) -> serde_json::Value {
    serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_event_type_is_exact() {
        assert_eq!(parse_event_type("COMPLETED").unwrap(), EventType::Completed);
        let err = parse_event_type("completed").unwrap_err();
        assert_eq!(err.to_string(), "Invalid event type");
        assert_eq!(err.kind().http_status(), 400);
    }

    #[test]
    fn test_parse_energy_and_status() {
        assert_eq!(parse_energy("High").unwrap(), Energy::High);
        assert!(parse_energy("sleepy").is_err());
        assert_eq!(parse_status("someday").unwrap(), TaskStatus::Someday);
    }

    #[test]
    fn test_parse_json_or_text() {
        assert_eq!(parse_json_or_text(r#"{"note":"base done"}"#), json!({"note": "base done"}));
        assert_eq!(parse_json_or_text("base done"), json!("base done"));
        assert_eq!(parse_json_or_text("null"), serde_json::Value::Null);
    }
}
