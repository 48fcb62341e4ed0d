//! Task CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Cell;
use uuid::Uuid;

use crate::cli::context::AppContext;
use crate::cli::output::{format_range, join_tags, list_table, output, render_list, style_status, truncate, CommandOutput};
use crate::cli::parse_status;
use crate::domain::models::{split_tags, Config, Task};
use crate::services::{NewTask, TaskUpdate};

/// Manage painting tasks
#[derive(Args, Debug)]
pub struct TaskArgs {
    /// Task subcommand
    #[command(subcommand)]
    pub command: TaskCommands,
}

/// Task attributes shared by create and update
#[derive(Args, Debug, Default)]
pub struct TaskFields {
    /// Game system
    #[arg(long)]
    pub game: Option<String>,
    /// Manufacturer
    #[arg(long)]
    pub mfg: Option<String>,
    /// Lower estimate in minutes
    #[arg(long)]
    pub min: Option<i64>,
    /// Upper estimate in minutes
    #[arg(long)]
    pub max: Option<i64>,
    /// Priority from 1 to 5
    #[arg(short, long)]
    pub priority: Option<i64>,
    /// Required tools, comma separated
    #[arg(long)]
    pub tools: Option<String>,
    /// Skills practised, comma separated
    #[arg(long)]
    pub skills: Option<String>,
    /// backlog, active, done, someday or archived
    #[arg(short, long)]
    pub status: Option<String>,
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task to the backlog
    Add {
        title: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// List tasks, most recently updated first
    List {
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show task details
    Show { id: Uuid },
    /// Update task fields
    Update {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Archive a task
    Archive { id: Uuid },
}

/// Listing of tasks.
#[derive(Debug, serde::Serialize)]
pub struct TaskListOutput {
    /// Tasks in list order.
    pub tasks: Vec<Task>,
    /// Number of tasks listed.
    pub total: usize,
}

impl CommandOutput for TaskListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "title", "status", "priority", "time", "skills"]);
        for task in &self.tasks {
            table.add_row(vec![
                Cell::new(&task.id.to_string()[..8]),
                Cell::new(truncate(&task.title, 32)),
                Cell::new(style_status(task.status)),
                Cell::new(task.priority),
                Cell::new(format_range(task.estimated_minutes_min, task.estimated_minutes_max)),
                Cell::new(truncate(&join_tags(&task.skills_tags), 30)),
            ]);
        }
        render_list("task", &table, self.total)
    }
}

/// A single task.
#[derive(Debug, serde::Serialize)]
pub struct TaskDetailOutput {
    /// The task as stored.
    pub task: Task,
}

impl CommandOutput for TaskDetailOutput {
    fn to_human(&self) -> String {
        let task = &self.task;
        let mut lines = vec![
            format!("Task: {}", task.title),
            format!("ID: {}", task.id),
            format!("Status: {}", style_status(task.status)),
            format!("Priority: {}", task.priority),
            format!(
                "Estimate: {}",
                format_range(task.estimated_minutes_min, task.estimated_minutes_max)
            ),
        ];
        if let Some(game) = &task.game {
            lines.push(format!("Game: {game}"));
        }
        if let Some(mfg) = &task.mfg {
            lines.push(format!("Manufacturer: {mfg}"));
        }
        lines.push(format!("Tools: {}", join_tags(&task.required_tools_tags)));
        lines.push(format!("Skills: {}", join_tags(&task.skills_tags)));
        lines.push(format!("Updated: {}", task.updated_at.format("%Y-%m-%d %H:%M UTC")));
        lines.join("\n")
    }
}

/// Run a task subcommand.
pub async fn execute(args: TaskArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;
    let service = ctx.task_service();

    match args.command {
        TaskCommands::Add { title, fields } => {
            let new = NewTask {
                title,
                game: fields.game,
                mfg: fields.mfg,
                estimated_minutes_min: fields.min,
                estimated_minutes_max: fields.max,
                priority: fields.priority,
                required_tools_tags: fields.tools.as_deref().map(split_tags).unwrap_or_default(),
                skills_tags: fields.skills.as_deref().map(split_tags).unwrap_or_default(),
                status: fields.status.as_deref().map(parse_status).transpose()?,
            };
            let task = service.create_task(new).await?;
            output(&TaskDetailOutput { task }, json_mode);
        }

        TaskCommands::List { status } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let tasks = service.list_tasks(status).await?;
            output(
                &TaskListOutput {
                    total: tasks.len(),
                    tasks,
                },
                json_mode,
            );
        }

        TaskCommands::Show { id } => {
            let task = service.get_task(id).await?;
            output(&TaskDetailOutput { task }, json_mode);
        }

        TaskCommands::Update { id, title, fields } => {
            let update = TaskUpdate {
                title,
                game: fields.game,
                mfg: fields.mfg,
                estimated_minutes_min: fields.min,
                estimated_minutes_max: fields.max,
                priority: fields.priority,
                required_tools_tags: fields.tools.as_deref().map(split_tags),
                skills_tags: fields.skills.as_deref().map(split_tags),
                status: fields.status.as_deref().map(parse_status).transpose()?,
            };
            let task = service.update_task(id, update).await?;
            output(&TaskDetailOutput { task }, json_mode);
        }

        TaskCommands::Archive { id } => {
            let task = service.archive_task(id).await?;
            output(&TaskDetailOutput { task }, json_mode);
        }
    }

    Ok(())
}
