//! Attempt template CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Cell;
use serde::Serialize;
use uuid::Uuid;

use crate::cli::context::AppContext;
use crate::cli::output::{
    format_range, join_tags, list_table, output, render_list, truncate, CommandOutput, Removed,
};
use crate::cli::parse_energy;
use crate::domain::models::{split_tags, AttemptTemplate, Config};
use crate::services::{NewTemplate, TemplateUpdate};

/// Manage attempt templates
#[derive(Args, Debug)]
pub struct TemplateArgs {
    /// Template subcommand
    #[command(subcommand)]
    pub command: TemplateCommands,
}

/// Template attributes shared by create and update
#[derive(Args, Debug, Default)]
pub struct TemplateFields {
    /// Longer description
    #[arg(long)]
    pub description: Option<String>,
    /// low, med or high
    #[arg(short, long)]
    pub energy: Option<String>,
    /// Required tools, comma separated
    #[arg(long)]
    pub tools: Option<String>,
    /// Skills practised, comma separated
    #[arg(long)]
    pub skills: Option<String>,
    /// What counts as progress
    #[arg(long)]
    pub progress: Option<String>,
}

/// Template subcommands
#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// List a task's templates plus global ones
    List { task_id: Uuid },
    /// Add a template to a task
    Add {
        task_id: Uuid,
        title: String,
        #[arg(long)]
        min: i64,
        #[arg(long)]
        max: i64,
        #[command(flatten)]
        fields: TemplateFields,
    },
    /// Update a template
    Update {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        min: Option<i64>,
        #[arg(long)]
        max: Option<i64>,
        #[command(flatten)]
        fields: TemplateFields,
    },
    /// Delete a template
    Remove { id: Uuid },
}

/// Listing of templates.
#[derive(Debug, Serialize)]
pub struct TemplateListOutput {
    /// Templates in list order.
    pub templates: Vec<AttemptTemplate>,
    /// Number of templates listed.
    pub total: usize,
}

impl CommandOutput for TemplateListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "title", "time", "energy", "skills", "scope"]);
        for template in &self.templates {
            table.add_row(vec![
                Cell::new(&template.id.to_string()[..8]),
                Cell::new(truncate(&template.title, 40)),
                Cell::new(format_range(
                    Some(template.estimated_minutes_min),
                    Some(template.estimated_minutes_max),
                )),
                Cell::new(template.energy),
                Cell::new(join_tags(&template.focus_skills_tags)),
                Cell::new(if template.task_id.is_some() { "quest" } else { "global" }),
            ]);
        }
        render_list("template", &table, self.total)
    }
}

impl CommandOutput for AttemptTemplate {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("Template: {}", self.title),
            format!("ID: {}", self.id),
            format!(
                "Time: {}",
                format_range(Some(self.estimated_minutes_min), Some(self.estimated_minutes_max))
            ),
            format!("Energy: {}", self.energy),
            format!("Tools: {}", join_tags(&self.required_tools_tags)),
            format!("Skills: {}", join_tags(&self.focus_skills_tags)),
        ];
        if let Some(description) = &self.description {
            lines.push(format!("Description: {description}"));
        }
        if let Some(progress) = &self.progress_value {
            lines.push(format!("Progress: {progress}"));
        }
        lines.join("\n")
    }
}

/// Run a template subcommand.
pub async fn execute(args: TemplateArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;
    let service = ctx.template_service();

    match args.command {
        TemplateCommands::List { task_id } => {
            let templates = service.list_templates(task_id).await?;
            output(
                &TemplateListOutput {
                    total: templates.len(),
                    templates,
                },
                json_mode,
            );
        }

        TemplateCommands::Add {
            task_id,
            title,
            min,
            max,
            fields,
        } => {
            let new = NewTemplate {
                title,
                description: fields.description,
                estimated_minutes_min: min,
                estimated_minutes_max: max,
                energy: fields.energy.as_deref().map(parse_energy).transpose()?.unwrap_or_default(),
                required_tools_tags: fields.tools.as_deref().map(split_tags).unwrap_or_default(),
                focus_skills_tags: fields.skills.as_deref().map(split_tags).unwrap_or_default(),
                progress_value: fields.progress,
            };
            let template = service.create_template(task_id, new).await?;
            output(&template, json_mode);
        }

        TemplateCommands::Update {
            id,
            title,
            min,
            max,
            fields,
        } => {
            let update = TemplateUpdate {
                title,
                description: fields.description,
                estimated_minutes_min: min,
                estimated_minutes_max: max,
                energy: fields.energy.as_deref().map(parse_energy).transpose()?,
                required_tools_tags: fields.tools.as_deref().map(split_tags),
                focus_skills_tags: fields.skills.as_deref().map(split_tags),
                progress_value: fields.progress,
            };
            let template = service.update_template(id, update).await?;
            output(&template, json_mode);
        }

        TemplateCommands::Remove { id } => {
            service.delete_template(id).await?;
            output(&Removed::new(id), json_mode);
        }
    }

    Ok(())
}
