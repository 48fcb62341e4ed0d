//! Quest CLI commands: attempts and template suggestions for one task.

use anyhow::Result;
use clap::{Args, Subcommand};
use comfy_table::Cell;
use uuid::Uuid;

use crate::cli::context::AppContext;
use crate::cli::output::{list_table, output, render_list, truncate, CommandOutput};
use crate::cli::parse_energy;
use crate::domain::models::Config;
use crate::services::QuestRecommendations;

/// Quest recommendations and starts
#[derive(Args, Debug)]
pub struct QuestArgs {
    /// Quest subcommand
    #[command(subcommand)]
    pub command: QuestCommands,
}

/// Quest subcommands
#[derive(Subcommand, Debug)]
pub enum QuestCommands {
    /// Open a new attempt against a task
    Start { task_id: Uuid },
    /// Suggest attempt templates for a task, provisioning defaults if needed
    Suggest {
        task_id: Uuid,
        /// Minutes available; the configured default when omitted
        #[arg(short, long)]
        minutes: Option<u32>,
        /// low, med or high; the profile preference when omitted
        #[arg(short, long)]
        energy: Option<String>,
    },
}

impl CommandOutput for QuestRecommendations {
    fn to_human(&self) -> String {
        let mut table = list_table(&["score", "template", "minutes", "energy", "reasons"]);
        for rec in &self.recommendations {
            table.add_row(vec![
                Cell::new(format!("{:.2}", rec.score)),
                Cell::new(truncate(&rec.template.title, 40)),
                Cell::new(rec.recommended_minutes),
                Cell::new(rec.template.energy),
                Cell::new(rec.reasons.join("; ")),
            ]);
        }
        format!(
            "{} minutes, {} energy, {} unplayed template(s)\n{}",
            self.meta.available_minutes,
            self.meta.energy,
            self.meta.template_count,
            render_list("suggestion", &table, self.recommendations.len())
        )
    }
}

/// Run a quest subcommand.
pub async fn execute(args: QuestArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;

    match args.command {
        QuestCommands::Start { task_id } => {
            let summary = ctx.attempt_service().start_quest(task_id).await?;
            output(&summary, json_mode);
        }

        QuestCommands::Suggest { task_id, minutes, energy } => {
            let energy = energy.as_deref().map(parse_energy).transpose()?;
            let result = ctx
                .provisioning_service()
                .recommend_for_quest(task_id, minutes, energy)
                .await?;
            output(&result, json_mode);
        }
    }

    Ok(())
}
