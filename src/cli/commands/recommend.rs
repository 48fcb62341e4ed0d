//! `paintquest recommend`: rank backlog tasks for a session length.

use anyhow::Result;
use clap::Args;
use comfy_table::Cell;
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::output::{list_table, output, render_list, truncate, CommandOutput};
use crate::domain::models::Config;
use crate::services::TaskRecommendation;

/// Recommend tasks for a session
#[derive(Args, Debug)]
pub struct RecommendArgs {
    /// Minutes available for the session
    pub minutes: u32,
}

/// Ranked task recommendations.
#[derive(Debug, Serialize)]
pub struct RecommendOutput {
    /// Minutes the ranking was made for.
    pub minutes: u32,
    /// Best first.
    pub recommendations: Vec<TaskRecommendation>,
}

impl CommandOutput for RecommendOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["score", "id", "task", "reasons"]);
        for rec in &self.recommendations {
            table.add_row(vec![
                Cell::new(format!("{:.2}", rec.score)),
                Cell::new(&rec.task.id.to_string()[..8]),
                Cell::new(truncate(&rec.task.title, 32)),
                Cell::new(rec.reasons.join("; ")),
            ]);
        }
        render_list("recommendation", &table, self.recommendations.len())
    }
}

/// Rank tasks for the given session length.
pub async fn execute(args: RecommendArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;
    let recommendations = ctx.recommendation_service().recommend_tasks(args.minutes).await?;
    output(
        &RecommendOutput {
            minutes: args.minutes,
            recommendations,
        },
        json_mode,
    );
    Ok(())
}
