//! `paintquest review`: completions over the trailing week.

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use comfy_table::Cell;

use crate::cli::context::AppContext;
use crate::cli::output::{list_table, output, CommandOutput};
use crate::domain::models::Config;
use crate::services::WeeklyReview;

/// Summarize the last week
#[derive(Args, Debug)]
pub struct ReviewArgs {}

impl CommandOutput for WeeklyReview {
    fn to_human(&self) -> String {
        let headline = format!("{} quest(s) completed this week", self.count);
        if self.completed.is_empty() {
            return format!("{headline}\nNo completions yet.");
        }
        let mut table = list_table(&["attempt", "task", "completed"]);
        for item in &self.completed {
            table.add_row(vec![
                Cell::new(&item.attempt_id.to_string()[..8]),
                Cell::new(item.task_id.map_or_else(|| "-".to_string(), |id| id.to_string()[..8].to_string())),
                Cell::new(item.completed_at.format("%Y-%m-%d %H:%M")),
            ]);
        }
        format!("{headline}\n{table}")
    }
}

/// Print completed attempts from the review window.
pub async fn execute(_args: ReviewArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;
    let review = ctx.review_service().review(Utc::now()).await?;
    output(&review, json_mode);
    Ok(())
}
