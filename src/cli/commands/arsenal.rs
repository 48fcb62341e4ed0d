//! Arsenal CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use comfy_table::Cell;
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

use crate::cli::context::AppContext;
use crate::cli::output::{join_tags, list_table, output, render_list, truncate, CommandOutput, Removed};
use crate::domain::models::{split_tags, ArsenalItem, Config, PaintRow};
use crate::services::ArsenalUpdate;

/// Manage paints and tools
#[derive(Args, Debug)]
pub struct ArsenalArgs {
    /// Arsenal subcommand
    #[command(subcommand)]
    pub command: ArsenalCommands,
}

/// Arsenal subcommands
#[derive(Subcommand, Debug)]
pub enum ArsenalCommands {
    /// List items, most recently updated first
    List {
        /// Only items currently available
        #[arg(long)]
        available: bool,
    },
    /// Add an item
    Add {
        /// Grouping such as brush, tool or paint
        category: String,
        name: String,
        /// Comma separated tags
        #[arg(long)]
        tags: Option<String>,
    },
    /// Update an item
    Update {
        id: Uuid,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        available: Option<bool>,
    },
    /// Delete an item
    Remove { id: Uuid },
    /// Import paints from a JSON array of {color, brand?, medium?, available?}
    Import { file: PathBuf },
}

/// Listing of arsenal items.
#[derive(Debug, Serialize)]
pub struct ArsenalListOutput {
    /// Items in display order.
    pub items: Vec<ArsenalItem>,
    /// Number of items listed.
    pub total: usize,
}

impl CommandOutput for ArsenalListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "category", "name", "tags", "available"]);
        for item in &self.items {
            table.add_row(vec![
                Cell::new(&item.id.to_string()[..8]),
                Cell::new(&item.category),
                Cell::new(truncate(&item.name, 32)),
                Cell::new(join_tags(&item.tags)),
                Cell::new(if item.available { "yes" } else { "no" }),
            ]);
        }
        render_list("item", &table, self.total)
    }
}

impl CommandOutput for ArsenalItem {
    fn to_human(&self) -> String {
        format!(
            "{} [{}] {} ({})",
            self.id,
            self.category,
            self.name,
            if self.available { "available" } else { "unavailable" }
        )
    }
}

/// Result of a bulk paint import.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutput {
    /// Rows that were stored.
    pub items: Vec<ArsenalItem>,
    /// How many rows were stored.
    pub inserted: usize,
}

impl CommandOutput for ImportOutput {
    fn to_human(&self) -> String {
        format!("Imported {} paint(s)", self.inserted)
    }
}

/// Run an arsenal subcommand.
pub async fn execute(args: ArsenalArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;
    let service = ctx.arsenal_service();

    match args.command {
        ArsenalCommands::List { available } => {
            let items = service.list_items(available).await?;
            output(
                &ArsenalListOutput {
                    total: items.len(),
                    items,
                },
                json_mode,
            );
        }

        ArsenalCommands::Add { category, name, tags } => {
            let tags = tags.as_deref().map(split_tags).unwrap_or_default();
            let item = service.create_item(&category, &name, tags).await?;
            output(&item, json_mode);
        }

        ArsenalCommands::Update {
            id,
            category,
            name,
            tags,
            available,
        } => {
            let update = ArsenalUpdate {
                category,
                name,
                tags: tags.as_deref().map(split_tags),
                available,
            };
            let item = service.update_item(id, update).await?;
            output(&item, json_mode);
        }

        ArsenalCommands::Remove { id } => {
            service.delete_item(id).await?;
            output(&Removed::new(id), json_mode);
        }

        ArsenalCommands::Import { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let rows: Vec<PaintRow> = serde_json::from_str(&raw).context("Paint rows must be a JSON array")?;
            let items = service.import_paints(rows).await?;
            output(
                &ImportOutput {
                    inserted: items.len(),
                    items,
                },
                json_mode,
            );
        }
    }

    Ok(())
}
