//! Implementation of the `paintquest init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tokio::fs;

use crate::adapters::sqlite::initialize_database;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, DatabaseConfig};
use crate::infrastructure::config::CONFIG_DIR;

/// Initialize a project directory
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force reinitialization even if already initialized
    #[arg(long, short)]
    pub force: bool,

    /// Owner id written to the config
    #[arg(long)]
    pub user: Option<String>,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

/// Outcome of `init`.
#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    /// Whether initialization finished.
    pub success: bool,
    /// Summary line for the user.
    pub message: String,
    /// Project directory that was set up.
    pub initialized_path: PathBuf,
    /// Whether a config file was written.
    pub config_written: bool,
    /// Database that was created or migrated.
    pub database_path: Option<PathBuf>,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if self.config_written {
            lines.push(format!("\nWrote {CONFIG_DIR}/config.yaml"));
        }
        if let Some(path) = &self.database_path {
            lines.push(format!("Database initialized at {}", path.display()));
        }
        lines.join("\n")
    }
}

/// Create the config directory, config file and database.
pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };
    let project_dir = target_path.join(CONFIG_DIR);

    if project_dir.exists() && !args.force {
        let out = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            initialized_path: target_path,
            config_written: false,
            database_path: None,
        };
        output(&out, json_mode);
        return Ok(());
    }

    if args.force && project_dir.exists() {
        fs::remove_dir_all(&project_dir)
            .await
            .with_context(|| format!("Failed to remove existing {CONFIG_DIR} directory"))?;
    }
    fs::create_dir_all(&project_dir)
        .await
        .with_context(|| format!("Failed to create {}", project_dir.display()))?;

    let mut config = Config::default();
    config.user.id = args.user.map(|id| id.trim().to_string()).filter(|id| !id.is_empty());
    let yaml = serde_yaml::to_string(&config).context("Failed to serialize config")?;
    fs::write(project_dir.join("config.yaml"), yaml)
        .await
        .context("Failed to write config.yaml")?;

    let db_path = project_dir.join("paintquest.db");
    let database = DatabaseConfig {
        path: db_path.display().to_string(),
        ..config.database.clone()
    };
    let pool = initialize_database(&database)
        .await
        .context("Failed to initialize database")?;
    pool.close().await;

    let out = InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        initialized_path: target_path,
        config_written: true,
        database_path: Some(db_path),
    };
    output(&out, json_mode);
    Ok(())
}
