//! Profile and recommendation config CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::context::AppContext;
use crate::cli::output::{join_tags, output, CommandOutput};
use crate::cli::parse_energy;
use crate::domain::models::{split_tags, Config, Profile, RecommendationConfig};

/// Manage the profile and scoring weights
#[derive(Args, Debug)]
pub struct ProfileArgs {
    /// Profile subcommand
    #[command(subcommand)]
    pub command: ProfileCommands,
}

/// Profile subcommands
#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Show the profile
    Show,
    /// Replace the profile; omitted fields are cleared
    Set {
        /// Media used, comma separated
        #[arg(long)]
        media: Option<String>,
        /// Strongest skills, comma separated
        #[arg(long)]
        top: Option<String>,
        /// Skills to improve, comma separated
        #[arg(long)]
        bottom: Option<String>,
        /// Usual session length in minutes
        #[arg(long)]
        bucket: Option<i64>,
        /// Tools to avoid, comma separated
        #[arg(long)]
        constraints: Option<String>,
        /// low, med or high
        #[arg(long)]
        energy: Option<String>,
    },
    /// Show recommendation weights
    Weights,
    /// Replace recommendation weights; omitted values use defaults
    SetWeights {
        #[arg(long, default_value_t = 1.0)]
        priority: f64,
        #[arg(long, default_value_t = 1.0)]
        time_fit: f64,
        #[arg(long, default_value_t = 1.0)]
        skill_match: f64,
        #[arg(long, default_value_t = 1.0)]
        stale: f64,
        #[arg(long, default_value_t = 1.0)]
        recency_penalty: f64,
        #[arg(long, default_value_t = 14.0)]
        stale_days: f64,
        #[arg(long, default_value_t = 3.0)]
        recent_days: f64,
        /// Focus skills overriding the profile's top skills, comma separated
        #[arg(long)]
        focus: Option<String>,
    },
}

/// The stored profile, if any.
#[derive(Debug, Serialize)]
pub struct ProfileOutput {
    /// `None` until the first `profile set`.
    pub profile: Option<Profile>,
}

impl CommandOutput for ProfileOutput {
    fn to_human(&self) -> String {
        let Some(profile) = &self.profile else {
            return "No profile yet. Use 'paintquest profile set'.".to_string();
        };
        [
            format!("Media: {}", join_tags(&profile.media)),
            format!("Top skills: {}", join_tags(&profile.focus_skills_top3)),
            format!("Skills to improve: {}", join_tags(&profile.focus_skills_bottom3)),
            format!(
                "Session length: {}",
                profile
                    .default_time_bucket
                    .map_or_else(|| "-".to_string(), |m| format!("{m} min"))
            ),
            format!("Constraints: {}", join_tags(&profile.constraints)),
            format!(
                "Energy preference: {}",
                profile.energy_preference.map_or("-", |e| e.as_str())
            ),
        ]
        .join("\n")
    }
}

/// Scoring weights as shown by `profile weights`.
#[derive(Debug, Serialize)]
pub struct WeightsOutput {
    /// Stored config, or the defaults when none is stored
    pub config: RecommendationConfig,
    /// Whether a config row exists for the owner.
    pub stored: bool,
}

impl CommandOutput for WeightsOutput {
    fn to_human(&self) -> String {
        let c = &self.config;
        let mut lines = vec![
            format!("priority {:.2}", c.weight_priority),
            format!("time fit {:.2}", c.weight_time_fit),
            format!("skill match {:.2}", c.weight_skill_match),
            format!("stale {:.2} (after {:.1} days)", c.weight_stale, c.stale_days_threshold),
            format!(
                "recency penalty {:.2} (within {:.1} days)",
                c.weight_recency_penalty, c.recent_days_threshold
            ),
            format!("focus skills: {}", join_tags(&c.focus_skills)),
        ];
        if !self.stored {
            lines.insert(0, "Using default weights".to_string());
        }
        lines.join("\n")
    }
}

/// Run a profile subcommand.
pub async fn execute(args: ProfileArgs, config: &Config, json_mode: bool) -> Result<()> {
    let ctx = AppContext::open(config).await?;
    let service = ctx.profile_service();
    let owner = config.user.id.clone().unwrap_or_default();

    match args.command {
        ProfileCommands::Show => {
            let profile = service.get_profile().await?;
            output(&ProfileOutput { profile }, json_mode);
        }

        ProfileCommands::Set {
            media,
            top,
            bottom,
            bucket,
            constraints,
            energy,
        } => {
            let mut profile = Profile::new(owner);
            profile.media = media.as_deref().map(split_tags).unwrap_or_default();
            profile.focus_skills_top3 = top.as_deref().map(split_tags).unwrap_or_default();
            profile.focus_skills_bottom3 = bottom.as_deref().map(split_tags).unwrap_or_default();
            profile.default_time_bucket = bucket;
            profile.constraints = constraints.as_deref().map(split_tags).unwrap_or_default();
            profile.energy_preference = energy.as_deref().map(parse_energy).transpose()?;

            let profile = service.upsert_profile(profile).await?;
            output(&ProfileOutput { profile: Some(profile) }, json_mode);
        }

        ProfileCommands::Weights => {
            let stored = service.get_config().await?;
            let out = match stored {
                Some(config) => WeightsOutput { config, stored: true },
                None => WeightsOutput {
                    config: RecommendationConfig::new(owner),
                    stored: false,
                },
            };
            output(&out, json_mode);
        }

        ProfileCommands::SetWeights {
            priority,
            time_fit,
            skill_match,
            stale,
            recency_penalty,
            stale_days,
            recent_days,
            focus,
        } => {
            let config = RecommendationConfig {
                user_id: owner,
                weight_priority: priority,
                weight_time_fit: time_fit,
                weight_skill_match: skill_match,
                weight_stale: stale,
                weight_recency_penalty: recency_penalty,
                stale_days_threshold: stale_days,
                recent_days_threshold: recent_days,
                focus_skills: focus.as_deref().map(split_tags).unwrap_or_default(),
            };
            let config = service.upsert_config(config).await?;
            output(&WeightsOutput { config, stored: true }, json_mode);
        }
    }

    Ok(())
}
