//! Attempt template scoring.
//!
//! Unlike task scoring every factor here is unweighted. Templates are scored
//! from a base of 1.0 and favour skills the user wants to improve (their
//! bottom skills) rather than their strengths.

use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

use crate::domain::models::{AttemptTemplate, Energy};
use crate::services::scoring::{lowercase_set, rank, time_fit_range};

const BASE_SCORE: f64 = 1.0;
const ENERGY_FIT_BONUS: f64 = 0.5;
const ENERGY_MISMATCH_PENALTY: f64 = 0.2;
const SKILL_TARGET_BONUS: f64 = 0.5;
const TOOLS_READY_BONUS: f64 = 0.3;
const MISSING_TOOLS_PENALTY: f64 = 0.4;
const RECENT_USE_PENALTY: f64 = 0.3;

/// Everything template scoring looks at.
#[derive(Debug, Clone)]
pub struct TemplateRecommendationInput<'a> {
    /// Candidates.
    pub templates: &'a [AttemptTemplate],
    /// Session length.
    pub available_minutes: u32,
    /// Requested energy.
    pub energy: Energy,
    /// Skills the user wants to improve.
    pub bottom_skills: &'a [String],
    /// Tags of tools on hand.
    pub available_tool_tags: &'a [String],
    /// Templates used recently, penalized.
    pub recent_template_ids: &'a [Uuid],
}

/// One ranked template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateRecommendation {
    /// The template.
    pub template: AttemptTemplate,
    /// Total score; higher is better.
    pub score: f64,
    /// Human-readable contributions to the score.
    pub reasons: Vec<String>,
    /// Available minutes clamped into the template's range
    pub recommended_minutes: i64,
}

/// Rank templates for one quest, best first, at most five.
pub fn recommend_templates(input: &TemplateRecommendationInput<'_>) -> Vec<TemplateRecommendation> {
    let bottom = lowercase_set(input.bottom_skills);
    let tools = lowercase_set(input.available_tool_tags);
    let recent: HashSet<Uuid> = input.recent_template_ids.iter().copied().collect();

    let scored = input
        .templates
        .iter()
        .map(|template| score_template(template, input, &bottom, &tools, &recent))
        .collect();

    rank(scored, |r: &TemplateRecommendation| r.score)
}

fn score_template(
    template: &AttemptTemplate,
    input: &TemplateRecommendationInput<'_>,
    bottom: &HashSet<String>,
    tools: &HashSet<String>,
    recent: &HashSet<Uuid>,
) -> TemplateRecommendation {
    let mut reasons = Vec::new();
    let mut score = BASE_SCORE;

    let fit = time_fit_range(
        template.estimated_minutes_min,
        template.estimated_minutes_max,
        input.available_minutes,
    );
    score += fit;
    reasons.push(format!("time fit {fit:.2}"));

    if template.energy == input.energy {
        score += ENERGY_FIT_BONUS;
        reasons.push(format!("energy fit {}", input.energy));
    } else {
        score -= ENERGY_MISMATCH_PENALTY;
        reasons.push(format!("energy mismatch {}", template.energy));
    }

    let targeted: Vec<String> = template
        .focus_skills_tags
        .iter()
        .map(|skill| skill.to_lowercase())
        .filter(|skill| bottom.contains(skill))
        .collect();
    if !targeted.is_empty() {
        score += SKILL_TARGET_BONUS;
        reasons.push(format!("targets skill: {}", targeted.join(", ")));
    }

    if !template.required_tools_tags.is_empty() {
        let missing: Vec<&str> = template
            .required_tools_tags
            .iter()
            .filter(|tag| !tools.contains(&tag.to_lowercase()))
            .map(String::as_str)
            .collect();
        if missing.is_empty() {
            score += TOOLS_READY_BONUS;
            reasons.push("tools ready".to_string());
        } else {
            score -= MISSING_TOOLS_PENALTY;
            reasons.push(format!("missing tools: {}", missing.join(", ")));
        }
    }

    if recent.contains(&template.id) {
        score -= RECENT_USE_PENALTY;
        reasons.push("recently used".to_string());
    }

    let recommended_minutes = i64::from(input.available_minutes)
        .max(template.estimated_minutes_min)
        .min(template.estimated_minutes_max);

    TemplateRecommendation {
        template: template.clone(),
        score: score.max(0.0),
        reasons,
        recommended_minutes,
    }
}
