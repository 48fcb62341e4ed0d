//! Task recommendation scoring.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::models::{Attempt, Energy, Profile, RecommendationConfig, Task};
use crate::services::scoring::{days_since, lowercase_set, rank, time_fit};

/// How many of the profile's top skills stand in for an explicit focus list.
const PROFILE_FOCUS_LIMIT: usize = 3;

const STALE_BOOST: f64 = 0.5;
const RECENCY_PENALTY: f64 = 0.5;
const TOOL_ADJUSTMENT: f64 = 0.5;
const CONSTRAINT_PENALTY: f64 = 1.0;
const ENERGY_BONUS: f64 = 1.0;

/// Per-factor multipliers for task scoring
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationWeights {
    /// Priority factor.
    pub priority: f64,
    /// Time-fit factor.
    pub time_fit: f64,
    /// Skill-match factor.
    pub skill_match: f64,
    /// Stale boost factor.
    pub stale: f64,
    /// Recency penalty factor.
    pub recency_penalty: f64,
}

impl Default for RecommendationWeights {
    fn default() -> Self {
        Self {
            priority: 1.0,
            time_fit: 1.0,
            skill_match: 1.0,
            stale: 1.0,
            recency_penalty: 1.0,
        }
    }
}

/// Everything the scorer looks at for one request
#[derive(Debug, Clone)]
pub struct TaskRecommendationInput<'a> {
    /// Candidate tasks, archived ones already removed
    pub tasks: &'a [Task],
    /// The owner's attempts, used for staleness and recency.
    pub attempts: &'a [Attempt],
    /// Session length.
    pub available_minutes: u32,
    /// Focus skills and constraints come from here.
    pub profile: Option<&'a Profile>,
    /// Tags of available arsenal items; `None` when the arsenal is unknown
    pub available_tool_tags: Option<&'a [String]>,
    /// Reference time for day counts.
    pub now: DateTime<Utc>,
}

/// One ranked task.
#[derive(Debug, Clone, Serialize)]
pub struct TaskRecommendation {
    /// The task.
    pub task: Task,
    /// Total score; higher is better.
    pub score: f64,
    /// Human-readable contributions to the score.
    pub reasons: Vec<String>,
}

/// Ranks backlog tasks for a time budget
///
/// Score = weighted priority + weighted time fit + weighted skill match
/// + tool match + constraint penalty + energy fit + weighted staleness.
#[derive(Debug, Clone)]
pub struct TaskRecommender {
    weights: RecommendationWeights,
    stale_days: f64,
    recent_days: f64,
    focus_skills: Vec<String>,
}

impl Default for TaskRecommender {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskRecommender {
    /// Create a recommender with default weights and thresholds
    pub fn new() -> Self {
        Self {
            weights: RecommendationWeights::default(),
            stale_days: 14.0,
            recent_days: 3.0,
            focus_skills: Vec::new(),
        }
    }

    /// Build from a stored config, falling back to defaults when absent
    pub fn from_config(config: Option<&RecommendationConfig>) -> Self {
        config.map_or_else(Self::new, |config| Self {
            weights: RecommendationWeights {
                priority: config.weight_priority,
                time_fit: config.weight_time_fit,
                skill_match: config.weight_skill_match,
                stale: config.weight_stale,
                recency_penalty: config.weight_recency_penalty,
            },
            stale_days: config.stale_days_threshold,
            recent_days: config.recent_days_threshold,
            focus_skills: config.focus_skills.clone(),
        })
    }

    /// Weights in effect.
    pub const fn weights(&self) -> RecommendationWeights {
        self.weights
    }

    /// Top tasks for the request, best first
    pub fn recommend(&self, input: &TaskRecommendationInput<'_>) -> Vec<TaskRecommendation> {
        let last_attempted = last_attempt_by_task(input.attempts);
        let focus = self.active_focus_skills(input.profile);

        let scored = input
            .tasks
            .iter()
            .map(|task| {
                let (score, reasons) =
                    self.score_task(task, input, &focus, last_attempted.get(&task.id).copied());
                TaskRecommendation {
                    task: task.clone(),
                    score,
                    reasons,
                }
            })
            .collect();

        rank(scored, |r: &TaskRecommendation| r.score)
    }

    /// The config's explicit focus list wins over the profile's top skills.
    fn active_focus_skills(&self, profile: Option<&Profile>) -> Vec<String> {
        if !self.focus_skills.is_empty() {
            return self.focus_skills.clone();
        }
        profile
            .map(|p| p.focus_skills_top3.iter().take(PROFILE_FOCUS_LIMIT).cloned().collect())
            .unwrap_or_default()
    }

    fn score_task(
        &self,
        task: &Task,
        input: &TaskRecommendationInput<'_>,
        focus: &[String],
        last_attempt: Option<DateTime<Utc>>,
    ) -> (f64, Vec<String>) {
        let mut reasons = Vec::new();
        let mut score = 0.0;

        score += priority_score(task.priority) * self.weights.priority;
        reasons.push(format!("priority {}", task.priority));

        let fit = time_fit(
            task.estimated_minutes_min,
            task.estimated_minutes_max,
            input.available_minutes,
        );
        score += fit * self.weights.time_fit;
        reasons.push(format!("time fit {fit:.2}"));

        let skill = skill_match(&task.skills_tags, focus);
        if !task.skills_tags.is_empty() && !focus.is_empty() {
            reasons.push(format!("skill match {skill:.2}"));
        }
        score += skill * self.weights.skill_match;

        score += tool_match(&task.required_tools_tags, input.available_tool_tags, &mut reasons);

        if let Some(profile) = input.profile {
            let excluded = lowercase_set(&profile.constraints);
            if task
                .required_tools_tags
                .iter()
                .any(|tag| excluded.contains(&tag.to_lowercase()))
            {
                score -= CONSTRAINT_PENALTY;
                reasons.push("blocked by constraints".to_string());
            }

            let bucket = Energy::for_minutes(input.available_minutes);
            if profile.energy_preference == Some(bucket) {
                score += ENERGY_BONUS;
                reasons.push(format!("energy fit {bucket}"));
            }
        }

        match last_attempt {
            None => {
                score += STALE_BOOST * self.weights.stale;
                reasons.push("stale boost (never attempted)".to_string());
            }
            Some(created_at) => {
                let days = days_since(created_at, input.now);
                if days >= self.stale_days {
                    score += STALE_BOOST * self.weights.stale;
                    reasons.push(format!("stale boost ({days:.1} days)"));
                }
                if days <= self.recent_days {
                    score -= RECENCY_PENALTY * self.weights.recency_penalty;
                    reasons.push(format!("recency penalty ({days:.1} days)"));
                }
            }
        }

        (score, reasons)
    }
}

#[allow(clippy::cast_precision_loss)]
fn priority_score(priority: i64) -> f64 {
    (priority as f64 / 5.0).clamp(0.0, 1.0)
}

/// Fraction of the task's skills that are in focus. Case-insensitive.
#[allow(clippy::cast_precision_loss)]
fn skill_match(task_skills: &[String], focus: &[String]) -> f64 {
    if task_skills.is_empty() || focus.is_empty() {
        return 0.0;
    }
    let focus = lowercase_set(focus);
    let matches = task_skills
        .iter()
        .filter(|skill| focus.contains(&skill.to_lowercase()))
        .count();
    matches as f64 / task_skills.len().max(1) as f64
}

/// Unweighted tool readiness term.
fn tool_match(required: &[String], available: Option<&[String]>, reasons: &mut Vec<String>) -> f64 {
    if required.is_empty() {
        return 0.0;
    }
    let Some(available) = available else {
        reasons.push("no arsenal data".to_string());
        return -TOOL_ADJUSTMENT;
    };

    let available = lowercase_set(available);
    let missing: Vec<&str> = required
        .iter()
        .filter(|tag| !available.contains(&tag.to_lowercase()))
        .map(String::as_str)
        .collect();

    if missing.is_empty() {
        reasons.push("tools ready".to_string());
        TOOL_ADJUSTMENT
    } else {
        reasons.push(format!("missing tools: {}", missing.join(", ")));
        -TOOL_ADJUSTMENT
    }
}

/// Newest attempt creation time per task.
fn last_attempt_by_task(attempts: &[Attempt]) -> HashMap<Uuid, DateTime<Utc>> {
    let mut latest: HashMap<Uuid, DateTime<Utc>> = HashMap::new();
    for attempt in attempts {
        let Some(task_id) = attempt.task_id else { continue };
        latest
            .entry(task_id)
            .and_modify(|seen| {
                if attempt.created_at > *seen {
                    *seen = attempt.created_at;
                }
            })
            .or_insert(attempt.created_at);
    }
    latest
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_test_task(title: &str, priority: i64) -> Task {
        Task::new("u1", title).with_priority(priority)
    }

    fn attempt_for(task: &Task, created_at: DateTime<Utc>) -> Attempt {
        let mut attempt = Attempt::new("u1").with_task(task.id);
        attempt.created_at = created_at;
        attempt
    }

    fn input<'a>(tasks: &'a [Task], attempts: &'a [Attempt], minutes: u32) -> TaskRecommendationInput<'a> {
        TaskRecommendationInput {
            tasks,
            attempts,
            available_minutes: minutes,
            profile: None,
            available_tool_tags: None,
            now: Utc::now(),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_baseline_score_for_unattempted_task() {
        let tasks = vec![create_test_task("Orks", 5)];
        let result = TaskRecommender::new().recommend(&input(&tasks, &[], 45));

        // priority 1.0 + neutral time 0.5 + stale 0.5
        assert_eq!(result.len(), 1);
        assert!(approx(result[0].score, 2.0));
        assert_eq!(
            result[0].reasons,
            vec!["priority 5", "time fit 0.50", "stale boost (never attempted)"]
        );
    }

    #[test]
    fn test_skill_match_reason_from_config_focus() {
        let tasks = vec![create_test_task("Marines", 5)
            .with_minutes(Some(30), Some(60))
            .with_skills(vec!["basecoat".to_string()])];
        let mut config = RecommendationConfig::new("u1");
        config.focus_skills = vec!["basecoat".to_string()];

        let result = TaskRecommender::from_config(Some(&config)).recommend(&input(&tasks, &[], 45));
        let reasons = &result[0].reasons;
        assert!(reasons.iter().any(|r| r.contains("priority 5")));
        assert!(reasons.iter().any(|r| r.contains("skill match")));
        assert!(reasons.contains(&"skill match 1.00".to_string()));
        assert!(approx(result[0].score, 1.0 + 1.0 + 1.0 + 0.5));
    }

    #[test]
    fn test_profile_top_skills_used_when_config_has_none() {
        let tasks = vec![create_test_task("Eldar", 3)
            .with_skills(vec!["glazing".to_string(), "basing".to_string()])];
        let mut profile = Profile::new("u1");
        profile.focus_skills_top3 = vec!["Glazing".to_string()];

        let mut req = input(&tasks, &[], 45);
        req.profile = Some(&profile);
        let result = TaskRecommender::new().recommend(&req);
        assert!(result[0].reasons.contains(&"skill match 0.50".to_string()));
    }

    #[test]
    fn test_no_skill_reason_when_focus_empty() {
        let tasks = vec![create_test_task("Tau", 3).with_skills(vec!["glazing".to_string()])];
        let result = TaskRecommender::new().recommend(&input(&tasks, &[], 45));
        assert!(!result[0].reasons.iter().any(|r| r.starts_with("skill match")));
    }

    #[test]
    fn test_tool_match_terms() {
        let tools = vec!["Round Brush".to_string()];
        let needs_brush = create_test_task("Needs brush", 3).with_tools(tools);
        let tasks = vec![needs_brush];

        let unknown = TaskRecommender::new().recommend(&input(&tasks, &[], 45));
        assert!(unknown[0].reasons.contains(&"no arsenal data".to_string()));
        assert!(approx(unknown[0].score, 0.6 + 0.5 - 0.5 + 0.5));

        let owned = vec!["round brush".to_string()];
        let mut req = input(&tasks, &[], 45);
        req.available_tool_tags = Some(&owned);
        let ready = TaskRecommender::new().recommend(&req);
        assert!(ready[0].reasons.contains(&"tools ready".to_string()));
        assert!(approx(ready[0].score, 0.6 + 0.5 + 0.5 + 0.5));

        let other = vec!["drybrush".to_string()];
        req.available_tool_tags = Some(&other);
        let missing = TaskRecommender::new().recommend(&req);
        assert!(missing[0].reasons.contains(&"missing tools: Round Brush".to_string()));
    }

    #[test]
    fn test_constraint_penalty_and_energy_fit() {
        let tasks = vec![create_test_task("Airbrush job", 3).with_tools(vec!["airbrush".to_string()])];
        let owned = vec!["airbrush".to_string()];
        let mut profile = Profile::new("u1");
        profile.constraints = vec!["Airbrush".to_string()];
        profile.energy_preference = Some(Energy::Low);

        let mut req = input(&tasks, &[], 25);
        req.profile = Some(&profile);
        req.available_tool_tags = Some(&owned);
        let result = TaskRecommender::new().recommend(&req);

        assert!(result[0].reasons.contains(&"blocked by constraints".to_string()));
        assert!(result[0].reasons.contains(&"energy fit low".to_string()));
        // 0.6 priority + 0.5 time + 0.5 tools - 1.0 blocked + 1.0 energy + 0.5 stale
        assert!(approx(result[0].score, 2.1));
    }

    #[test]
    fn test_energy_mismatch_has_no_penalty() {
        let tasks = vec![create_test_task("Knights", 3)];
        let mut profile = Profile::new("u1");
        profile.energy_preference = Some(Energy::High);

        let mut req = input(&tasks, &[], 45);
        req.profile = Some(&profile);
        let result = TaskRecommender::new().recommend(&req);
        assert!(!result[0].reasons.iter().any(|r| r.starts_with("energy")));
        assert!(approx(result[0].score, 0.6 + 0.5 + 0.5));
    }

    #[test]
    fn test_staleness_and_recency_windows() {
        let now = Utc::now();
        let recent = create_test_task("Recent", 3);
        let middle = create_test_task("Middle", 3);
        let stale = create_test_task("Stale", 3);
        let attempts = vec![
            attempt_for(&recent, now - Duration::days(2)),
            attempt_for(&middle, now - Duration::days(10)),
            attempt_for(&stale, now - Duration::days(20)),
            // older attempt on the recent task must not count
            attempt_for(&recent, now - Duration::days(40)),
        ];
        let tasks = vec![recent, middle, stale];

        let mut req = input(&tasks, &attempts, 45);
        req.now = now;
        let result = TaskRecommender::new().recommend(&req);

        let by_title = |title: &str| result.iter().find(|r| r.task.title == title).unwrap();
        assert!(by_title("Recent").reasons.contains(&"recency penalty (2.0 days)".to_string()));
        assert!(!by_title("Middle").reasons.iter().any(|r| r.starts_with("stale") || r.starts_with("recency")));
        assert!(by_title("Stale").reasons.contains(&"stale boost (20.0 days)".to_string()));
        assert_eq!(result[0].task.title, "Stale");
        assert_eq!(result[2].task.title, "Recent");
    }

    #[test]
    fn test_weights_scale_factors() {
        let tasks = vec![create_test_task("Weighted", 5)];
        let mut config = RecommendationConfig::new("u1");
        config.weight_priority = 2.0;
        config.weight_time_fit = 0.0;
        config.weight_stale = 0.0;

        let result = TaskRecommender::from_config(Some(&config)).recommend(&input(&tasks, &[], 45));
        assert!(approx(result[0].score, 2.0));
    }

    #[test]
    fn test_top_five_stable_on_ties() {
        let tasks: Vec<Task> = (0..7).map(|i| create_test_task(&format!("T{i}"), 3)).collect();
        let result = TaskRecommender::new().recommend(&input(&tasks, &[], 45));
        let titles: Vec<_> = result.iter().map(|r| r.task.title.as_str()).collect();
        assert_eq!(titles, vec!["T0", "T1", "T2", "T3", "T4"]);
    }
}
