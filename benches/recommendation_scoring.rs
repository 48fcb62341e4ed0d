//! Scoring throughput for the task and template recommenders.

use chrono::{Duration, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use paintquest::domain::models::{Attempt, AttemptTemplate, Energy, RecommendationConfig, Task};
use paintquest::services::{
    recommend_templates, TaskRecommendationInput, TaskRecommender, TemplateRecommendationInput,
};

const SKILLS: [&str; 6] = ["edge highlighting", "glazing", "blending", "freehand", "weathering", "nmm"];
const TOOLS: [&str; 4] = ["airbrush", "detail brush", "drybrush", "wet palette"];

fn backlog(count: usize) -> (Vec<Task>, Vec<Attempt>) {
    let now = Utc::now();
    let tasks: Vec<Task> = (0..count)
        .map(|i| {
            let mut task = Task::new("bench", format!("Unit {i:04}"))
                .with_priority(i64::try_from(i % 5).unwrap_or(0) + 1)
                .with_skills(vec![SKILLS[i % SKILLS.len()].to_string()])
                .with_tools(vec![TOOLS[i % TOOLS.len()].to_string()]);
            task.estimated_minutes_min = Some(15);
            task.estimated_minutes_max = Some(15 + i64::try_from(i % 90).unwrap_or(0));
            task
        })
        .collect();
    let attempts = tasks
        .iter()
        .step_by(3)
        .zip(0i64..)
        .map(|(task, days)| {
            let mut attempt = Attempt::new("bench").with_task(task.id);
            attempt.created_at = now - Duration::days(days % 30);
            attempt
        })
        .collect();
    (tasks, attempts)
}

fn templates(count: usize) -> Vec<AttemptTemplate> {
    let energies = [Energy::Low, Energy::Med, Energy::High];
    (0..count)
        .map(|i| {
            let min = 10 + i64::try_from(i % 40).unwrap_or(0);
            AttemptTemplate::new("bench", None, format!("Drill {i}"), (min, min + 30), energies[i % 3])
                .with_tools(vec![TOOLS[i % TOOLS.len()].to_string()])
                .with_skills(vec![SKILLS[i % SKILLS.len()].to_string()])
        })
        .collect()
}

fn bench_task_recommender(c: &mut Criterion) {
    let mut config = RecommendationConfig::new("bench");
    config.focus_skills = SKILLS[..3].iter().map(ToString::to_string).collect();
    let recommender = TaskRecommender::from_config(Some(&config));
    let tools: Vec<String> = TOOLS[..2].iter().map(ToString::to_string).collect();
    let now = Utc::now();

    let mut group = c.benchmark_group("task_recommender");
    for size in [10usize, 100, 1_000] {
        let (tasks, attempts) = backlog(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                recommender.recommend(black_box(&TaskRecommendationInput {
                    tasks: &tasks,
                    attempts: &attempts,
                    available_minutes: 45,
                    profile: None,
                    available_tool_tags: Some(&tools),
                    now,
                }))
            });
        });
    }
    group.finish();
}

fn bench_template_recommender(c: &mut Criterion) {
    let bottom: Vec<String> = SKILLS[3..].iter().map(ToString::to_string).collect();
    let tools: Vec<String> = TOOLS.iter().map(ToString::to_string).collect();

    let mut group = c.benchmark_group("template_recommender");
    for size in [5usize, 50, 500] {
        let templates = templates(size);
        let recent: Vec<_> = templates.iter().step_by(4).map(|t| t.id).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                recommend_templates(black_box(&TemplateRecommendationInput {
                    templates: &templates,
                    available_minutes: 30,
                    energy: Energy::Med,
                    bottom_skills: &bottom,
                    available_tool_tags: &tools,
                    recent_template_ids: &recent,
                }))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_task_recommender, bench_template_recommender);
criterion_main!(benches);
