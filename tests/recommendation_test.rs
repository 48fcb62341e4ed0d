//! Task and template recommendation scenarios, through the services and
//! directly against the scorers.

mod common;

use chrono::Utc;
use common::TestApp;
use serde_json::json;
use uuid::Uuid;

use paintquest::domain::models::{AttemptTemplate, Energy, EventType, PaintRow, Profile, RecommendationConfig, Task};
use paintquest::services::{
    recommend_templates, NewTask, TaskRecommendationInput, TaskRecommender, TemplateRecommendationInput,
};

#[test]
fn test_priority_and_skill_match_reasons() {
    let task = Task::new("u1", "Basecoat squad")
        .with_minutes(Some(30), Some(60))
        .with_priority(5)
        .with_skills(vec!["basecoat".to_string()]);
    let mut config = RecommendationConfig::new("u1");
    config.focus_skills = vec!["Basecoat".to_string()];

    let recommender = TaskRecommender::from_config(Some(&config));
    let results = recommender.recommend(&TaskRecommendationInput {
        tasks: &[task],
        attempts: &[],
        available_minutes: 45,
        profile: None,
        available_tool_tags: None,
        now: Utc::now(),
    });

    let top = &results[0];
    assert!(top.reasons.iter().any(|r| r == "priority 5"));
    assert!(top.reasons.iter().any(|r| r.starts_with("skill match")));
}

#[test]
fn test_template_missing_tools_and_recent_use() {
    let template = AttemptTemplate::new("u1", None, "Edge highlights", (20, 40), Energy::Med)
        .with_tools(vec!["highlight brush".to_string()]);
    let recent = [template.id];
    let templates = [template];

    let results = recommend_templates(&TemplateRecommendationInput {
        templates: &templates,
        available_minutes: 30,
        energy: Energy::Med,
        bottom_skills: &[],
        available_tool_tags: &["round brush".to_string()],
        recent_template_ids: &recent,
    });

    let reasons = &results[0].reasons;
    assert!(reasons.iter().any(|r| r.contains("missing tools")));
    assert!(reasons.iter().any(|r| r == "recently used"));
}

#[tokio::test]
async fn test_service_ranks_at_most_five_descending() {
    let app = TestApp::new().await;
    let tasks = app.tasks();
    for priority in 1..=5 {
        for copy in 0..2 {
            tasks
                .create_task(NewTask {
                    title: format!("Unit {priority}-{copy}"),
                    priority: Some(priority),
                    estimated_minutes_min: Some(20),
                    estimated_minutes_max: Some(40),
                    ..NewTask::default()
                })
                .await
                .unwrap();
        }
    }

    let results = app.recommendations().recommend_tasks(30).await.unwrap();
    assert_eq!(results.len(), 5);
    assert!(results.windows(2).all(|pair| pair[0].score >= pair[1].score));
    assert_eq!(results[0].task.priority, 5);
    assert!(results.iter().all(|r| !r.reasons.is_empty()));
}

#[tokio::test]
async fn test_recently_attempted_task_drops() {
    let app = TestApp::new().await;
    let tasks = app.tasks();
    let fresh = tasks
        .create_task(NewTask {
            title: "Fresh".to_string(),
            ..NewTask::default()
        })
        .await
        .unwrap();
    let touched = tasks
        .create_task(NewTask {
            title: "Touched".to_string(),
            ..NewTask::default()
        })
        .await
        .unwrap();
    app.attempts().start_quest(touched.id).await.unwrap();

    let results = app.recommendations().recommend_tasks(45).await.unwrap();
    assert_eq!(results[0].task.id, fresh.id);
    let touched_rec = results.iter().find(|r| r.task.id == touched.id).unwrap();
    assert!(touched_rec.reasons.iter().any(|r| r.starts_with("recency penalty")));
}

#[tokio::test]
async fn test_quest_suggestions_end_to_end() {
    let app = TestApp::new().await;
    let task = app
        .tasks()
        .create_task(NewTask {
            title: "Knight Titan".to_string(),
            ..NewTask::default()
        })
        .await
        .unwrap();

    let mut profile = Profile::new(common::OWNER);
    profile.focus_skills_bottom3 = vec!["glazing".to_string()];
    profile.energy_preference = Some(Energy::High);
    app.profile().upsert_profile(profile).await.unwrap();
    app.arsenal()
        .create_item("brush", "Size 0", vec!["round brush".to_string(), "detail brush".to_string()])
        .await
        .unwrap();
    app.arsenal()
        .import_paints(vec![PaintRow {
            color: "Lahmian Medium".to_string(),
            ..PaintRow::default()
        }])
        .await
        .unwrap();

    let first = app.provisioning().recommend_for_quest(task.id, Some(40), None).await.unwrap();
    assert_eq!(first.meta.energy, Energy::High);
    assert_eq!(first.meta.available_minutes, 40);
    assert_eq!(first.meta.template_count, 3);
    assert!(first.recommendations.iter().all(|r| r.score >= 0.0));

    // Play the top suggestion; it is filtered out and replaced next time.
    let played = first.recommendations[0].template.id;
    let attempt = app.attempts().start_quest(task.id).await.unwrap();
    let attempts = app.attempts();
    attempts
        .append_event(attempt.attempt.id, EventType::AttemptStarted, None)
        .await
        .unwrap();
    attempts
        .append_event(
            attempt.attempt.id,
            EventType::ProgressRecorded,
            Some(json!({"template_id": played.to_string()})),
        )
        .await
        .unwrap();

    let second = app.provisioning().recommend_for_quest(task.id, Some(40), None).await.unwrap();
    assert_eq!(second.meta.template_count, 3);
    assert!(second.recommendations.iter().all(|r| r.template.id != played));
    assert_eq!(app.templates().list_templates(task.id).await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_unknown_quest() {
    let app = TestApp::new().await;
    let err = app
        .provisioning()
        .recommend_for_quest(Uuid::new_v4(), None, None)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Quest not found");
}
