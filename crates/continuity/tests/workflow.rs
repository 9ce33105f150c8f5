//! Workflow tests against a mock Notion server.

use std::sync::Arc;

use chrono::NaiveDate;
use continuity::config::{
    DEFAULT_DAILY_PLANNER_PARENT_ID, DEFAULT_JOB_TRACKER_DATABASE_ID, DEFAULT_PLAN_AI_DATABASE_ID,
};
use continuity::{Config, ContinuityError, PageDraft, Planner, SelectionConfig, Task, TaskPriority};
use notion::{ErrorKind, ManualClock, NotionClient};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
}

fn planner(server: &MockServer) -> Planner {
    let config = Config::from_lookup(|key| match key {
        "NOTION_API_KEY" => Some("secret_test".to_string()),
        _ => None,
    })
    .unwrap();
    let client = NotionClient::with_clock(
        config.client_config().with_base_url(server.uri()),
        Arc::new(ManualClock::new()),
    )
    .unwrap();
    Planner::with_client(client, config)
}

fn task_page(id: &str, name: &str, category: &str, priority: Option<&str>) -> Value {
    json!({
        "object": "page",
        "id": id,
        "properties": {
            "Name": { "title": [{ "plain_text": name }] },
            "Status": { "checkbox": false },
            "Next reminder": { "date": { "start": "2025-09-06" } },
            "Priority Level": { "select": priority.map(|p| json!({ "name": p })) },
            "Category": { "select": { "name": category } }
        }
    })
}

fn job_page(id: &str, name: &str, deadline: Option<&str>, priority: Option<&str>) -> Value {
    json!({
        "object": "page",
        "id": id,
        "properties": {
            "Name": { "title": [{ "plain_text": name }] },
            "Deadline": { "date": deadline.map(|d| json!({ "start": d })) },
            "Priority": { "select": priority.map(|p| json!({ "name": p })) }
        }
    })
}

fn results(pages: Vec<Value>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "object": "list",
        "results": pages,
        "has_more": false,
        "next_cursor": null
    }))
}

async fn mount_task_query(server: &MockServer, pages: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path(format!("/databases/{DEFAULT_PLAN_AI_DATABASE_ID}/query")))
        .respond_with(results(pages))
        .mount(server)
        .await;
}

async fn mount_job_query(server: &MockServer, pages: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path(format!("/databases/{DEFAULT_JOB_TRACKER_DATABASE_ID}/query")))
        .respond_with(results(pages))
        .mount(server)
        .await;
}

// ────────────────────────────────────────────────────────────────────────────
// Reading
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_uncompleted_tasks_sends_compound_filter() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/databases/{DEFAULT_PLAN_AI_DATABASE_ID}/query")))
        .and(body_partial_json(json!({
            "filter": { "and": [
                { "property": "Next reminder", "date": { "equals": "2025-09-06" } },
                { "property": "Status", "checkbox": { "equals": false } }
            ]}
        })))
        .respond_with(results(vec![task_page("t1", "Email recruiter", "Networking", Some("High"))]))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = planner(&server).fetch_uncompleted_tasks(day(6)).await.unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, "t1");
    assert_eq!(tasks[0].name, "Email recruiter");
    assert_eq!(tasks[0].priority_level, Some(TaskPriority::High));
    assert_eq!(tasks[0].target_date, Some(day(6)));
}

#[tokio::test]
async fn test_fetch_jobs_sorts_by_deadline_then_priority() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/databases/{DEFAULT_JOB_TRACKER_DATABASE_ID}/query")))
        .and(body_partial_json(json!({
            "sorts": [
                { "property": "Deadline", "direction": "ascending" },
                { "property": "Priority", "direction": "ascending" }
            ]
        })))
        .respond_with(results(vec![job_page("j1", "Backend Engineer", None, None)]))
        .expect(1)
        .mount(&server)
        .await;

    let jobs = planner(&server).fetch_jobs().await.unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].name, "Backend Engineer");
}

#[tokio::test]
async fn test_plan_carries_tasks_and_selects_jobs() {
    let server = MockServer::start().await;
    mount_task_query(
        &server,
        vec![
            task_page("t1", "9am standup", "Schedule", None),
            task_page("t2", "Submit application", "Priorities", Some("Medium")),
            task_page("t3", "Coffee chat", "Networking", None),
        ],
    )
    .await;
    mount_job_query(
        &server,
        vec![
            job_page("j1", "Barista", Some("2025-09-06"), Some("High Prior")),
            job_page("j2", "Backend Engineer", None, None),
            job_page("j3", "AI Research Scientist at OpenAI", Some("2025-09-06"), Some("High Prior")),
        ],
    )
    .await;

    let plan = planner(&server).plan(day(6)).await.unwrap();

    assert_eq!(plan.source_tasks.len(), 3);
    assert_eq!(plan.excluded, 1);
    assert_eq!(plan.draft.target_date(), day(7));
    assert_eq!(
        plan.draft.title(),
        "AI Daily Planner with Completion Tracking - September 7, 2025"
    );

    let tasks = plan.draft.tasks();
    assert_eq!(tasks.len(), 2);
    assert!(tasks.iter().all(|t| t.category != "Schedule"));
    assert!(tasks
        .iter()
        .all(|t| !t.completed && t.id.is_empty() && t.target_date == Some(day(7))));

    let scores: Vec<u32> = plan.candidates.iter().map(|c| c.total_score).collect();
    assert_eq!(scores, vec![3, 108]);
    let featured: Vec<&str> = plan.draft.jobs().iter().map(|j| j.name.as_str()).collect();
    assert_eq!(featured, vec!["AI Research Scientist at OpenAI", "Backend Engineer"]);
}

#[tokio::test]
async fn test_feature_jobs_are_capped() {
    let server = MockServer::start().await;
    let pages = (0..7)
        .map(|i| job_page(&format!("j{i}"), &format!("Software Engineer {i}"), None, None))
        .collect();
    mount_job_query(&server, pages).await;
    mount_task_query(&server, vec![]).await;

    let planner = planner(&server);
    let featured = planner.feature_jobs(day(6)).await.unwrap();
    assert_eq!(featured.len(), 4);
    assert_eq!(featured[0].name, "Software Engineer 0");

    let draft = planner.build_draft(day(6)).await.unwrap();
    assert!(draft.tasks().is_empty());
    assert_eq!(draft.jobs(), featured.as_slice());
}

#[tokio::test]
async fn test_unreadable_database_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/databases/{DEFAULT_PLAN_AI_DATABASE_ID}/query")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "object": "error",
            "status": 404,
            "code": "object_not_found",
            "message": "Could not find database"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = planner(&server).plan(day(6)).await.unwrap_err();
    match err {
        ContinuityError::Notion(inner) => assert_eq!(inner.kind(), ErrorKind::NotFound),
        other => panic!("unexpected error: {other}"),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Publishing
// ────────────────────────────────────────────────────────────────────────────

fn draft(names: &[&str]) -> PageDraft {
    let tasks = names
        .iter()
        .map(|n| Task::new(*n, "Priorities", Some(TaskPriority::High)).with_target_date(day(7)))
        .collect();
    PageDraft::new(day(7), day(6), tasks, vec![], SelectionConfig::default())
}

#[tokio::test]
async fn test_publish_continues_past_record_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pages"))
        .and(body_partial_json(json!({
            "parent": { "page_id": DEFAULT_DAILY_PLANNER_PARENT_ID }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "page",
            "id": "daily-page-1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/blocks/daily-page-1/children"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    // Registered before the generic record mock so it wins for "Broken".
    Mock::given(method("POST"))
        .and(path("/pages"))
        .and(body_partial_json(json!({
            "parent": { "database_id": DEFAULT_PLAN_AI_DATABASE_ID },
            "properties": { "Name": { "title": [{ "text": { "content": "Broken" } }] } }
        })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "object": "error",
            "status": 400,
            "code": "validation_error",
            "message": "Category is not a property that exists."
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/pages"))
        .and(body_partial_json(json!({
            "parent": { "database_id": DEFAULT_PLAN_AI_DATABASE_ID },
            "properties": {
                "Status": { "checkbox": false },
                "Next reminder": { "date": { "start": "2025-09-07" } },
                "Priority Level": { "select": { "name": "High" } }
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "page",
            "id": "task-record"
        })))
        .expect(2)
        .mount(&server)
        .await;

    let report = planner(&server)
        .publish(&draft(&["First", "Broken", "Second"]))
        .await
        .unwrap();

    assert_eq!(report.page_url, "https://notion.so/dailypage1");
    assert_eq!(report.tasks_created(), 2);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].starts_with("Broken: "));
    assert!(!report.is_complete());
}

#[tokio::test]
async fn test_page_creation_failure_is_fatal() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/pages"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "object": "error",
            "status": 403,
            "code": "restricted_resource",
            "message": "Insufficient permissions"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = planner(&server).publish(&draft(&["Only"])).await.unwrap_err();

    let hint = err.remediation().unwrap();
    assert!(hint.contains("Grant"));
    assert!(matches!(err, ContinuityError::Notion(ref e) if e.kind() == ErrorKind::Forbidden));
}

#[tokio::test]
async fn test_database_title_reads_plain_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/databases/{DEFAULT_JOB_TRACKER_DATABASE_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "database",
            "id": DEFAULT_JOB_TRACKER_DATABASE_ID,
            "title": [{ "plain_text": "Job Tracker" }]
        })))
        .mount(&server)
        .await;

    let title = planner(&server)
        .database_title(DEFAULT_JOB_TRACKER_DATABASE_ID)
        .await
        .unwrap();
    assert_eq!(title, "Job Tracker");
}
