use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

use crate::modules::utilisation::adapters::outbound::planner_in_memory::InMemoryPlanner;
use crate::shared::core::clock::FixedClock;
use crate::shared::infrastructure::json_store::file::JsonFileStore;
use crate::shell::http::router;
use crate::shell::state::{AppState, Dependencies};
use crate::tests::fixtures::app::{TestApp, test_options};
use crate::tests::fixtures::planner::{TaskBuilder, date};

fn planner() -> InMemoryPlanner {
    InMemoryPlanner::new()
        .with_user(1, "Alice")
        .with_user(2, "Bob")
        .with_project(7, "Apollo")
        .with_project(8, "Gemini")
        .with_task(
            TaskBuilder::new(7)
                .user(1)
                .dates("2024-03-04", "2024-03-08")
                .build(),
        )
        .with_task(
            TaskBuilder::new(8)
                .user(2)
                .dates("2024-03-11", "2024-03-12")
                .estimated_hours(4.0)
                .build(),
        )
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn gql(query: &str) -> Request<Body> {
    Request::post("/gql")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn it_should_report_edit_and_report_again_through_the_router() {
    let app = TestApp::new(planner());

    let (status, report) = send(app.router(), get("/?week_start=2024-03-04&week_count=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["project_table_data"]["7"]["totals"]["allocated"], 5.0);
    assert_eq!(report["project_table_data"]["8"]["2024-03-11"]["allocated"], 1.0);
    assert_eq!(report["total_available"], 20.0);
    assert_eq!(report["total_allocated"], 6.0);
    assert_eq!(report["total_utilisation"], 30.0);

    let (status, table) = send(
        app.router(),
        post_form(
            "/requirements",
            "project_id=7&week=2024-03-04&requirement=5&week_start=2024-03-04&week_count=2",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table["7"]["totals"]["utilisation"], 100.0);

    let (_, hidden) = send(
        app.router(),
        get("/?week_start=2024-03-04&week_count=2&hide_fully_scheduled_projects"),
    )
    .await;
    let rows = hidden["project_table_data"].as_object().unwrap();
    assert!(!rows.contains_key("7"));
    assert!(rows.contains_key("8"));
    assert_eq!(hidden["total_allocated"], 6.0);
}

#[tokio::test]
async fn it_should_only_call_the_planner_again_after_the_cache_expires() {
    let app = TestApp::new(planner());

    send(app.router(), get("/?week_start=2024-03-04&week_count=2")).await;
    send(app.router(), get("/?week_start=2024-03-04&week_count=2")).await;
    assert_eq!(app.planner.calls().tasks, 1);

    // a different window is a different cache entry
    send(app.router(), get("/?week_start=2024-03-11&week_count=2")).await;
    assert_eq!(app.planner.calls().tasks, 2);

    app.clock.advance(chrono::Duration::minutes(60));
    send(app.router(), get("/?week_start=2024-03-04&week_count=2")).await;
    assert_eq!(app.planner.calls().tasks, 3);
}

#[tokio::test]
async fn it_should_answer_an_oversized_week_count_with_the_default_window() {
    let app = TestApp::new(planner());

    let (status, report) = send(
        app.router(),
        get("/?week_start=2024-03-04&week_count=20000000"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["weeks_to_show"], 4);
    assert_eq!(report["weeks"].as_array().unwrap().len(), 4);

    let (status, table) = send(
        app.router(),
        post_form(
            "/requirements",
            "project_id=7&week=2024-03-04&requirement=5&week_start=2024-03-04&week_count=700000000",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table["7"]["totals"]["required"], 5.0);
}

#[tokio::test]
async fn it_should_serve_the_report_and_the_mutation_over_graphql() {
    let app = TestApp::new(planner());

    let (status, body) = send(
        app.router(),
        gql(r#"{ utilisationReport(weekStart: "2024-03-04", weekCount: 1) { startingDay usersCount totalAvailable projects { projectId name allocated utilisation } } }"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let report = &body["data"]["utilisationReport"];
    assert_eq!(report["startingDay"], "2024-03-04");
    assert_eq!(report["usersCount"], 2);
    assert_eq!(report["totalAvailable"], 10.0);
    assert_eq!(report["projects"][0]["name"], "Apollo");
    assert_eq!(report["projects"][0]["utilisation"], Value::Null);

    let (_, body) = send(
        app.router(),
        gql(r#"mutation { setWeekRequirement(projectId: "7", week: "2024-03-04", requirement: "10", weekStart: "2024-03-04", weekCount: 1) { projectId required utilisation } }"#),
    )
    .await;
    let rows = &body["data"]["setWeekRequirement"];
    assert_eq!(rows[0]["projectId"], "7");
    assert_eq!(rows[0]["required"], 10.0);
    assert_eq!(rows[0]["utilisation"], 50.0);

    let (_, body) = send(
        app.router(),
        gql(r#"mutation { setWeekRequirement(projectId: "7", week: "soon", requirement: "1") { projectId } }"#),
    )
    .await;
    assert!(body["errors"][0]["message"].as_str().unwrap().contains("week"));
}

#[tokio::test]
async fn it_should_persist_cache_and_requirements_in_files_compatible_with_the_document_layout() {
    let dir = tempfile::tempdir().unwrap();
    let cache_file = dir.path().join("projects_tasks_cache.json");
    let requirements_file = dir.path().join("project_requirements.json");
    let state = AppState::new(
        Dependencies {
            planner: Arc::new(planner()),
            cache_store: Arc::new(JsonFileStore::new(&cache_file)),
            requirement_store: Arc::new(JsonFileStore::new(&requirements_file)),
            clock: Arc::new(FixedClock::new(
                date("2024-03-06").and_hms_opt(9, 0, 0).unwrap(),
            )),
        },
        &test_options(),
    );

    let (status, _) = send(
        router(state.clone()),
        post_form(
            "/requirements",
            "project_id=7&week=2024-03-04&requirement=2.5&week_start=2024-03-04&week_count=1",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let requirements: Value =
        serde_json::from_str(&std::fs::read_to_string(&requirements_file).unwrap()).unwrap();
    assert_eq!(requirements, json!({ "7": { "2024-03-04": "2.5" } }));

    let cache: Value =
        serde_json::from_str(&std::fs::read_to_string(&cache_file).unwrap()).unwrap();
    let keys: Vec<&str> = cache
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(
        keys,
        vec![
            "users",
            "project_metadata",
            "project_table_data",
            "projectless_tasks",
            "bank_holidays_allocated",
            "holidays_allocated",
        ]
    );
    let entry = &cache["project_table_data"]["2024-03-04__1"];
    assert_eq!(entry["created"], "2024-03-06 09:00:00");
    assert_eq!(entry["content"]["7"]["2024-03-04"]["required"], 2.5);
    assert!(cache["users"]["2024-03-06 09:00:00"]["1"]["name"] == "Alice");

    // a second process over the same files answers from the cache
    let (_, report) = send(router(state), get("/?week_start=2024-03-04&week_count=1")).await;
    assert_eq!(report["project_table_data"]["7"]["totals"]["required"], 2.5);
}
