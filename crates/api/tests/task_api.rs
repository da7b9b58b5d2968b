//! HTTP-level integration tests for task CRUD, the filter engine, and
//! the dependency relation.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_test_user, delete_auth, get, patch_json_auth, post_json_auth,
};
use compass_core::domain::UserRole;
use sqlx::PgPool;

async fn create_project(pool: &PgPool, token: &str, name: &str) -> i64 {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/projects",
        serde_json::json!({ "name": name }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn create_task(pool: &PgPool, token: &str, body: serde_json::Value) -> i64 {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/tasks",
        body,
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// Creating a task against a missing project is a 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_task_missing_project(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "dev", UserRole::Member).await;
    let token = common::auth_token(&user);

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/tasks",
        serde_json::json!({ "title": "Homeless", "project_id": 424242 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// PATCH applies only the provided fields and rejects board placement.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_patch_task_fields_only(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "dev", UserRole::Member).await;
    let token = common::auth_token(&user);
    let project_id = create_project(&pool, &token, "Patchwork").await;
    let task_id = create_task(
        &pool,
        &token,
        serde_json::json!({ "title": "Original", "project_id": project_id, "priority": "LOW" }),
    )
    .await;

    let response = patch_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{task_id}"),
        serde_json::json!({ "status": "IN_PROGRESS" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "IN_PROGRESS");
    // Untouched fields survive the partial update.
    assert_eq!(json["data"]["title"], "Original");
    assert_eq!(json["data"]["priority"], "LOW");

    // Board placement does not travel through PATCH.
    let response = patch_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/tasks/{task_id}"),
        serde_json::json!({ "column_id": "done" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Filters compose with AND; absent filters are the identity.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_task_filters_compose(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "dev", UserRole::Member).await;
    let token = common::auth_token(&user);
    let project_id = create_project(&pool, &token, "Filtered").await;

    create_task(
        &pool,
        &token,
        serde_json::json!({
            "title": "urgent todo",
            "project_id": project_id,
            "priority": "URGENT"
        }),
    )
    .await;
    create_task(
        &pool,
        &token,
        serde_json::json!({
            "title": "urgent blocked",
            "project_id": project_id,
            "priority": "URGENT",
            "status": "BLOCKED"
        }),
    )
    .await;
    create_task(
        &pool,
        &token,
        serde_json::json!({
            "title": "low todo",
            "project_id": project_id,
            "priority": "LOW"
        }),
    )
    .await;

    // No filter: everything.
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tasks?projectId={project_id}"),
    )
    .await;
    assert_eq!(body_json(response).await["count"], 3);

    // Single predicate.
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tasks?projectId={project_id}&priority=URGENT"),
    )
    .await;
    assert_eq!(body_json(response).await["count"], 2);

    // AND composition narrows further.
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tasks?projectId={project_id}&priority=URGENT&status=BLOCKED"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["title"], "urgent blocked");

    // Comma-separated values widen a single predicate.
    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/tasks?projectId={project_id}&status=TODO,BLOCKED"),
    )
    .await;
    assert_eq!(body_json(response).await["count"], 3);
}

/// The overdue filter keeps only past-due tasks that are not DONE.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_overdue_filter(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "dev", UserRole::Member).await;
    let token = common::auth_token(&user);
    let project_id = create_project(&pool, &token, "Deadlines").await;

    create_task(
        &pool,
        &token,
        serde_json::json!({
            "title": "late",
            "project_id": project_id,
            "due_date": "2020-01-01T00:00:00Z"
        }),
    )
    .await;
    create_task(
        &pool,
        &token,
        serde_json::json!({
            "title": "late but done",
            "project_id": project_id,
            "status": "DONE",
            "due_date": "2020-01-01T00:00:00Z"
        }),
    )
    .await;
    create_task(
        &pool,
        &token,
        serde_json::json!({
            "title": "future",
            "project_id": project_id,
            "due_date": "2999-01-01T00:00:00Z"
        }),
    )
    .await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/tasks?projectId={project_id}&overdue=true"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["title"], "late");
}

// ---------------------------------------------------------------------------
// Dependencies
// ---------------------------------------------------------------------------

/// Dependencies are added, surfaced on the detail view, and removed.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_dependency_lifecycle(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "dev", UserRole::Member).await;
    let token = common::auth_token(&user);
    let project_id = create_project(&pool, &token, "Chained").await;

    let blocker = create_task(
        &pool,
        &token,
        serde_json::json!({ "title": "blocker", "project_id": project_id }),
    )
    .await;
    let blocked = create_task(
        &pool,
        &token,
        serde_json::json!({ "title": "blocked", "project_id": project_id }),
    )
    .await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{blocked}/dependencies"),
        serde_json::json!({ "depends_on_id": blocker }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{blocked}"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["dependencies"][0], blocker);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{blocker}"),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["dependents"][0], blocked);

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{blocked}/dependencies/{blocker}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/tasks/{blocked}"),
    )
    .await;
    let json = body_json(response).await;
    assert!(json["data"]["dependencies"].as_array().unwrap().is_empty());
}

/// A task cannot depend on itself.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_self_dependency_rejected(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "dev", UserRole::Member).await;
    let token = common::auth_token(&user);
    let project_id = create_project(&pool, &token, "Loop").await;
    let task_id = create_task(
        &pool,
        &token,
        serde_json::json!({ "title": "ouroboros", "project_id": project_id }),
    )
    .await;

    let response = post_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/tasks/{task_id}/dependencies"),
        serde_json::json!({ "depends_on_id": task_id }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
