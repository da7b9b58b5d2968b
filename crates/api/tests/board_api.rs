//! HTTP-level integration tests for the Kanban board: task placement,
//! drag-end moves, and position renumbering.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_user, delete_auth, get, post_json_auth};
use compass_core::domain::UserRole;
use sqlx::PgPool;

/// Create a project and three tasks in its `todo` column; returns
/// `(project_id, [task ids in position order])`.
async fn seed_board(pool: &PgPool, token: &str) -> (i64, Vec<i64>) {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/projects",
        serde_json::json!({ "name": "Board project" }),
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let project_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let mut task_ids = Vec::new();
    for title in ["first", "second", "third"] {
        let response = post_json_auth(
            common::build_test_app(pool.clone()),
            "/api/v1/tasks",
            serde_json::json!({ "title": title, "project_id": project_id }),
            token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        task_ids.push(body_json(response).await["data"]["id"].as_i64().unwrap());
    }
    (project_id, task_ids)
}

/// Fetch the board and return `(column id, task ids)` pairs.
async fn board_columns(pool: &PgPool, project_id: i64) -> Vec<(String, Vec<i64>)> {
    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/projects/{project_id}/board"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|col| {
            (
                col["id"].as_str().unwrap().to_string(),
                col["tasks"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|t| t["id"].as_i64().unwrap())
                    .collect(),
            )
        })
        .collect()
}

/// New tasks append to the end of their column with contiguous
/// positions.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_created_tasks_append_in_order(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "dev", UserRole::Member).await;
    let token = common::auth_token(&user);
    let (project_id, task_ids) = seed_board(&pool, &token).await;

    let columns = board_columns(&pool, project_id).await;
    assert_eq!(columns[0].0, "todo");
    assert_eq!(columns[0].1, task_ids);
    // The default columns are always present, even when empty.
    let ids: Vec<&str> = columns.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, ["todo", "in-progress", "uat", "done"]);

    let positions: Vec<i32> =
        sqlx::query_scalar("SELECT position FROM tasks WHERE project_id = $1 ORDER BY position")
            .bind(project_id)
            .fetch_all(&pool)
            .await
            .unwrap();
    assert_eq!(positions, vec![0, 1, 2]);
}

/// Moving a task across columns renumbers both columns contiguously.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_move_across_columns(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "dev", UserRole::Member).await;
    let token = common::auth_token(&user);
    let (project_id, task_ids) = seed_board(&pool, &token).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{}/move", task_ids[0]),
        serde_json::json!({ "column_id": "in-progress", "position": 0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["column_id"], "in-progress");
    assert_eq!(json["data"]["position"], 0);

    let columns = board_columns(&pool, project_id).await;
    assert_eq!(columns[0].1, vec![task_ids[1], task_ids[2]]);
    assert_eq!(columns[1].1, vec![task_ids[0]]);

    // Source column closed ranks: positions are 0 and 1 again.
    let todo_positions: Vec<i32> = sqlx::query_scalar(
        "SELECT position FROM tasks WHERE project_id = $1 AND column_id = 'todo' ORDER BY position",
    )
    .bind(project_id)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(todo_positions, vec![0, 1]);
}

/// Reordering within a column works and an out-of-range index clamps
/// to the end.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_move_within_column_and_clamp(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "dev", UserRole::Member).await;
    let token = common::auth_token(&user);
    let (project_id, task_ids) = seed_board(&pool, &token).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{}/move", task_ids[0]),
        serde_json::json!({ "column_id": "todo", "position": 99 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let columns = board_columns(&pool, project_id).await;
    assert_eq!(columns[0].1, vec![task_ids[1], task_ids[2], task_ids[0]]);
}

/// Moving a task onto its current slot is a successful no-op.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_move_to_current_slot_is_noop(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "dev", UserRole::Member).await;
    let token = common::auth_token(&user);
    let (project_id, task_ids) = seed_board(&pool, &token).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{}/move", task_ids[1]),
        serde_json::json!({ "column_id": "todo", "position": 1 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let columns = board_columns(&pool, project_id).await;
    assert_eq!(columns[0].1, task_ids);
}

/// Moving to an unknown column is a 400; an unknown task is a 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_move_error_cases(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "dev", UserRole::Member).await;
    let token = common::auth_token(&user);
    let (_, task_ids) = seed_board(&pool, &token).await;

    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{}/move", task_ids[0]),
        serde_json::json!({ "column_id": "limbo", "position": 0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        common::build_test_app(pool),
        "/api/v1/tasks/99999/move",
        serde_json::json!({ "column_id": "todo", "position": 0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// Deleting a task renumbers the remaining siblings in its column.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_task_renumbers_column(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "dev", UserRole::Member).await;
    let token = common::auth_token(&user);
    let (project_id, task_ids) = seed_board(&pool, &token).await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/tasks/{}", task_ids[0]),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let columns = board_columns(&pool, project_id).await;
    assert_eq!(columns[0].1, vec![task_ids[1], task_ids[2]]);

    let positions: Vec<i32> = sqlx::query_scalar(
        "SELECT position FROM tasks WHERE project_id = $1 AND column_id = 'todo' ORDER BY position",
    )
    .bind(project_id)
    .fetch_all(&pool)
    .await
    .unwrap();
    assert_eq!(positions, vec![0, 1]);
}
