//! HTTP-level integration tests for the dashboard views: matrix,
//! deadlines, and portfolio stats.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_test_user, get, post_json_auth};
use compass_core::domain::UserRole;
use sqlx::PgPool;

async fn create_project(pool: &PgPool, token: &str, body: serde_json::Value) -> i64 {
    let response = post_json_auth(
        common::build_test_app(pool.clone()),
        "/api/v1/projects",
        body,
        token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Every project lands in exactly one quadrant, on the documented
/// boundaries.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_matrix_quadrants(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "pm", UserRole::Manager).await;
    let token = common::auth_token(&user);

    let quick_win = create_project(
        &pool,
        &token,
        serde_json::json!({ "name": "QW", "business_impact": 6, "tech_effort": 5 }),
    )
    .await;
    let major = create_project(
        &pool,
        &token,
        serde_json::json!({ "name": "MP", "business_impact": 9, "tech_effort": 8 }),
    )
    .await;
    let fill_in = create_project(
        &pool,
        &token,
        serde_json::json!({ "name": "FI", "business_impact": 2, "tech_effort": 2 }),
    )
    .await;
    let thankless = create_project(
        &pool,
        &token,
        serde_json::json!({ "name": "TT", "business_impact": 3, "tech_effort": 9 }),
    )
    .await;

    let response = get(common::build_test_app(pool), "/api/v1/dashboard/matrix").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 4);

    let quadrant_of = |id: i64| {
        json["data"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["project_id"] == id)
            .map(|e| e["quadrant"].as_str().unwrap().to_string())
            .unwrap()
    };
    assert_eq!(quadrant_of(quick_win), "quick_wins");
    assert_eq!(quadrant_of(major), "major_projects");
    assert_eq!(quadrant_of(fill_in), "fill_ins");
    assert_eq!(quadrant_of(thankless), "thankless_tasks");
}

/// The deadlines view keeps only projects ending inside the window,
/// soonest first, and skips projects with no end date.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_deadlines_window_and_order(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "pm", UserRole::Manager).await;
    let token = common::auth_token(&user);

    let soon = chrono::Utc::now() + chrono::Duration::days(3);
    let later = chrono::Utc::now() + chrono::Duration::days(20);
    let beyond = chrono::Utc::now() + chrono::Duration::days(90);

    create_project(
        &pool,
        &token,
        serde_json::json!({ "name": "Later", "end_date": later.to_rfc3339() }),
    )
    .await;
    create_project(
        &pool,
        &token,
        serde_json::json!({ "name": "Soon", "end_date": soon.to_rfc3339() }),
    )
    .await;
    create_project(
        &pool,
        &token,
        serde_json::json!({ "name": "Beyond", "end_date": beyond.to_rfc3339() }),
    )
    .await;
    create_project(&pool, &token, serde_json::json!({ "name": "Open-ended" })).await;

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/dashboard/deadlines",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["count"], 2);
    assert_eq!(json["data"][0]["name"], "Soon");
    assert_eq!(json["data"][1]["name"], "Later");
    assert_eq!(json["data"][0]["days_left"], 2);

    // A wider window pulls in the distant project too.
    let response = get(
        common::build_test_app(pool),
        "/api/v1/dashboard/deadlines?days=120",
    )
    .await;
    assert_eq!(body_json(response).await["count"], 3);
}

/// Portfolio stats sum financial fields over the selected scope.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_stats_scopes(pool: PgPool) {
    let (user, _) = create_test_user(&pool, "pm", UserRole::Manager).await;
    let token = common::auth_token(&user);

    create_project(
        &pool,
        &token,
        serde_json::json!({
            "name": "Done deal",
            "status": "DONE",
            "project_value": 1000.0,
            "revenue_uplift": 50.0
        }),
    )
    .await;
    create_project(
        &pool,
        &token,
        serde_json::json!({
            "name": "Running",
            "status": "IN_PROGRESS",
            "project_value": 200.0
        }),
    )
    .await;
    create_project(
        &pool,
        &token,
        serde_json::json!({ "name": "Abandoned", "status": "CANCELLED", "project_value": 999.0 }),
    )
    .await;

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/dashboard/stats",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["project_count"], 3);
    assert_eq!(json["data"]["total_project_value"], 2199.0);

    let response = get(
        common::build_test_app(pool.clone()),
        "/api/v1/dashboard/stats?scope=done",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["project_count"], 1);
    assert_eq!(json["data"]["total_project_value"], 1000.0);
    assert_eq!(json["data"]["total_revenue_uplift"], 50.0);

    // Ongoing excludes DONE and CANCELLED.
    let response = get(
        common::build_test_app(pool),
        "/api/v1/dashboard/stats?scope=ongoing",
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["project_count"], 1);
    assert_eq!(json["data"]["total_project_value"], 200.0);
}
