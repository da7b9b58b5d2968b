//! Handlers for project change requests.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use compass_core::error::CoreError;
use compass_core::types::DbId;
use compass_db::models::activity_log::NewActivityLog;
use compass_db::models::change_request::{
    ChangeRequest, CreateChangeRequest, UpdateChangeRequest,
};
use compass_db::repositories::{ChangeRequestRepo, ProjectRepo, TaskRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::record_activity;
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// Request body for `POST /change-requests/{id}/tasks`.
#[derive(Debug, Deserialize)]
pub struct LinkTaskRequest {
    pub task_id: DbId,
}

/// A change request with the tasks it affects, for the detail endpoint.
#[derive(Debug, Serialize)]
pub struct ChangeRequestDetail {
    #[serde(flatten)]
    pub request: ChangeRequest,
    /// Tasks this change request is linked to.
    pub linked_tasks: Vec<DbId>,
}

/// GET /api/v1/projects/{id}/change-requests
pub async fn list(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<ChangeRequest>>>> {
    ensure_project(&state, project_id).await?;
    let requests = ChangeRequestRepo::list_by_project(&state.pool, project_id).await?;
    let count = requests.len();
    Ok(Json(ApiResponse::with_count(requests, count)))
}

/// POST /api/v1/projects/{id}/change-requests
///
/// New change requests always start PENDING; the requester is the
/// authenticated user.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateChangeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ChangeRequest>>)> {
    input.validate()?;
    ensure_project(&state, project_id).await?;
    let request =
        ChangeRequestRepo::create(&state.pool, project_id, auth.user_id, &input).await?;

    record_activity(
        &state.pool,
        NewActivityLog {
            action: "change_request.created".into(),
            field: None,
            old_value: None,
            new_value: Some(request.title.clone()),
            project_id,
            task_id: None,
            user_id: auth.user_id,
        },
    )
    .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(request))))
}

/// GET /api/v1/change-requests/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<ChangeRequestDetail>>> {
    let request = find_change_request(&state, id).await?;
    let linked_tasks = ChangeRequestRepo::linked_tasks(&state.pool, id).await?;
    Ok(Json(ApiResponse::new(ChangeRequestDetail {
        request,
        linked_tasks,
    })))
}

/// PATCH /api/v1/change-requests/{id}
///
/// Typically a status decision (PENDING -> APPROVED or REJECTED), which
/// is recorded in the project's audit trail.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateChangeRequest>,
) -> AppResult<Json<ApiResponse<ChangeRequest>>> {
    input.validate()?;
    let before = find_change_request(&state, id).await?;
    let request = ChangeRequestRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ChangeRequest",
            id,
        }))?;

    if before.status != request.status {
        record_activity(
            &state.pool,
            NewActivityLog {
                action: "change_request.decided".into(),
                field: Some("status".into()),
                old_value: serde_json::to_string(&before.status).ok(),
                new_value: serde_json::to_string(&request.status).ok(),
                project_id: request.project_id,
                task_id: None,
                user_id: auth.user_id,
            },
        )
        .await;
    }

    Ok(Json(ApiResponse::new(request)))
}

// ---------------------------------------------------------------------------
// Task links
// ---------------------------------------------------------------------------

/// POST /api/v1/change-requests/{id}/tasks
///
/// Link a task to the change request. Both must belong to the same
/// project; linking the same task twice is a successful no-op.
pub async fn link_task(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<LinkTaskRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let request = find_change_request(&state, id).await?;
    let task = TaskRepo::find_by_id(&state.pool, input.task_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Task",
            id: input.task_id,
        }))?;
    if task.project_id != request.project_id {
        return Err(AppError::Core(CoreError::Validation(
            "Task belongs to a different project".into(),
        )));
    }

    ChangeRequestRepo::link_task(&state.pool, id, input.task_id).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("Task linked"))))
}

/// DELETE /api/v1/change-requests/{id}/tasks/{task_id}
pub async fn unlink_task(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((id, task_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MessageResponse>> {
    let removed = ChangeRequestRepo::unlink_task(&state.pool, id, task_id).await?;
    if removed {
        Ok(Json(MessageResponse::new("Task unlinked")))
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "TaskLink",
            id: task_id,
        }))
    }
}

async fn find_change_request(state: &AppState, id: DbId) -> AppResult<ChangeRequest> {
    ChangeRequestRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "ChangeRequest",
            id,
        }))
}

async fn ensure_project(state: &AppState, id: DbId) -> AppResult<()> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}
