//! Handlers for the `/tasks` resource, including board moves and the
//! dependency relation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use compass_core::error::CoreError;
use compass_core::filter::TaskFilter;
use compass_core::kanban::{Board, BoardTask, DEFAULT_COLUMNS};
use compass_core::types::DbId;
use compass_db::models::activity_log::NewActivityLog;
use compass_db::models::task::{CreateTask, Task, UpdateTask};
use compass_db::repositories::{ProjectRepo, TaskRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::record_activity;
use crate::middleware::auth::AuthUser;
use crate::query::{parse_enum_set, parse_id_set};
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /tasks`. Set-valued filters are
/// comma-separated lists in their wire form (`?status=TODO,BLOCKED`).
#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    #[serde(alias = "projectId")]
    pub project_id: Option<DbId>,
    pub status: Option<String>,
    pub priority: Option<String>,
    #[serde(alias = "assigneeId")]
    pub assignee_id: Option<String>,
    pub milestone: Option<String>,
    #[serde(default)]
    pub overdue: bool,
}

/// Request body for `POST /tasks/{id}/move`: the drag-end commit.
#[derive(Debug, Deserialize)]
pub struct MoveTaskRequest {
    pub column_id: String,
    /// Target index within the column; clamped to the column length.
    pub position: usize,
}

/// Request body for `POST /tasks/{id}/dependencies`.
#[derive(Debug, Deserialize)]
pub struct AddDependencyRequest {
    pub depends_on_id: DbId,
}

/// A task with its dependency edges, for the detail endpoint.
#[derive(Debug, Serialize)]
pub struct TaskDetail {
    #[serde(flatten)]
    pub task: Task,
    /// Tasks this one depends on (its blockers).
    pub dependencies: Vec<DbId>,
    /// Tasks blocked by this one.
    pub dependents: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// CRUD handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/tasks
///
/// Lists tasks, narrowed by the project and by the in-memory filter
/// engine. Filters compose with AND; an empty filter is the identity.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<TaskListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Task>>>> {
    let filter = TaskFilter {
        statuses: parse_enum_set(query.status.as_deref(), "status")?,
        priorities: parse_enum_set(query.priority.as_deref(), "priority")?,
        assignees: parse_id_set(query.assignee_id.as_deref(), "assigneeId")?,
        milestones: query
            .milestone
            .as_deref()
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|part| !part.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
        overdue: query.overdue,
    };

    let tasks = TaskRepo::list(&state.pool, query.project_id).await?;
    let filtered: Vec<Task> = filter
        .apply(&tasks, chrono::Utc::now())
        .into_iter()
        .cloned()
        .collect();
    let count = filtered.len();
    Ok(Json(ApiResponse::with_count(filtered, count)))
}

/// POST /api/v1/tasks
///
/// The new task lands at the end of its column; its position is
/// assigned server-side.
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<ApiResponse<Task>>)> {
    input.validate()?;
    if ProjectRepo::find_by_id(&state.pool, input.project_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: input.project_id,
        }));
    }

    let task = TaskRepo::create(&state.pool, &input, auth.user_id).await?;

    record_activity(
        &state.pool,
        NewActivityLog {
            action: "task.created".into(),
            field: None,
            old_value: None,
            new_value: Some(task.title.clone()),
            project_id: task.project_id,
            task_id: Some(task.id),
            user_id: auth.user_id,
        },
    )
    .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(task))))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<TaskDetail>>> {
    let task = find_task(&state, id).await?;
    let dependencies = TaskRepo::dependencies(&state.pool, id).await?;
    let dependents = TaskRepo::dependents(&state.pool, id).await?;
    Ok(Json(ApiResponse::new(TaskDetail {
        task,
        dependencies,
        dependents,
    })))
}

/// PATCH /api/v1/tasks/{id}
///
/// Partial update of task fields. Board placement is rejected here
/// (unknown fields are a 400); it changes only through the move
/// endpoint.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<ApiResponse<Task>>> {
    input.validate()?;
    let before = find_task(&state, id).await?;
    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;

    let (field, old_value, new_value) = if before.status != task.status {
        (
            Some("status".to_string()),
            serde_json::to_string(&before.status).ok(),
            serde_json::to_string(&task.status).ok(),
        )
    } else {
        (None, None, None)
    };
    record_activity(
        &state.pool,
        NewActivityLog {
            action: "task.updated".into(),
            field,
            old_value,
            new_value,
            project_id: task.project_id,
            task_id: Some(task.id),
            user_id: auth.user_id,
        },
    )
    .await;

    Ok(Json(ApiResponse::new(task)))
}

/// DELETE /api/v1/tasks/{id}
///
/// Removes the task and renumbers its column so sibling positions stay
/// contiguous.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let task = find_task(&state, id).await?;
    TaskRepo::delete(&state.pool, id).await?;

    record_activity(
        &state.pool,
        NewActivityLog {
            action: "task.deleted".into(),
            field: None,
            old_value: Some(task.title),
            new_value: None,
            project_id: task.project_id,
            task_id: None,
            user_id: auth.user_id,
        },
    )
    .await;

    Ok(Json(MessageResponse::new("Task deleted")))
}

// ---------------------------------------------------------------------------
// Board moves
// ---------------------------------------------------------------------------

/// POST /api/v1/tasks/{id}/move
///
/// Commit a drag-and-drop move. The board is rebuilt from the current
/// snapshot, the move is computed in memory, and only the changed
/// assignments are persisted, in one transaction. Moving a task to its
/// current slot is a successful no-op.
pub async fn move_task(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<MoveTaskRequest>,
) -> AppResult<Json<ApiResponse<Task>>> {
    let task = find_task(&state, id).await?;
    let siblings = TaskRepo::list(&state.pool, Some(task.project_id)).await?;

    let snapshot: Vec<BoardTask> = siblings
        .iter()
        .map(|t| BoardTask {
            id: t.id,
            column_id: t.column_id.clone(),
            position: t.position,
        })
        .collect();
    let mut board = Board::from_tasks(&DEFAULT_COLUMNS, &snapshot);
    let changes = board.move_task(id, &input.column_id, input.position)?;

    if !changes.is_empty() {
        TaskRepo::apply_position_changes(&state.pool, &changes).await?;
        record_activity(
            &state.pool,
            NewActivityLog {
                action: "task.moved".into(),
                field: Some("column_id".into()),
                old_value: Some(task.column_id.clone()),
                new_value: Some(input.column_id.clone()),
                project_id: task.project_id,
                task_id: Some(task.id),
                user_id: auth.user_id,
            },
        )
        .await;
    }

    let task = find_task(&state, id).await?;
    Ok(Json(ApiResponse::new(task)))
}

// ---------------------------------------------------------------------------
// Dependencies
// ---------------------------------------------------------------------------

/// POST /api/v1/tasks/{id}/dependencies
pub async fn add_dependency(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<AddDependencyRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    if id == input.depends_on_id {
        return Err(AppError::Core(CoreError::Validation(
            "A task cannot depend on itself".into(),
        )));
    }
    find_task(&state, id).await?;
    find_task(&state, input.depends_on_id).await?;

    TaskRepo::add_dependency(&state.pool, id, input.depends_on_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Dependency added")),
    ))
}

/// DELETE /api/v1/tasks/{id}/dependencies/{depends_on_id}
pub async fn remove_dependency(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path((id, depends_on_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<MessageResponse>> {
    let removed = TaskRepo::remove_dependency(&state.pool, id, depends_on_id).await?;
    if removed {
        Ok(Json(MessageResponse::new("Dependency removed")))
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Dependency",
            id: depends_on_id,
        }))
    }
}

/// Fetch a task or fail with 404.
async fn find_task(state: &AppState, id: DbId) -> AppResult<Task> {
    TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))
}
