//! Handlers for the `/projects` resource, including the derived
//! health, board, and activity views.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use compass_core::error::CoreError;
use compass_core::health::{compute_project_health, ProjectHealth};
use compass_core::kanban::{Board, BoardTask, DEFAULT_COLUMNS};
use compass_core::types::DbId;
use compass_db::models::activity_log::{ActivityLog, NewActivityLog};
use compass_db::models::project::{CreateProject, Project, ProjectListFilter, UpdateProject};
use compass_db::models::task::Task;
use compass_db::repositories::{ActivityLogRepo, ProjectRepo, RiskRepo, TaskRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::record_activity;
use crate::middleware::auth::AuthUser;
use crate::query::{parse_enum, PaginationParams};
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /projects`.
#[derive(Debug, Deserialize)]
pub struct ProjectListQuery {
    pub status: Option<String>,
    pub priority: Option<String>,
    /// Person in charge; `managerId` is accepted as an alias.
    #[serde(alias = "managerId", alias = "manager_id")]
    pub pic: Option<String>,
    pub search: Option<String>,
}

/// One Kanban column with its tasks in board order.
#[derive(Debug, Serialize)]
pub struct BoardColumn {
    pub id: String,
    pub tasks: Vec<Task>,
}

// ---------------------------------------------------------------------------
// CRUD handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/projects
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProjectListQuery>,
) -> AppResult<Json<ApiResponse<Vec<Project>>>> {
    let filter = ProjectListFilter {
        status: query
            .status
            .as_deref()
            .map(|s| parse_enum(s, "status"))
            .transpose()?,
        priority: query
            .priority
            .as_deref()
            .map(|s| parse_enum(s, "priority"))
            .transpose()?,
        pic: query.pic,
        search: query.search,
    };
    let projects = ProjectRepo::list(&state.pool, &filter).await?;
    let count = projects.len();
    Ok(Json(ApiResponse::with_count(projects, count)))
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<ApiResponse<Project>>)> {
    input.validate()?;
    let project = ProjectRepo::create(&state.pool, &input).await?;

    record_activity(
        &state.pool,
        NewActivityLog {
            action: "project.created".into(),
            field: None,
            old_value: None,
            new_value: Some(project.name.clone()),
            project_id: project.id,
            task_id: None,
            user_id: auth.user_id,
        },
    )
    .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(project))))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Project>>> {
    let project = find_project(&state, id).await?;
    Ok(Json(ApiResponse::new(project)))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<ApiResponse<Project>>> {
    input.validate()?;
    let before = find_project(&state, id).await?;
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;

    // Status transitions are the change worth auditing in detail.
    let (field, old_value, new_value) = if before.status != project.status {
        (
            Some("status".to_string()),
            serde_json::to_string(&before.status).ok(),
            serde_json::to_string(&project.status).ok(),
        )
    } else {
        (None, None, None)
    };
    record_activity(
        &state.pool,
        NewActivityLog {
            action: "project.updated".into(),
            field,
            old_value,
            new_value,
            project_id: project.id,
            task_id: None,
            user_id: auth.user_id,
        },
    )
    .await;

    Ok(Json(ApiResponse::new(project)))
}

/// DELETE /api/v1/projects/{id}
///
/// Removes the project and all child records transactionally.
pub async fn delete(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let deleted = ProjectRepo::delete(&state.pool, id).await?;
    if deleted {
        Ok(Json(MessageResponse::new("Project deleted")))
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/health
///
/// `data` is `null` when the project has neither tasks nor risks: no
/// signal, no verdict.
pub async fn health(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Option<ProjectHealth>>>> {
    find_project(&state, id).await?;
    let tasks = TaskRepo::list(&state.pool, Some(id)).await?;
    let risks = RiskRepo::list_by_project(&state.pool, id).await?;
    let health = compute_project_health(&tasks, &risks, chrono::Utc::now());
    Ok(Json(ApiResponse::new(health)))
}

/// GET /api/v1/projects/{id}/board
///
/// The project's Kanban board: every column in order, tasks ordered by
/// position within each column.
pub async fn board(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<BoardColumn>>>> {
    find_project(&state, id).await?;
    let tasks = TaskRepo::list(&state.pool, Some(id)).await?;

    let snapshot: Vec<BoardTask> = tasks
        .iter()
        .map(|t| BoardTask {
            id: t.id,
            column_id: t.column_id.clone(),
            position: t.position,
        })
        .collect();
    let board = Board::from_tasks(&DEFAULT_COLUMNS, &snapshot);

    let columns = board
        .columns()
        .map(|(column_id, ids)| BoardColumn {
            id: column_id.to_string(),
            tasks: ids
                .iter()
                .filter_map(|task_id| tasks.iter().find(|t| t.id == *task_id).cloned())
                .collect(),
        })
        .collect();
    Ok(Json(ApiResponse::new(columns)))
}

/// GET /api/v1/projects/{id}/activity
pub async fn activity(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Vec<ActivityLog>>>> {
    find_project(&state, id).await?;
    let entries = ActivityLogRepo::list_by_project(&state.pool, id, page.limit, page.offset).await?;
    let count = entries.len();
    Ok(Json(ApiResponse::with_count(entries, count)))
}

/// Fetch a project or fail with 404.
async fn find_project(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}
