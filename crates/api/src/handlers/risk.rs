//! Handlers for project risks.
//!
//! Risks are nested under their project for create/list and addressed
//! directly for update/delete.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use compass_core::error::CoreError;
use compass_core::types::DbId;
use compass_db::models::activity_log::NewActivityLog;
use compass_db::models::risk::{CreateRisk, Risk, UpdateRisk};
use compass_db::repositories::{ProjectRepo, RiskRepo};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::handlers::record_activity;
use crate::middleware::auth::AuthUser;
use crate::response::{ApiResponse, MessageResponse};
use crate::state::AppState;

/// GET /api/v1/projects/{id}/risks
///
/// A project's risks, highest score first.
pub async fn list(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<Risk>>>> {
    ensure_project(&state, project_id).await?;
    let risks = RiskRepo::list_by_project(&state.pool, project_id).await?;
    let count = risks.len();
    Ok(Json(ApiResponse::with_count(risks, count)))
}

/// POST /api/v1/projects/{id}/risks
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<CreateRisk>,
) -> AppResult<(StatusCode, Json<ApiResponse<Risk>>)> {
    input.validate()?;
    ensure_project(&state, project_id).await?;
    let risk = RiskRepo::create(&state.pool, project_id, &input).await?;

    record_activity(
        &state.pool,
        NewActivityLog {
            action: "risk.created".into(),
            field: None,
            old_value: None,
            new_value: Some(risk.title.clone()),
            project_id,
            task_id: None,
            user_id: auth.user_id,
        },
    )
    .await;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(risk))))
}

/// GET /api/v1/risks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Risk>>> {
    let risk = find_risk(&state, id).await?;
    Ok(Json(ApiResponse::new(risk)))
}

/// PATCH /api/v1/risks/{id}
///
/// The stored score is recomputed from the effective probability and
/// impact on every update.
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRisk>,
) -> AppResult<Json<ApiResponse<Risk>>> {
    input.validate()?;
    let before = find_risk(&state, id).await?;
    let risk = RiskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Risk", id }))?;

    let (field, old_value, new_value) = if before.severity != risk.severity {
        (
            Some("severity".to_string()),
            serde_json::to_string(&before.severity).ok(),
            serde_json::to_string(&risk.severity).ok(),
        )
    } else {
        (None, None, None)
    };
    record_activity(
        &state.pool,
        NewActivityLog {
            action: "risk.updated".into(),
            field,
            old_value,
            new_value,
            project_id: risk.project_id,
            task_id: None,
            user_id: auth.user_id,
        },
    )
    .await;

    Ok(Json(ApiResponse::new(risk)))
}

/// DELETE /api/v1/risks/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    let risk = find_risk(&state, id).await?;
    RiskRepo::delete(&state.pool, id).await?;

    record_activity(
        &state.pool,
        NewActivityLog {
            action: "risk.deleted".into(),
            field: None,
            old_value: Some(risk.title),
            new_value: None,
            project_id: risk.project_id,
            task_id: None,
            user_id: auth.user_id,
        },
    )
    .await;

    Ok(Json(MessageResponse::new("Risk deleted")))
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

async fn find_risk(state: &AppState, id: DbId) -> AppResult<Risk> {
    RiskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Risk", id }))
}
