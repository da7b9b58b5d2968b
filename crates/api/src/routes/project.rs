//! Route definitions for the `/projects` resource.
//!
//! Also nests risks and change requests under
//! `/projects/{id}/...`, plus the derived health, board, and activity
//! views.

use axum::routing::get;
use axum::Router;

use crate::handlers::{change_request, project, risk};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /{id}                   -> get_by_id
/// PUT    /{id}                   -> update
/// DELETE /{id}                   -> delete
///
/// GET    /{id}/health            -> derived health
/// GET    /{id}/board             -> Kanban board
/// GET    /{id}/activity          -> audit trail (paginated)
///
/// GET    /{id}/risks             -> list risks
/// POST   /{id}/risks             -> create risk
/// GET    /{id}/change-requests   -> list change requests
/// POST   /{id}/change-requests   -> create change request
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{id}/health", get(project::health))
        .route("/{id}/board", get(project::board))
        .route("/{id}/activity", get(project::activity))
        .route("/{id}/risks", get(risk::list).post(risk::create))
        .route(
            "/{id}/change-requests",
            get(change_request::list).post(change_request::create),
        )
}
