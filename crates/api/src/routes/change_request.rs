//! Route definitions for directly-addressed change requests.
//!
//! Creation and listing live under `/projects/{id}/change-requests`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::change_request;
use crate::state::AppState;

/// Routes mounted at `/change-requests`.
///
/// ```text
/// GET    /{id}                 -> get_by_id (with linked tasks)
/// PATCH  /{id}                 -> update (typically the status decision)
/// POST   /{id}/tasks           -> link_task
/// DELETE /{id}/tasks/{task_id} -> unlink_task
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(change_request::get_by_id).patch(change_request::update),
        )
        .route("/{id}/tasks", post(change_request::link_task))
        .route(
            "/{id}/tasks/{task_id}",
            delete(change_request::unlink_task),
        )
}
