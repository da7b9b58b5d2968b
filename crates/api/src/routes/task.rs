//! Route definitions for the `/tasks` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::task;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /                                  -> list (filterable)
/// POST   /                                  -> create
/// GET    /{id}                              -> get_by_id (with dependencies)
/// PATCH  /{id}                              -> update (fields only, not placement)
/// DELETE /{id}                              -> delete (renumbers the column)
///
/// POST   /{id}/move                         -> drag-end board move
/// POST   /{id}/dependencies                 -> add dependency
/// DELETE /{id}/dependencies/{depends_on_id} -> remove dependency
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(task::list).post(task::create))
        .route(
            "/{id}",
            get(task::get_by_id).patch(task::update).delete(task::delete),
        )
        .route("/{id}/move", post(task::move_task))
        .route("/{id}/dependencies", post(task::add_dependency))
        .route(
            "/{id}/dependencies/{depends_on_id}",
            delete(task::remove_dependency),
        )
}
