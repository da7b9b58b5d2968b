//! Route definitions for directly-addressed risks.
//!
//! Creation and listing live under `/projects/{id}/risks`.

use axum::routing::get;
use axum::Router;

use crate::handlers::risk;
use crate::state::AppState;

/// Routes mounted at `/risks`.
///
/// ```text
/// GET    /{id} -> get_by_id
/// PATCH  /{id} -> update (score recomputed)
/// DELETE /{id} -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(risk::get_by_id).patch(risk::update).delete(risk::delete),
    )
}
