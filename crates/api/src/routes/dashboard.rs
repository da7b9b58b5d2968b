//! Route definitions for the cross-project dashboard views.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`.
///
/// ```text
/// GET /matrix    -> impact/effort prioritization matrix
/// GET /deadlines -> projects ending within the window (?days=)
/// GET /stats     -> portfolio roll-up (?scope=all|done|ongoing)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/matrix", get(dashboard::matrix))
        .route("/deadlines", get(dashboard::deadlines))
        .route("/stats", get(dashboard::stats))
}
