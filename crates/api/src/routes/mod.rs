pub mod auth;
pub mod change_request;
pub mod dashboard;
pub mod health;
pub mod project;
pub mod risk;
pub mod task;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                            register (public)
/// /auth/login                               login (public)
/// /auth/me                                  current user (requires auth)
///
/// /projects                                 list, create
/// /projects/{id}                            get, update, delete
/// /projects/{id}/health                     derived health (GET)
/// /projects/{id}/board                      Kanban board (GET)
/// /projects/{id}/activity                   audit trail (GET, paginated)
/// /projects/{id}/risks                      list, create
/// /projects/{id}/change-requests            list, create
///
/// /tasks                                    list (filterable), create
/// /tasks/{id}                               get, update (PATCH), delete
/// /tasks/{id}/move                          drag-end board move (POST)
/// /tasks/{id}/dependencies                  add dependency (POST)
/// /tasks/{id}/dependencies/{depends_on_id}  remove dependency (DELETE)
///
/// /risks/{id}                               get, update (PATCH), delete
/// /change-requests/{id}                     get, update (PATCH)
/// /change-requests/{id}/tasks               link task (POST)
/// /change-requests/{id}/tasks/{task_id}     unlink task (DELETE)
///
/// /dashboard/matrix                         prioritization matrix (GET)
/// /dashboard/deadlines                      upcoming deadlines (GET, ?days=)
/// /dashboard/stats                          portfolio roll-up (GET, ?scope=)
///
/// /users                                    list active users (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication (register, login, me).
        .nest("/auth", auth::router())
        // Project routes (also nests risks, change requests, and the
        // derived health/board/activity views).
        .nest("/projects", project::router())
        // Task routes, including board moves and dependencies.
        .nest("/tasks", task::router())
        // Directly-addressed risks and change requests.
        .nest("/risks", risk::router())
        .nest("/change-requests", change_request::router())
        // Cross-project dashboard views.
        .nest("/dashboard", dashboard::router())
        // User directory for assignee pickers.
        .nest("/users", user::router())
}
