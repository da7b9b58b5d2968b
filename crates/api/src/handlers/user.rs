//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::Json;
use compass_db::models::user::UserResponse;
use compass_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// GET /api/v1/users
///
/// List active users with safe fields only; the password hash never
/// crosses this boundary.
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list_active(&state.pool).await?;
    let count = users.len();
    Ok(Json(ApiResponse::with_count(users, count)))
}
