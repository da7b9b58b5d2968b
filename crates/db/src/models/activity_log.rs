//! Activity log entity model.
//!
//! The activity log is an append-only audit trail: rows are inserted by
//! mutating handlers and never updated or deleted.

use compass_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An activity log row from the `activity_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: DbId,
    /// What happened, e.g. `task.moved` or `project.updated`.
    pub action: String,
    pub field: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub project_id: DbId,
    pub task_id: Option<DbId>,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// Insert payload for a new activity log entry.
#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub action: String,
    pub field: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub project_id: DbId,
    pub task_id: Option<DbId>,
    pub user_id: DbId,
}
