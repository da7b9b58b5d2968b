//! Task entity model and DTOs.

use compass_core::domain::{Priority, TaskRecord, TaskStatus};
use compass_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A task row from the `tasks` table.
///
/// `column_id` and `position` place the task on its project's Kanban
/// board; within one column, positions are a contiguous 0-based
/// sequence (maintained by the board engine and `TaskRepo`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub status: TaskStatus,
    pub priority: Priority,
    /// Impact on a 1..=5 scale.
    pub impact: i32,
    /// Effort on a 1..=5 scale.
    pub effort: i32,
    pub project_id: DbId,
    pub assignee_id: Option<DbId>,
    pub created_by: DbId,
    pub milestone: Option<String>,
    pub column_id: String,
    pub position: i32,
    pub start_date: Option<Timestamp>,
    /// The task's ETA; used for overdue calculations.
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TaskRecord for Task {
    fn status(&self) -> TaskStatus {
        self.status
    }
    fn priority(&self) -> Priority {
        self.priority
    }
    fn assignee_id(&self) -> Option<DbId> {
        self.assignee_id
    }
    fn milestone(&self) -> Option<&str> {
        self.milestone.as_deref()
    }
    fn due_date(&self) -> Option<Timestamp> {
        self.due_date
    }
}

/// DTO for creating a new task. The position is assigned server-side
/// (appended to the end of the target column).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    #[validate(length(min = 1, message = "Task title is required"))]
    pub title: String,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    #[validate(range(min = 1, max = 5, message = "impact must be between 1 and 5"))]
    pub impact: Option<i32>,
    #[validate(range(min = 1, max = 5, message = "effort must be between 1 and 5"))]
    pub effort: Option<i32>,
    pub project_id: DbId,
    pub assignee_id: Option<DbId>,
    pub milestone: Option<String>,
    /// Defaults to `todo` if omitted.
    pub column_id: Option<String>,
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
}

/// DTO for partially updating a task via PATCH. Column and position are
/// deliberately absent: board placement changes only through the move
/// endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateTask {
    #[validate(length(min = 1, message = "Task title is required"))]
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    #[validate(range(min = 1, max = 5, message = "impact must be between 1 and 5"))]
    pub impact: Option<i32>,
    #[validate(range(min = 1, max = 5, message = "effort must be between 1 and 5"))]
    pub effort: Option<i32>,
    pub assignee_id: Option<DbId>,
    pub milestone: Option<String>,
    pub start_date: Option<Timestamp>,
    pub due_date: Option<Timestamp>,
}
