//! Repository for the `activity_logs` table.
//!
//! Append-only: there is deliberately no update or single-row delete.

use compass_core::types::DbId;
use sqlx::PgPool;

use crate::models::activity_log::{ActivityLog, NewActivityLog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, action, field, old_value, new_value, project_id, task_id, user_id, created_at";

/// Default page size for activity listings.
const DEFAULT_LIMIT: i64 = 50;
/// Hard cap on a single activity page.
const MAX_LIMIT: i64 = 200;

/// Provides append and read operations for the audit trail.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append an entry to the audit trail.
    pub async fn insert(pool: &PgPool, entry: &NewActivityLog) -> Result<ActivityLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_logs
                (action, field, old_value, new_value, project_id, task_id, user_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(&entry.action)
            .bind(&entry.field)
            .bind(&entry.old_value)
            .bind(&entry.new_value)
            .bind(entry.project_id)
            .bind(entry.task_id)
            .bind(entry.user_id)
            .fetch_one(pool)
            .await
    }

    /// List a project's activity, newest first, paginated.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = offset.unwrap_or(0).max(0);
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs WHERE project_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(project_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
