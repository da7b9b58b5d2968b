//! Repository for the `change_requests` table and the change-request /
//! task link relation.

use compass_core::types::DbId;
use sqlx::PgPool;

use crate::models::change_request::{ChangeRequest, CreateChangeRequest, UpdateChangeRequest};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, impact, status, project_id, requested_by, \
     created_at, updated_at";

/// Provides CRUD and task-link operations for change requests.
pub struct ChangeRequestRepo;

impl ChangeRequestRepo {
    /// Insert a new change request (always PENDING initially).
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        requested_by: DbId,
        input: &CreateChangeRequest,
    ) -> Result<ChangeRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO change_requests
                (title, description, impact, project_id, requested_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChangeRequest>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.impact)
            .bind(project_id)
            .bind(requested_by)
            .fetch_one(pool)
            .await
    }

    /// Find a change request by its internal ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ChangeRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM change_requests WHERE id = $1");
        sqlx::query_as::<_, ChangeRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's change requests, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ChangeRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM change_requests WHERE project_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ChangeRequest>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a change request. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateChangeRequest,
    ) -> Result<Option<ChangeRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE change_requests SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                impact = COALESCE($4, impact),
                status = COALESCE($5, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChangeRequest>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.impact)
            .bind(input.status)
            .fetch_optional(pool)
            .await
    }

    /// Task ids linked to this change request.
    pub async fn linked_tasks(
        pool: &PgPool,
        change_request_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT task_id FROM change_request_tasks
             WHERE change_request_id = $1 ORDER BY task_id",
        )
        .bind(change_request_id)
        .fetch_all(pool)
        .await
    }

    /// Link a task to a change request. Idempotent.
    pub async fn link_task(
        pool: &PgPool,
        change_request_id: DbId,
        task_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO change_request_tasks (change_request_id, task_id)
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(change_request_id)
        .bind(task_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a task link. Returns `true` if it existed.
    pub async fn unlink_task(
        pool: &PgPool,
        change_request_id: DbId,
        task_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM change_request_tasks
             WHERE change_request_id = $1 AND task_id = $2",
        )
        .bind(change_request_id)
        .bind(task_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
