//! Repository for the `tasks` table and the task dependency relation.

use compass_core::kanban::{PositionChange, DEFAULT_TASK_EFFORT, DEFAULT_TASK_IMPACT};
use compass_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, status, priority, impact, effort, project_id, \
     assignee_id, created_by, milestone, column_id, position, \
     start_date, due_date, created_at, updated_at";

/// Provides CRUD, board reordering persistence, and dependency reads
/// for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task at the end of its column.
    ///
    /// The position is computed server-side as max(position) + 1 within
    /// the `(project, column)` pair, or 0 for an empty column, so a
    /// settled column stays contiguous.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTask,
        created_by: DbId,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (title, status, priority, impact, effort, project_id,
                 assignee_id, created_by, milestone, column_id, position,
                 start_date, due_date)
             VALUES ($1, COALESCE($2, 'TODO'::task_status),
                     COALESCE($3, 'MEDIUM'::priority),
                     COALESCE($4, $11), COALESCE($5, $12),
                     $6, $7, $8, $9, COALESCE($10, 'todo'),
                     (SELECT COALESCE(MAX(position) + 1, 0) FROM tasks
                      WHERE project_id = $6 AND column_id = COALESCE($10, 'todo')),
                     $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(input.status)
            .bind(input.priority)
            .bind(input.impact)
            .bind(input.effort)
            .bind(input.project_id)
            .bind(input.assignee_id)
            .bind(created_by)
            .bind(&input.milestone)
            .bind(&input.column_id)
            .bind(DEFAULT_TASK_IMPACT)
            .bind(DEFAULT_TASK_EFFORT)
            .bind(input.start_date)
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks, optionally narrowed to one project, in board order
    /// (column, then position).
    pub async fn list(pool: &PgPool, project_id: Option<DbId>) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE ($1::bigint IS NULL OR project_id = $1)
             ORDER BY project_id, column_id, position"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied;
    /// board placement (column/position) is untouched here.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                status = COALESCE($3, status),
                priority = COALESCE($4, priority),
                impact = COALESCE($5, impact),
                effort = COALESCE($6, effort),
                assignee_id = COALESCE($7, assignee_id),
                milestone = COALESCE($8, milestone),
                start_date = COALESCE($9, start_date),
                due_date = COALESCE($10, due_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.status)
            .bind(input.priority)
            .bind(input.impact)
            .bind(input.effort)
            .bind(input.assignee_id)
            .bind(&input.milestone)
            .bind(input.start_date)
            .bind(input.due_date)
            .fetch_optional(pool)
            .await
    }

    /// Persist a batch of board position changes atomically.
    ///
    /// The batch comes from `Board::move_task`, so applying all of it
    /// restores the contiguous-positions invariant for both affected
    /// columns in a single transaction.
    pub async fn apply_position_changes(
        pool: &PgPool,
        changes: &[PositionChange],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;
        for change in changes {
            sqlx::query("UPDATE tasks SET column_id = $2, position = $3 WHERE id = $1")
                .bind(change.task_id)
                .bind(&change.column_id)
                .bind(change.position)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await
    }

    /// Delete a task and renumber its column so positions stay
    /// contiguous. Returns `true` if the task existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let slot: Option<(DbId, String)> =
            sqlx::query_as("SELECT project_id, column_id FROM tasks WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((project_id, column_id)) = slot else {
            return Ok(false);
        };

        sqlx::query("DELETE FROM task_dependencies WHERE task_id = $1 OR depends_on_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM change_request_tasks WHERE task_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM activity_logs WHERE task_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "WITH ranked AS (
                SELECT id, ROW_NUMBER() OVER (ORDER BY position) - 1 AS new_pos
                FROM tasks WHERE project_id = $1 AND column_id = $2
             )
             UPDATE tasks SET position = ranked.new_pos
             FROM ranked WHERE tasks.id = ranked.id",
        )
        .bind(project_id)
        .bind(&column_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Task ids this task depends on (its blockers).
    pub async fn dependencies(pool: &PgPool, task_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT depends_on_id FROM task_dependencies WHERE task_id = $1 ORDER BY depends_on_id",
        )
        .bind(task_id)
        .fetch_all(pool)
        .await
    }

    /// Task ids that depend on this task (tasks it blocks).
    pub async fn dependents(pool: &PgPool, task_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT task_id FROM task_dependencies WHERE depends_on_id = $1 ORDER BY task_id",
        )
        .bind(task_id)
        .fetch_all(pool)
        .await
    }

    /// Record that `task_id` depends on `depends_on_id`. Idempotent.
    pub async fn add_dependency(
        pool: &PgPool,
        task_id: DbId,
        depends_on_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO task_dependencies (task_id, depends_on_id)
             VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(task_id)
        .bind(depends_on_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Remove a dependency edge. Returns `true` if it existed.
    pub async fn remove_dependency(
        pool: &PgPool,
        task_id: DbId,
        depends_on_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM task_dependencies WHERE task_id = $1 AND depends_on_id = $2",
        )
        .bind(task_id)
        .bind(depends_on_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
