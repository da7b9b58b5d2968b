//! Repository for the `projects` table.

use compass_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, ProjectListFilter, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, status, priority, business_impact, tech_effort, \
     revenue_uplift, headcount_saving, project_value, team, country, pic, \
     start_date, end_date, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// Omitted status/priority/impact/effort fall back to the schema
    /// defaults (PLANNING, MEDIUM, 5, 5).
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects
                (name, status, priority, business_impact, tech_effort,
                 revenue_uplift, headcount_saving, project_value,
                 team, country, pic, start_date, end_date)
             VALUES ($1, COALESCE($2, 'PLANNING'::project_status),
                     COALESCE($3, 'MEDIUM'::priority),
                     COALESCE($4, 5), COALESCE($5, 5),
                     $6, $7, $8, $9, $10, $11, $12, $13)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(input.status)
            .bind(input.priority)
            .bind(input.business_impact)
            .bind(input.tech_effort)
            .bind(input.revenue_uplift)
            .bind(input.headcount_saving)
            .bind(input.project_value)
            .bind(&input.team)
            .bind(&input.country)
            .bind(&input.pic)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects, most recently created first, with optional
    /// status / priority / pic / name-search filters.
    pub async fn list(
        pool: &PgPool,
        filter: &ProjectListFilter,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE ($1::project_status IS NULL OR status = $1)
               AND ($2::priority IS NULL OR priority = $2)
               AND ($3::text IS NULL OR pic = $3)
               AND ($4::text IS NULL OR name ILIKE '%' || $4 || '%')
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(filter.status)
            .bind(filter.priority)
            .bind(&filter.pic)
            .bind(&filter.search)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                status = COALESCE($3, status),
                priority = COALESCE($4, priority),
                business_impact = COALESCE($5, business_impact),
                tech_effort = COALESCE($6, tech_effort),
                revenue_uplift = COALESCE($7, revenue_uplift),
                headcount_saving = COALESCE($8, headcount_saving),
                project_value = COALESCE($9, project_value),
                team = COALESCE($10, team),
                country = COALESCE($11, country),
                pic = COALESCE($12, pic),
                start_date = COALESCE($13, start_date),
                end_date = COALESCE($14, end_date)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.status)
            .bind(input.priority)
            .bind(input.business_impact)
            .bind(input.tech_effort)
            .bind(input.revenue_uplift)
            .bind(input.headcount_saving)
            .bind(input.project_value)
            .bind(&input.team)
            .bind(&input.country)
            .bind(&input.pic)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project and every child record in one transaction.
    ///
    /// Invariant: no orphaned tasks, dependencies, task links, risks,
    /// change requests, or activity logs remain afterwards. Returns
    /// `true` if the project existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM activity_logs WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "DELETE FROM task_dependencies
             WHERE task_id IN (SELECT id FROM tasks WHERE project_id = $1)
                OR depends_on_id IN (SELECT id FROM tasks WHERE project_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "DELETE FROM change_request_tasks
             WHERE change_request_id IN
                 (SELECT id FROM change_requests WHERE project_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM change_requests WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM risks WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM tasks WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
