//! Repository for the `risks` table.

use compass_core::types::DbId;
use sqlx::PgPool;

use crate::models::risk::{CreateRisk, Risk, UpdateRisk};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, category, severity, likelihood, probability, impact, \
     risk_score, status, project_id, owner_id, created_at, updated_at";

/// Provides CRUD operations for risks.
///
/// The stored `risk_score` is always `probability * impact`; both
/// insert and update recompute it in SQL so it can never drift from
/// its inputs.
pub struct RiskRepo;

impl RiskRepo {
    /// Insert a new risk for a project, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateRisk,
    ) -> Result<Risk, sqlx::Error> {
        let query = format!(
            "INSERT INTO risks
                (title, category, severity, likelihood, probability, impact,
                 risk_score, status, project_id, owner_id)
             VALUES ($1, $2, $3, $4, $5, $6, $5 * $6,
                     COALESCE($7, 'IDENTIFIED'::risk_status), $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Risk>(&query)
            .bind(&input.title)
            .bind(&input.category)
            .bind(input.severity)
            .bind(input.likelihood)
            .bind(input.probability)
            .bind(input.impact)
            .bind(input.status)
            .bind(project_id)
            .bind(input.owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a risk by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Risk>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM risks WHERE id = $1");
        sqlx::query_as::<_, Risk>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's risks, highest score first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Risk>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM risks WHERE project_id = $1
             ORDER BY risk_score DESC, created_at"
        );
        sqlx::query_as::<_, Risk>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a risk. Only non-`None` fields are applied; the score is
    /// recomputed from the effective probability and impact.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateRisk,
    ) -> Result<Option<Risk>, sqlx::Error> {
        let query = format!(
            "UPDATE risks SET
                title = COALESCE($2, title),
                category = COALESCE($3, category),
                severity = COALESCE($4, severity),
                likelihood = COALESCE($5, likelihood),
                probability = COALESCE($6, probability),
                impact = COALESCE($7, impact),
                risk_score = COALESCE($6, probability) * COALESCE($7, impact),
                status = COALESCE($8, status),
                owner_id = COALESCE($9, owner_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Risk>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.category)
            .bind(input.severity)
            .bind(input.likelihood)
            .bind(input.probability)
            .bind(input.impact)
            .bind(input.status)
            .bind(input.owner_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a risk by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM risks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
