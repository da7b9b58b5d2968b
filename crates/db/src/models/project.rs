//! Project entity model and DTOs.

use compass_core::domain::{Priority, ProjectStatus};
use compass_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A project row from the `projects` table. The root aggregate: tasks,
/// risks, change requests, and activity logs all hang off a project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub status: ProjectStatus,
    pub priority: Priority,
    /// Business impact on a 1..=10 scale (matrix x-axis).
    pub business_impact: i32,
    /// Technical effort on a 1..=10 scale (matrix y-axis).
    pub tech_effort: i32,
    pub revenue_uplift: Option<f64>,
    pub headcount_saving: Option<f64>,
    pub project_value: Option<f64>,
    pub team: Option<String>,
    pub country: Option<String>,
    /// Person in charge.
    pub pic: Option<String>,
    pub start_date: Option<Timestamp>,
    /// Doubles as the project's ETA for deadline tracking.
    pub end_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: String,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    #[validate(range(min = 1, max = 10, message = "businessImpact must be between 1 and 10"))]
    pub business_impact: Option<i32>,
    #[validate(range(min = 1, max = 10, message = "techEffort must be between 1 and 10"))]
    pub tech_effort: Option<i32>,
    #[validate(range(min = 0.0))]
    pub revenue_uplift: Option<f64>,
    #[validate(range(min = 0.0))]
    pub headcount_saving: Option<f64>,
    #[validate(range(min = 0.0))]
    pub project_value: Option<f64>,
    pub team: Option<String>,
    pub country: Option<String>,
    pub pic: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

/// DTO for updating an existing project. All fields are optional;
/// unknown keys are rejected rather than silently dropped.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateProject {
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: Option<String>,
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    #[validate(range(min = 1, max = 10, message = "businessImpact must be between 1 and 10"))]
    pub business_impact: Option<i32>,
    #[validate(range(min = 1, max = 10, message = "techEffort must be between 1 and 10"))]
    pub tech_effort: Option<i32>,
    #[validate(range(min = 0.0))]
    pub revenue_uplift: Option<f64>,
    #[validate(range(min = 0.0))]
    pub headcount_saving: Option<f64>,
    #[validate(range(min = 0.0))]
    pub project_value: Option<f64>,
    pub team: Option<String>,
    pub country: Option<String>,
    pub pic: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
}

/// Optional filters for the project list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectListFilter {
    pub status: Option<ProjectStatus>,
    pub priority: Option<Priority>,
    pub pic: Option<String>,
    /// Case-insensitive substring match on the project name.
    pub search: Option<String>,
}
