//! Risk entity model and DTOs.

use compass_core::domain::{RiskLikelihood, RiskRecord, RiskSeverity, RiskStatus};
use compass_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A risk row from the `risks` table.
///
/// `risk_score` is always `probability * impact`; the repository keeps
/// it consistent on every insert and update.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Risk {
    pub id: DbId,
    pub title: String,
    pub category: Option<String>,
    pub severity: RiskSeverity,
    pub likelihood: RiskLikelihood,
    /// Probability on a 1..=5 scale.
    pub probability: i32,
    /// Impact on a 1..=5 scale.
    pub impact: i32,
    pub risk_score: i32,
    pub status: RiskStatus,
    pub project_id: DbId,
    pub owner_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl RiskRecord for Risk {
    fn severity(&self) -> RiskSeverity {
        self.severity
    }
}

/// DTO for creating a new risk.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRisk {
    #[validate(length(min = 1, message = "Risk title is required"))]
    pub title: String,
    pub category: Option<String>,
    pub severity: RiskSeverity,
    pub likelihood: RiskLikelihood,
    #[validate(range(min = 1, max = 5, message = "probability must be between 1 and 5"))]
    pub probability: i32,
    #[validate(range(min = 1, max = 5, message = "impact must be between 1 and 5"))]
    pub impact: i32,
    pub status: Option<RiskStatus>,
    pub owner_id: Option<DbId>,
}

/// DTO for partially updating a risk.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateRisk {
    #[validate(length(min = 1, message = "Risk title is required"))]
    pub title: Option<String>,
    pub category: Option<String>,
    pub severity: Option<RiskSeverity>,
    pub likelihood: Option<RiskLikelihood>,
    #[validate(range(min = 1, max = 5, message = "probability must be between 1 and 5"))]
    pub probability: Option<i32>,
    #[validate(range(min = 1, max = 5, message = "impact must be between 1 and 5"))]
    pub impact: Option<i32>,
    pub status: Option<RiskStatus>,
    pub owner_id: Option<DbId>,
}
