//! Change request entity model and DTOs.

use compass_core::domain::ChangeRequestStatus;
use compass_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A change request row from the `change_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChangeRequest {
    pub id: DbId,
    pub title: String,
    pub description: String,
    /// Free-text impact assessment.
    pub impact: Option<String>,
    pub status: ChangeRequestStatus,
    pub project_id: DbId,
    pub requested_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new change request.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateChangeRequest {
    #[validate(length(min = 1, message = "Change request title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Change request description is required"))]
    pub description: String,
    pub impact: Option<String>,
}

/// DTO for partially updating a change request (typically the status
/// moving through PENDING -> APPROVED/REJECTED).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateChangeRequest {
    #[validate(length(min = 1, message = "Change request title is required"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Change request description is required"))]
    pub description: Option<String>,
    pub impact: Option<String>,
    pub status: Option<ChangeRequestStatus>,
}
