//! Domain enums shared across the workspace.
//!
//! Every enum maps to a PostgreSQL enum type (see the db crate
//! migrations) and serializes as a SCREAMING_SNAKE_CASE string on the
//! wire, matching the frontend contract.

use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "project_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectStatus {
    Planning,
    InProgress,
    Uat,
    Done,
    Cancelled,
}

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "task_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Uat,
    Done,
    Blocked,
}

/// Priority shared by projects and tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "priority", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

/// Risk severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "risk_severity", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskSeverity {
    /// Severities that count toward a project's open-high-risk total.
    pub fn is_high(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

/// Risk likelihood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "risk_likelihood", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLikelihood {
    Low,
    Medium,
    High,
}

/// Risk lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "risk_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskStatus {
    Identified,
    Assessed,
    Mitigated,
    Closed,
}

/// Change request approval status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "change_request_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeRequestStatus {
    Pending,
    Approved,
    Rejected,
}

/// User role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Manager,
    Member,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::Member => "MEMBER",
        }
    }
}

/// Read-only view of a task, as the health and filter engines see it.
///
/// Implemented by the db crate's `Task` model so the engines stay free
/// of persistence types.
pub trait TaskRecord {
    fn status(&self) -> TaskStatus;
    fn priority(&self) -> Priority;
    fn assignee_id(&self) -> Option<DbId>;
    fn milestone(&self) -> Option<&str>;
    /// The task's ETA. Used for overdue checks.
    fn due_date(&self) -> Option<Timestamp>;
}

/// Read-only view of a risk, as the health engine sees it.
pub trait RiskRecord {
    fn severity(&self) -> RiskSeverity;
}
