//! Classification and formatting utilities.
//!
//! Risk scoring uses a single canonical formula everywhere:
//! `probability x impact`, both on a 1..=5 scale, giving scores in
//! 1..=25. The derived [`RiskLevel`] buckets that score.

use serde::{Deserialize, Serialize};

use crate::domain::{Priority, ProjectStatus, TaskStatus};
use crate::types::Timestamp;

/// Canonical risk score: probability x impact.
pub fn risk_score(probability: i32, impact: i32) -> i32 {
    probability * impact
}

/// Qualitative risk level derived from a numeric risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    /// Bucket a score: Low <= 5, Medium <= 10, High <= 15, else Critical.
    pub fn from_score(score: i32) -> Self {
        if score <= 5 {
            Self::Low
        } else if score <= 10 {
            Self::Medium
        } else if score <= 15 {
            Self::High
        } else {
            Self::Critical
        }
    }

    /// Human-readable label for display in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

/// Display color token for a project status badge.
pub fn status_color(status: ProjectStatus) -> &'static str {
    match status {
        ProjectStatus::Planning => "gray",
        ProjectStatus::InProgress => "blue",
        ProjectStatus::Uat => "purple",
        ProjectStatus::Done => "green",
        ProjectStatus::Cancelled => "red",
    }
}

/// Display color token for a task status badge.
pub fn task_status_color(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => "gray",
        TaskStatus::InProgress => "blue",
        TaskStatus::Uat => "purple",
        TaskStatus::Done => "green",
        TaskStatus::Blocked => "red",
    }
}

/// Display color token for a priority badge.
pub fn priority_color(priority: Priority) -> &'static str {
    match priority {
        Priority::Low => "gray",
        Priority::Medium => "blue",
        Priority::High => "orange",
        Priority::Urgent => "red",
    }
}

/// Format a money amount as US dollars with thousands separators.
///
/// Whole amounts are rendered without cents (`$12,500`), fractional
/// amounts with two decimals (`$12,500.75`).
pub fn format_currency_usd(amount: f64) -> String {
    let negative = amount < 0.0;
    let amount = amount.abs();
    let whole = amount.trunc() as i64;
    let cents = ((amount - amount.trunc()) * 100.0).round() as i64;

    let mut grouped = String::new();
    let digits = whole.to_string();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    if cents == 0 {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{cents:02}")
    }
}

/// Format a timestamp as a short human-readable date, e.g. `Mar 05, 2026`.
pub fn format_date(ts: Timestamp) -> String {
    ts.format("%b %d, %Y").to_string()
}
