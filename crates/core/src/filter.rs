//! Composable task and project filtering.
//!
//! A [`TaskFilter`] is a set of independently optional predicates that
//! combine with AND. An empty filter is the identity: it returns the
//! input sequence unchanged, same elements, same order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{Priority, ProjectStatus, TaskRecord, TaskStatus};
use crate::types::{DbId, Timestamp};

/// Filter specification for task collections.
///
/// Empty sets are inactive predicates; `overdue = false` is inactive.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaskFilter {
    pub statuses: HashSet<TaskStatus>,
    pub priorities: HashSet<Priority>,
    pub assignees: HashSet<DbId>,
    pub milestones: HashSet<String>,
    pub overdue: bool,
}

impl TaskFilter {
    /// Whether no predicate is active.
    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
            && self.priorities.is_empty()
            && self.assignees.is_empty()
            && self.milestones.is_empty()
            && !self.overdue
    }

    /// Whether a single task passes every active predicate.
    ///
    /// A task with no assignee fails an active assignee filter, and a
    /// task with no milestone fails an active milestone filter. The
    /// overdue predicate keeps only tasks whose ETA is strictly before
    /// `now` and whose status is not DONE.
    pub fn matches<T: TaskRecord>(&self, task: &T, now: Timestamp) -> bool {
        if !self.statuses.is_empty() && !self.statuses.contains(&task.status()) {
            return false;
        }
        if !self.priorities.is_empty() && !self.priorities.contains(&task.priority()) {
            return false;
        }
        if !self.assignees.is_empty() {
            match task.assignee_id() {
                Some(id) if self.assignees.contains(&id) => {}
                _ => return false,
            }
        }
        if !self.milestones.is_empty() {
            match task.milestone() {
                Some(m) if self.milestones.contains(m) => {}
                _ => return false,
            }
        }
        if self.overdue && !crate::health::is_overdue(task.due_date(), task.status(), now) {
            return false;
        }
        true
    }

    /// Narrow a task sequence, preserving order.
    pub fn apply<'a, T: TaskRecord>(&self, tasks: &'a [T], now: Timestamp) -> Vec<&'a T> {
        tasks.iter().filter(|t| self.matches(*t, now)).collect()
    }
}

/// Project-side stats filter: all projects, finished ones, or the
/// ongoing set {IN_PROGRESS, UAT, PLANNING}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatsFilter {
    #[default]
    All,
    Done,
    Ongoing,
}

impl ProjectStatsFilter {
    pub fn matches(self, status: ProjectStatus) -> bool {
        match self {
            Self::All => true,
            Self::Done => status == ProjectStatus::Done,
            Self::Ongoing => matches!(
                status,
                ProjectStatus::InProgress | ProjectStatus::Uat | ProjectStatus::Planning
            ),
        }
    }
}
