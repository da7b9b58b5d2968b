//! Project health and prioritization-matrix derivation.
//!
//! Health is a traffic-light summary of schedule and risk exposure,
//! derived from a project's tasks and risks. The matrix buckets
//! projects into four impact/effort quadrants. Both are pure functions
//! of their inputs; `now` is always an explicit parameter.

use serde::{Deserialize, Serialize};

use crate::domain::{RiskRecord, TaskRecord, TaskStatus};
use crate::types::Timestamp;

/// Overdue-task percentage above which a project is RED.
pub const RED_OVERDUE_PCT: f64 = 30.0;
/// Overdue-task percentage above which a project is at least YELLOW.
pub const YELLOW_OVERDUE_PCT: f64 = 15.0;
/// Open high/critical risk count above which a project is RED.
pub const RED_HIGH_RISKS: usize = 2;

/// Traffic-light health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Green,
    Yellow,
    Red,
}

/// Derived health summary for a single project.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectHealth {
    pub status: HealthStatus,
    pub overdue_tasks_percentage: f64,
    pub open_high_risks_count: usize,
    pub total_tasks: usize,
    pub completed_tasks: usize,
}

/// Derive a project's health from its tasks and risks.
///
/// Returns `None` when both inputs are empty: with no tasks and no
/// risks there is no signal to summarize.
///
/// A task is overdue when its ETA is strictly before `now` and its
/// status is not DONE. High/critical risks count regardless of risk
/// status; the documented RED/YELLOW thresholds are defined over that
/// total.
pub fn compute_project_health<T: TaskRecord, R: RiskRecord>(
    tasks: &[T],
    risks: &[R],
    now: Timestamp,
) -> Option<ProjectHealth> {
    if tasks.is_empty() && risks.is_empty() {
        return None;
    }

    let total_tasks = tasks.len();
    let completed_tasks = tasks
        .iter()
        .filter(|t| t.status() == TaskStatus::Done)
        .count();
    let overdue = tasks
        .iter()
        .filter(|t| is_overdue(t.due_date(), t.status(), now))
        .count();

    let overdue_tasks_percentage = if total_tasks == 0 {
        0.0
    } else {
        overdue as f64 / total_tasks as f64 * 100.0
    };

    let open_high_risks_count = risks.iter().filter(|r| r.severity().is_high()).count();

    let status = if open_high_risks_count > RED_HIGH_RISKS
        || overdue_tasks_percentage > RED_OVERDUE_PCT
    {
        HealthStatus::Red
    } else if open_high_risks_count > 0 || overdue_tasks_percentage > YELLOW_OVERDUE_PCT {
        HealthStatus::Yellow
    } else {
        HealthStatus::Green
    };

    Some(ProjectHealth {
        status,
        overdue_tasks_percentage,
        open_high_risks_count,
        total_tasks,
        completed_tasks,
    })
}

/// Whether a task with the given ETA and status counts as overdue.
pub fn is_overdue(due_date: Option<Timestamp>, status: TaskStatus, now: Timestamp) -> bool {
    match due_date {
        Some(due) => due < now && status != TaskStatus::Done,
        None => false,
    }
}

/// Impact/effort prioritization quadrant.
///
/// The four quadrants partition the 1..=10 x 1..=10 grid totally and
/// without overlap; the boundaries (impact 6, effort 5) are part of the
/// contract and pinned by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    QuickWins,
    MajorProjects,
    FillIns,
    ThanklessTasks,
}

impl Quadrant {
    /// Classify a project by business impact and technical effort.
    ///
    /// Inputs are clamped to 1..=10 first; the source never validated
    /// them, so out-of-range values are treated as the nearest edge.
    pub fn classify(business_impact: i32, tech_effort: i32) -> Self {
        let impact = business_impact.clamp(1, 10);
        let effort = tech_effort.clamp(1, 10);
        match (impact >= 6, effort <= 5) {
            (true, true) => Self::QuickWins,
            (true, false) => Self::MajorProjects,
            (false, true) => Self::FillIns,
            (false, false) => Self::ThanklessTasks,
        }
    }

    /// Human-readable label for display in the UI.
    pub fn label(self) -> &'static str {
        match self {
            Self::QuickWins => "Quick Wins",
            Self::MajorProjects => "Major Projects",
            Self::FillIns => "Fill-ins",
            Self::ThanklessTasks => "Thankless Tasks",
        }
    }
}

/// Select items whose end date falls within the next `window_days`,
/// sorted ascending by end date (stable, so ties keep input order).
///
/// Items with no end date or an end date in the past are excluded;
/// past-due is a different concern from "upcoming".
pub fn upcoming_deadlines<'a, T>(
    items: &'a [T],
    end_date: impl Fn(&T) -> Option<Timestamp>,
    window_days: i64,
    now: Timestamp,
) -> Vec<&'a T> {
    let horizon = now + chrono::Duration::days(window_days);
    let mut upcoming: Vec<(&T, Timestamp)> = items
        .iter()
        .filter_map(|item| {
            let end = end_date(item)?;
            (end >= now && end <= horizon).then_some((item, end))
        })
        .collect();
    upcoming.sort_by_key(|(_, end)| *end);
    upcoming.into_iter().map(|(item, _)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, RiskSeverity};
    use crate::types::DbId;
    use chrono::{Duration, TimeZone, Utc};

    struct TestTask {
        status: TaskStatus,
        due: Option<Timestamp>,
    }

    impl TaskRecord for TestTask {
        fn status(&self) -> TaskStatus {
            self.status
        }
        fn priority(&self) -> Priority {
            Priority::Medium
        }
        fn assignee_id(&self) -> Option<DbId> {
            None
        }
        fn milestone(&self) -> Option<&str> {
            None
        }
        fn due_date(&self) -> Option<Timestamp> {
            self.due
        }
    }

    struct TestRisk {
        severity: RiskSeverity,
    }

    impl RiskRecord for TestRisk {
        fn severity(&self) -> RiskSeverity {
            self.severity
        }
    }

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).unwrap()
    }

    fn overdue_task() -> TestTask {
        TestTask {
            status: TaskStatus::InProgress,
            due: Some(now() - Duration::days(1)),
        }
    }

    fn on_time_task() -> TestTask {
        TestTask {
            status: TaskStatus::InProgress,
            due: Some(now() + Duration::days(7)),
        }
    }

    fn risks(high: usize) -> Vec<TestRisk> {
        (0..high)
            .map(|_| TestRisk {
                severity: RiskSeverity::High,
            })
            .collect()
    }

    // -- compute_project_health --

    #[test]
    fn no_signal_when_empty() {
        let health = compute_project_health(&[] as &[TestTask], &[] as &[TestRisk], now());
        assert!(health.is_none());
    }

    #[test]
    fn green_when_no_overdue_and_no_high_risks() {
        let tasks = vec![on_time_task(), on_time_task()];
        let health = compute_project_health(&tasks, &[] as &[TestRisk], now()).unwrap();
        assert_eq!(health.status, HealthStatus::Green);
        assert_eq!(health.overdue_tasks_percentage, 0.0);
    }

    #[test]
    fn done_tasks_are_never_overdue() {
        let tasks = vec![TestTask {
            status: TaskStatus::Done,
            due: Some(now() - Duration::days(30)),
        }];
        let health = compute_project_health(&tasks, &[] as &[TestRisk], now()).unwrap();
        assert_eq!(health.status, HealthStatus::Green);
        assert_eq!(health.completed_tasks, 1);
    }

    #[test]
    fn red_boundary_is_strictly_above_thirty_percent() {
        // 3/10 overdue = exactly 30% -> not RED via the overdue clause.
        let mut tasks: Vec<TestTask> = (0..3).map(|_| overdue_task()).collect();
        tasks.extend((0..7).map(|_| on_time_task()));
        let health = compute_project_health(&tasks, &[] as &[TestRisk], now()).unwrap();
        assert_eq!(health.status, HealthStatus::Yellow); // 30% > 15% -> YELLOW

        // 4/10 overdue = 40% -> RED.
        let mut tasks: Vec<TestTask> = (0..4).map(|_| overdue_task()).collect();
        tasks.extend((0..6).map(|_| on_time_task()));
        let health = compute_project_health(&tasks, &[] as &[TestRisk], now()).unwrap();
        assert_eq!(health.status, HealthStatus::Red);
    }

    #[test]
    fn red_boundary_is_strictly_above_two_high_risks() {
        let tasks = vec![on_time_task()];
        let health = compute_project_health(&tasks, &risks(2), now()).unwrap();
        assert_eq!(health.status, HealthStatus::Yellow);

        let health = compute_project_health(&tasks, &risks(3), now()).unwrap();
        assert_eq!(health.status, HealthStatus::Red);
    }

    #[test]
    fn yellow_when_any_high_risk_present() {
        // 1/10 overdue (10%) + one HIGH risk: risk clause fires, overdue does not.
        let mut tasks = vec![overdue_task()];
        tasks.extend((0..9).map(|_| on_time_task()));
        let health = compute_project_health(&tasks, &risks(1), now()).unwrap();
        assert_eq!(health.status, HealthStatus::Yellow);
        assert_eq!(health.overdue_tasks_percentage, 10.0);
        assert_eq!(health.open_high_risks_count, 1);
    }

    #[test]
    fn critical_severity_counts_as_high() {
        let risks = vec![
            TestRisk {
                severity: RiskSeverity::Critical,
            },
            TestRisk {
                severity: RiskSeverity::Low,
            },
        ];
        let tasks = vec![on_time_task()];
        let health = compute_project_health(&tasks, &risks, now()).unwrap();
        assert_eq!(health.open_high_risks_count, 1);
    }

    #[test]
    fn status_is_monotone_in_risk_count() {
        let tasks = vec![on_time_task()];
        let mut last = HealthStatus::Green;
        for high in 0..6 {
            let health = compute_project_health(&tasks, &risks(high), now()).unwrap();
            assert!(
                rank(health.status) >= rank(last),
                "status regressed at {high} high risks"
            );
            last = health.status;
        }
    }

    #[test]
    fn status_is_monotone_in_overdue_ratio() {
        let mut last = HealthStatus::Green;
        for overdue in 0..=10usize {
            let mut tasks: Vec<TestTask> = (0..overdue).map(|_| overdue_task()).collect();
            tasks.extend((0..10 - overdue).map(|_| on_time_task()));
            let health = compute_project_health(&tasks, &[] as &[TestRisk], now()).unwrap();
            assert!(
                rank(health.status) >= rank(last),
                "status regressed at {overdue} overdue tasks"
            );
            last = health.status;
        }
    }

    #[test]
    fn end_to_end_scenario_forty_percent_overdue_is_red() {
        let mut tasks: Vec<TestTask> = (0..4).map(|_| overdue_task()).collect();
        tasks.extend((0..6).map(|_| on_time_task()));
        let health = compute_project_health(&tasks, &[] as &[TestRisk], now()).unwrap();
        assert_eq!(health.overdue_tasks_percentage, 40.0);
        assert_eq!(health.status, HealthStatus::Red);
    }

    fn rank(status: HealthStatus) -> u8 {
        match status {
            HealthStatus::Green => 0,
            HealthStatus::Yellow => 1,
            HealthStatus::Red => 2,
        }
    }

    // -- Quadrant::classify --

    #[test]
    fn quadrant_boundary_values() {
        assert_eq!(Quadrant::classify(6, 5), Quadrant::QuickWins);
        assert_eq!(Quadrant::classify(6, 6), Quadrant::MajorProjects);
        assert_eq!(Quadrant::classify(5, 5), Quadrant::FillIns);
        assert_eq!(Quadrant::classify(5, 6), Quadrant::ThanklessTasks);
    }

    #[test]
    fn quadrant_partition_is_total_over_grid() {
        for impact in 1..=10 {
            for effort in 1..=10 {
                let q = Quadrant::classify(impact, effort);
                let expected = match (impact >= 6, effort <= 5) {
                    (true, true) => Quadrant::QuickWins,
                    (true, false) => Quadrant::MajorProjects,
                    (false, true) => Quadrant::FillIns,
                    (false, false) => Quadrant::ThanklessTasks,
                };
                assert_eq!(q, expected, "impact={impact} effort={effort}");
            }
        }
    }

    #[test]
    fn quadrant_clamps_out_of_range_input() {
        assert_eq!(Quadrant::classify(99, 0), Quadrant::QuickWins);
        assert_eq!(Quadrant::classify(0, 99), Quadrant::ThanklessTasks);
    }

    // -- upcoming_deadlines --

    struct TestProject {
        name: &'static str,
        end: Option<Timestamp>,
    }

    #[test]
    fn deadlines_window_and_ordering() {
        let projects = vec![
            TestProject {
                name: "too-far",
                end: Some(now() + Duration::days(40)),
            },
            TestProject {
                name: "past-due",
                end: Some(now() - Duration::days(1)),
            },
            TestProject {
                name: "soon",
                end: Some(now() + Duration::days(10)),
            },
            TestProject {
                name: "sooner",
                end: Some(now() + Duration::days(3)),
            },
            TestProject {
                name: "no-eta",
                end: None,
            },
        ];

        let result = upcoming_deadlines(&projects, |p| p.end, 30, now());
        let names: Vec<&str> = result.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["sooner", "soon"]);
    }

    #[test]
    fn deadlines_ties_keep_insertion_order() {
        let end = Some(now() + Duration::days(5));
        let projects = vec![
            TestProject { name: "a", end },
            TestProject { name: "b", end },
            TestProject { name: "c", end },
        ];
        let result = upcoming_deadlines(&projects, |p| p.end, 30, now());
        let names: Vec<&str> = result.iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }
}
