//! Handlers for the cross-project dashboard views: prioritization
//! matrix, upcoming deadlines, and portfolio statistics.

use axum::extract::{Query, State};
use axum::Json;
use compass_core::domain::{Priority, ProjectStatus};
use compass_core::filter::ProjectStatsFilter;
use compass_core::health::{upcoming_deadlines, Quadrant};
use compass_core::types::{DbId, Timestamp};
use compass_db::models::project::ProjectListFilter;
use compass_db::repositories::ProjectRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Default lookahead for the deadlines view.
const DEFAULT_DEADLINE_WINDOW_DAYS: i64 = 30;

// ---------------------------------------------------------------------------
// Query / response types
// ---------------------------------------------------------------------------

/// One project placed on the impact/effort prioritization matrix.
#[derive(Debug, Serialize)]
pub struct MatrixEntry {
    pub project_id: DbId,
    pub name: String,
    pub business_impact: i32,
    pub tech_effort: i32,
    pub quadrant: Quadrant,
    pub label: &'static str,
}

/// Query parameters for `GET /dashboard/deadlines`.
#[derive(Debug, Deserialize)]
pub struct DeadlinesQuery {
    /// Lookahead window in days; defaults to 30.
    #[serde(alias = "window_days")]
    pub days: Option<i64>,
}

/// One project with an end date inside the lookahead window.
#[derive(Debug, Serialize)]
pub struct DeadlineEntry {
    pub project_id: DbId,
    pub name: String,
    pub status: ProjectStatus,
    pub priority: Priority,
    pub end_date: Timestamp,
    /// Whole days until the end date, floored.
    pub days_left: i64,
}

/// Query parameters for `GET /dashboard/stats`.
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    #[serde(default, alias = "filter")]
    pub scope: ProjectStatsFilter,
}

/// Portfolio roll-up over the selected project scope.
#[derive(Debug, Serialize)]
pub struct PortfolioStats {
    pub scope: ProjectStatsFilter,
    pub project_count: usize,
    pub total_project_value: f64,
    pub total_revenue_uplift: f64,
    pub total_headcount_saving: f64,
    /// Project count per status within the scope.
    pub by_status: Vec<StatusCount>,
}

#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: ProjectStatus,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/dashboard/matrix
///
/// Every project placed on the impact/effort grid. The four quadrants
/// partition the grid totally, so each project lands in exactly one.
pub async fn matrix(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<MatrixEntry>>>> {
    let projects = ProjectRepo::list(&state.pool, &ProjectListFilter::default()).await?;
    let entries: Vec<MatrixEntry> = projects
        .into_iter()
        .map(|p| {
            let quadrant = Quadrant::classify(p.business_impact, p.tech_effort);
            MatrixEntry {
                project_id: p.id,
                name: p.name,
                business_impact: p.business_impact,
                tech_effort: p.tech_effort,
                quadrant,
                label: quadrant.label(),
            }
        })
        .collect();
    let count = entries.len();
    Ok(Json(ApiResponse::with_count(entries, count)))
}

/// GET /api/v1/dashboard/deadlines
///
/// Projects ending within the lookahead window, soonest first.
/// Projects with no end date or one already in the past are excluded.
pub async fn deadlines(
    State(state): State<AppState>,
    Query(query): Query<DeadlinesQuery>,
) -> AppResult<Json<ApiResponse<Vec<DeadlineEntry>>>> {
    let window = query
        .days
        .unwrap_or(DEFAULT_DEADLINE_WINDOW_DAYS)
        .max(1);
    let now = chrono::Utc::now();

    let projects = ProjectRepo::list(&state.pool, &ProjectListFilter::default()).await?;
    let entries: Vec<DeadlineEntry> = upcoming_deadlines(&projects, |p| p.end_date, window, now)
        .into_iter()
        .filter_map(|p| {
            let end_date = p.end_date?;
            Some(DeadlineEntry {
                project_id: p.id,
                name: p.name.clone(),
                status: p.status,
                priority: p.priority,
                end_date,
                days_left: (end_date - now).num_days(),
            })
        })
        .collect();
    let count = entries.len();
    Ok(Json(ApiResponse::with_count(entries, count)))
}

/// GET /api/v1/dashboard/stats
///
/// Financial and status roll-up over all projects, done projects, or
/// ongoing ones (`?scope=all|done|ongoing`). Missing financial fields
/// contribute zero.
pub async fn stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<ApiResponse<PortfolioStats>>> {
    let projects = ProjectRepo::list(&state.pool, &ProjectListFilter::default()).await?;
    let scoped: Vec<_> = projects
        .into_iter()
        .filter(|p| query.scope.matches(p.status))
        .collect();

    let mut by_status: Vec<StatusCount> = Vec::new();
    for project in &scoped {
        match by_status.iter_mut().find(|s| s.status == project.status) {
            Some(entry) => entry.count += 1,
            None => by_status.push(StatusCount {
                status: project.status,
                count: 1,
            }),
        }
    }

    let stats = PortfolioStats {
        scope: query.scope,
        project_count: scoped.len(),
        total_project_value: scoped.iter().filter_map(|p| p.project_value).sum(),
        total_revenue_uplift: scoped.iter().filter_map(|p| p.revenue_uplift).sum(),
        total_headcount_saving: scoped.iter().filter_map(|p| p.headcount_saving).sum(),
        by_status,
    };
    Ok(Json(ApiResponse::new(stats)))
}
