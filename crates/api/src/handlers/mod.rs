//! Request handlers, one module per resource.

use compass_db::models::activity_log::NewActivityLog;
use compass_db::repositories::ActivityLogRepo;
use compass_db::DbPool;

pub mod auth;
pub mod change_request;
pub mod dashboard;
pub mod project;
pub mod risk;
pub mod task;
pub mod user;

/// Append an audit trail entry, logging (but not failing the request)
/// if the insert itself errors.
pub(crate) async fn record_activity(pool: &DbPool, entry: NewActivityLog) {
    if let Err(e) = ActivityLogRepo::insert(pool, &entry).await {
        tracing::warn!(error = %e, action = %entry.action, "Failed to record activity");
    }
}
