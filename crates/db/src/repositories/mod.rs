//! Stateless repository structs, one per table.
//!
//! Repositories take a `&PgPool` (or a transaction) per call and return
//! `Result<_, sqlx::Error>`; mapping to domain/HTTP errors happens at
//! the API boundary.

mod activity_log_repo;
mod change_request_repo;
mod project_repo;
mod risk_repo;
mod task_repo;
mod user_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use change_request_repo::ChangeRequestRepo;
pub use project_repo::ProjectRepo;
pub use risk_repo::RiskRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
