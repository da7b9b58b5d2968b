//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields, unknown keys
//!   rejected) for patches

pub mod activity_log;
pub mod change_request;
pub mod project;
pub mod risk;
pub mod task;
pub mod user;
