//! Pure domain logic for the Compass project-management backend.
//!
//! Everything in this crate is side-effect free: classification
//! utilities, the project health / prioritization matrix engine, the
//! Kanban reordering engine, and the task/project filter engine.
//! Persistence and HTTP concerns live in `compass-db` and `compass-api`.

pub mod classify;
pub mod domain;
pub mod error;
pub mod filter;
pub mod health;
pub mod kanban;
pub mod types;
