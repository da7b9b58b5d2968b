//! HTTP API server for Compass.
//!
//! Exposed as a library so integration tests can build the exact same
//! router and middleware stack as the production binary.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
