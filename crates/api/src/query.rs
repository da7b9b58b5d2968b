//! Shared query parameter types and parsing helpers.
//!
//! Set-valued filters arrive as comma-separated query strings
//! (`?status=TODO,BLOCKED`); the helpers here turn them into typed sets
//! with a 400 on any unknown value.

use std::collections::HashSet;
use std::hash::Hash;

use compass_core::types::DbId;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::AppError;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Values are clamped in the repository layer.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Parse one enum value from its wire form (e.g. `IN_PROGRESS`).
pub fn parse_enum<T: DeserializeOwned>(raw: &str, what: &str) -> Result<T, AppError> {
    serde_json::from_value(serde_json::Value::String(raw.trim().to_string()))
        .map_err(|_| AppError::BadRequest(format!("Invalid {what}: {}", raw.trim())))
}

/// Parse an optional comma-separated list of enum values into a set.
/// `None` or an empty string yields an empty (inactive) set.
pub fn parse_enum_set<T>(raw: Option<&str>, what: &str) -> Result<HashSet<T>, AppError>
where
    T: DeserializeOwned + Eq + Hash,
{
    match raw {
        None => Ok(HashSet::new()),
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| parse_enum(part, what))
            .collect(),
    }
}

/// Parse an optional comma-separated list of numeric ids into a set.
pub fn parse_id_set(raw: Option<&str>, what: &str) -> Result<HashSet<DbId>, AppError> {
    match raw {
        None => Ok(HashSet::new()),
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<DbId>()
                    .map_err(|_| AppError::BadRequest(format!("Invalid {what}: {part}")))
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_core::domain::TaskStatus;

    #[test]
    fn parses_comma_separated_statuses() {
        let set: HashSet<TaskStatus> =
            parse_enum_set(Some("TODO, IN_PROGRESS"), "status").unwrap();
        assert_eq!(
            set,
            HashSet::from([TaskStatus::Todo, TaskStatus::InProgress])
        );
    }

    #[test]
    fn rejects_unknown_status() {
        let result: Result<HashSet<TaskStatus>, _> = parse_enum_set(Some("NOPE"), "status");
        assert!(result.is_err());
    }

    #[test]
    fn absent_list_is_inactive() {
        let set: HashSet<TaskStatus> = parse_enum_set(None, "status").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn parses_id_sets() {
        let set = parse_id_set(Some("1,2, 3"), "assigneeId").unwrap();
        assert_eq!(set, HashSet::from([1, 2, 3]));
        assert!(parse_id_set(Some("x"), "assigneeId").is_err());
    }
}
