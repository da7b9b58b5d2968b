//! Kanban board reordering engine.
//!
//! A [`Board`] is an in-memory snapshot of one project's tasks grouped
//! into ordered columns. [`Board::move_task`] is the single mutating
//! operation: it relocates a task and renumbers both affected columns
//! to contiguous 0-based positions, returning only the assignments that
//! actually changed so the caller can persist them in one batch.
//!
//! Drag-over previews are a client-side concern; only the drag-end
//! commit reaches this engine through the move endpoint.

use std::collections::HashMap;

use crate::error::CoreError;
use crate::types::DbId;

/// Column ids for a freshly created project board.
pub const DEFAULT_COLUMNS: [&str; 4] = ["todo", "in-progress", "uat", "done"];

/// Default impact for a newly created task (1..=5 scale).
pub const DEFAULT_TASK_IMPACT: i32 = 3;
/// Default effort for a newly created task (1..=5 scale).
pub const DEFAULT_TASK_EFFORT: i32 = 3;

/// Minimal task view the board is built from.
#[derive(Debug, Clone)]
pub struct BoardTask {
    pub id: DbId,
    pub column_id: String,
    pub position: i32,
}

/// A `(task, column, position)` assignment that changed during a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionChange {
    pub task_id: DbId,
    pub column_id: String,
    pub position: i32,
}

#[derive(Debug, Clone)]
struct Column {
    id: String,
    tasks: Vec<DbId>,
}

/// Ordered column -> task-list structure for one project.
#[derive(Debug, Clone)]
pub struct Board {
    columns: Vec<Column>,
}

impl Board {
    /// Build an empty board with the given columns, in order.
    pub fn new<S: AsRef<str>>(column_ids: &[S]) -> Self {
        Self {
            columns: column_ids
                .iter()
                .map(|id| Column {
                    id: id.as_ref().to_string(),
                    tasks: Vec::new(),
                })
                .collect(),
        }
    }

    /// Build a board from a task snapshot.
    ///
    /// Tasks are grouped by `column_id` and ordered by their stored
    /// `position` (stable, so equal positions keep snapshot order).
    /// Columns present in the snapshot but not in `column_ids` are
    /// appended after the configured ones, in first-seen order.
    pub fn from_tasks<S: AsRef<str>>(column_ids: &[S], tasks: &[BoardTask]) -> Self {
        let mut board = Self::new(column_ids);
        for task in tasks {
            let column = match board.column_index(&task.column_id) {
                Some(i) => &mut board.columns[i],
                None => {
                    board.columns.push(Column {
                        id: task.column_id.clone(),
                        tasks: Vec::new(),
                    });
                    board.columns.last_mut().unwrap()
                }
            };
            column.tasks.push(task.id);
        }

        // Order each column by the snapshot's stored positions.
        let positions: HashMap<DbId, i32> = tasks.iter().map(|t| (t.id, t.position)).collect();
        for column in &mut board.columns {
            column.tasks.sort_by_key(|id| positions[id]);
        }
        board
    }

    /// Ordered task ids of one column, or `None` for an unknown column.
    pub fn column(&self, column_id: &str) -> Option<&[DbId]> {
        self.columns
            .iter()
            .find(|c| c.id == column_id)
            .map(|c| c.tasks.as_slice())
    }

    /// Iterate columns in board order as `(column_id, ordered task ids)`.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[DbId])> {
        self.columns
            .iter()
            .map(|c| (c.id.as_str(), c.tasks.as_slice()))
    }

    /// Locate a task, returning `(column_id, index)`.
    pub fn position_of(&self, task_id: DbId) -> Option<(&str, usize)> {
        self.columns.iter().find_map(|c| {
            c.tasks
                .iter()
                .position(|&id| id == task_id)
                .map(|i| (c.id.as_str(), i))
        })
    }

    /// Position a newly created task should take at the end of a column:
    /// current max + 1, which for contiguous positions is the length.
    pub fn append_slot(&self, column_id: &str) -> Result<i32, CoreError> {
        self.column(column_id)
            .map(|tasks| tasks.len() as i32)
            .ok_or_else(|| CoreError::Validation(format!("Unknown column: {column_id}")))
    }

    /// Move a task to `target_column` at `target_index` and renumber.
    ///
    /// The index is clamped to `[0, len]` of the target column (after
    /// the task is removed from its source column). Returns the
    /// assignments that differ from the pre-move state; moving a task
    /// to its current slot returns an empty set.
    ///
    /// Fails with [`CoreError::NotFound`] if the task is on no column
    /// and [`CoreError::Validation`] for an unknown target column.
    pub fn move_task(
        &mut self,
        task_id: DbId,
        target_column: &str,
        target_index: usize,
    ) -> Result<Vec<PositionChange>, CoreError> {
        let (source_column, source_index) = self
            .position_of(task_id)
            .map(|(col, i)| (col.to_string(), i))
            .ok_or(CoreError::NotFound {
                entity: "Task",
                id: task_id,
            })?;

        if self.column_index(target_column).is_none() {
            return Err(CoreError::Validation(format!(
                "Unknown column: {target_column}"
            )));
        }

        let before = self.assignments(&[&source_column, target_column]);

        let source_idx = self.column_index(&source_column).unwrap();
        self.columns[source_idx].tasks.remove(source_index);

        let target_idx = self.column_index(target_column).unwrap();
        let target = &mut self.columns[target_idx];
        let insert_at = target_index.min(target.tasks.len());
        target.tasks.insert(insert_at, task_id);

        let after = self.assignments(&[&source_column, target_column]);

        let mut changes: Vec<PositionChange> = after
            .into_iter()
            .filter(|(id, assignment)| before.get(id) != Some(assignment))
            .map(|(id, (column_id, position))| PositionChange {
                task_id: id,
                column_id,
                position,
            })
            .collect();
        changes.sort_by_key(|c| (c.column_id.clone(), c.position));
        Ok(changes)
    }

    fn column_index(&self, column_id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == column_id)
    }

    /// Current `(column, position)` assignment of every task in the
    /// named columns. Positions are the list indices, i.e. already
    /// contiguous from 0.
    fn assignments(&self, column_ids: &[&str]) -> HashMap<DbId, (String, i32)> {
        let mut map = HashMap::new();
        for column in &self.columns {
            if !column_ids.contains(&column.id.as_str()) {
                continue;
            }
            for (i, &id) in column.tasks.iter().enumerate() {
                map.insert(id, (column.id.clone(), i as i32));
            }
        }
        map
    }
}
