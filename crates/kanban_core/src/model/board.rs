//! Board aggregate and its pure transitions.
//!
//! # Responsibility
//! - Hold the ordered columns and their task sequences.
//! - Apply add/delete/move/reorder as in-place transitions that report
//!   whether anything changed.
//! - Provide the fixed default seed.
//!
//! # Invariants
//! - Exactly one column per `ColumnId`, in `ColumnId::ALL` order.
//! - Every task id is non-empty and unique across the whole board.
//! - Transitions never sort; order is what the last transition produced.
//! - Lookups that miss leave the board untouched.
//!
//! Column-of-task lookup is a linear scan. Boards hold a handful of tasks.

use crate::model::column::{Column, ColumnId};
use crate::model::task::{Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural problems found in a board value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardValidationError {
    /// Column count differs from the fixed set.
    ColumnCount { found: usize },
    /// Column at `index` is not the expected fixed column.
    ColumnOrder { index: usize, expected: ColumnId },
    /// A task id is blank.
    EmptyTaskId { column: ColumnId },
    /// A task id occurs more than once on the board.
    DuplicateTaskId(TaskId),
}

impl Display for BoardValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColumnCount { found } => write!(
                f,
                "board must have {} columns, found {found}",
                ColumnId::ALL.len()
            ),
            Self::ColumnOrder { index, expected } => {
                write!(f, "column at index {index} must be `{expected}`")
            }
            Self::EmptyTaskId { column } => write!(f, "empty task id in column `{column}`"),
            Self::DuplicateTaskId(id) => write!(f, "duplicate task id `{id}`"),
        }
    }
}

impl Error for BoardValidationError {}

/// Header counters shown above the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardStats {
    pub total_tasks: usize,
    /// Tasks sitting in the `done` column.
    pub completed_tasks: usize,
}

/// The full board: ordered columns with ordered tasks.
///
/// Serialized as a bare array of column objects. Deserialization validates
/// the structure, so a decoded `Board` always upholds the module invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Column>", into = "Vec<Column>")]
pub struct Board {
    columns: Vec<Column>,
}

impl Board {
    /// The fixed default board.
    pub fn seed() -> Self {
        Self {
            columns: vec![
                Column::new(ColumnId::Todo, "To Do", "neon-pink").with_tasks(vec![
                    Task::with_id("task-1", "Research new technologies"),
                    Task::with_id("task-2", "Design system architecture"),
                    Task::with_id("task-3", "Write documentation"),
                ]),
                Column::new(ColumnId::InProgress, "In Progress", "neon-purple").with_tasks(vec![
                    Task::with_id("task-4", "Implement authentication"),
                    Task::with_id("task-5", "Build REST API"),
                ]),
                Column::new(ColumnId::Done, "Done", "neon-cyan").with_tasks(vec![
                    Task::with_id("task-6", "Project setup"),
                    Task::with_id("task-7", "Database schema"),
                ]),
            ],
        }
    }

    /// Builds a board from raw columns, rejecting structurally invalid input.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, BoardValidationError> {
        let board = Self { columns };
        board.validate()?;
        Ok(board)
    }

    /// Checks the fixed-column and unique-id invariants.
    pub fn validate(&self) -> Result<(), BoardValidationError> {
        if self.columns.len() != ColumnId::ALL.len() {
            return Err(BoardValidationError::ColumnCount {
                found: self.columns.len(),
            });
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for (index, (column, expected)) in self.columns.iter().zip(ColumnId::ALL).enumerate() {
            if column.id != expected {
                return Err(BoardValidationError::ColumnOrder { index, expected });
            }
            for task in &column.tasks {
                if task.id.trim().is_empty() {
                    return Err(BoardValidationError::EmptyTaskId { column: column.id });
                }
                if !seen.insert(task.id.as_str()) {
                    return Err(BoardValidationError::DuplicateTaskId(task.id.clone()));
                }
            }
        }

        Ok(())
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.columns.iter().find(|column| column.id == id)
    }

    /// Returns the column currently holding `task_id`.
    pub fn find_column(&self, task_id: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.contains(task_id))
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.columns
            .iter()
            .flat_map(|column| column.tasks.iter())
            .find(|task| task.id == task_id)
    }

    pub fn task_count(&self) -> usize {
        self.columns.iter().map(Column::len).sum()
    }

    pub fn stats(&self) -> BoardStats {
        BoardStats {
            total_tasks: self.task_count(),
            completed_tasks: self.column(ColumnId::Done).map_or(0, Column::len),
        }
    }

    /// Appends a new task with trimmed `content` to the end of `column_id`.
    ///
    /// Returns the new task id, or `None` when content is blank.
    pub fn add_task(&mut self, column_id: ColumnId, content: &str) -> Option<TaskId> {
        let content = content.trim();
        if content.is_empty() {
            return None;
        }
        let column = self.column_mut(column_id)?;
        let task = Task::new(content);
        let id = task.id.clone();
        column.tasks.push(task);
        Some(id)
    }

    /// Removes `task_id` from `column_id`. Returns whether a task was removed.
    pub fn delete_task(&mut self, column_id: ColumnId, task_id: &str) -> bool {
        let Some(column) = self.column_mut(column_id) else {
            return false;
        };
        match column.position_of(task_id) {
            Some(index) => {
                column.tasks.remove(index);
                true
            }
            None => false,
        }
    }

    /// Moves `active_id` into the column identified by `over_id`.
    ///
    /// `over_id` may be a task id (insert before that task) or a column id
    /// (append). Moves inside one column are left to [`Board::reorder_task`].
    /// Returns whether the board changed.
    pub fn move_task(&mut self, active_id: &str, over_id: &str) -> bool {
        let Some(source) = self.column_index_of_task(active_id) else {
            return false;
        };
        let target = match self.column_index_of_task(over_id) {
            Some(index) => index,
            None => match self
                .columns
                .iter()
                .position(|column| column.id.as_str() == over_id)
            {
                Some(index) => index,
                None => return false,
            },
        };
        if source == target {
            return false;
        }

        let Some(from) = self.columns[source].position_of(active_id) else {
            return false;
        };
        let task = self.columns[source].tasks.remove(from);
        let target_column = &mut self.columns[target];
        let insert_at = target_column
            .position_of(over_id)
            .unwrap_or(target_column.tasks.len());
        target_column.tasks.insert(insert_at, task);
        true
    }

    /// Moves `active_id` to the index of `over_id` inside their shared column.
    ///
    /// Returns `false` when either id is missing, the ids live in different
    /// columns, or both ids are the same task.
    pub fn reorder_task(&mut self, active_id: &str, over_id: &str) -> bool {
        let Some(index) = self.column_index_of_task(active_id) else {
            return false;
        };
        let column = &mut self.columns[index];
        let (Some(from), Some(to)) = (column.position_of(active_id), column.position_of(over_id))
        else {
            return false;
        };
        if from == to {
            return false;
        }
        let task = column.tasks.remove(from);
        column.tasks.insert(to, task);
        true
    }

    fn column_mut(&mut self, id: ColumnId) -> Option<&mut Column> {
        self.columns.iter_mut().find(|column| column.id == id)
    }

    fn column_index_of_task(&self, task_id: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.contains(task_id))
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::seed()
    }
}

impl TryFrom<Vec<Column>> for Board {
    type Error = BoardValidationError;

    fn try_from(columns: Vec<Column>) -> Result<Self, Self::Error> {
        Self::from_columns(columns)
    }
}

impl From<Board> for Vec<Column> {
    fn from(board: Board) -> Self {
        board.columns
    }
}

#[cfg(test)]
mod tests {
    use super::{Board, BoardValidationError};
    use crate::model::column::{Column, ColumnId};
    use crate::model::task::Task;

    fn ids(board: &Board, column: ColumnId) -> Vec<String> {
        board
            .column(column)
            .unwrap()
            .tasks
            .iter()
            .map(|task| task.id.clone())
            .collect()
    }

    #[test]
    fn seed_is_valid_and_counts_match() {
        let board = Board::seed();
        board.validate().unwrap();
        let stats = board.stats();
        assert_eq!(stats.total_tasks, 7);
        assert_eq!(stats.completed_tasks, 2);
    }

    #[test]
    fn add_task_trims_and_rejects_blank_content() {
        let mut board = Board::seed();
        assert_eq!(board.add_task(ColumnId::Todo, "   \n\t"), None);
        assert_eq!(board, Board::seed());

        let id = board.add_task(ColumnId::Todo, "  Write tests  ").unwrap();
        let column = board.column(ColumnId::Todo).unwrap();
        assert_eq!(column.len(), 4);
        assert_eq!(column.tasks[3].id, id);
        assert_eq!(column.tasks[3].content, "Write tests");
    }

    #[test]
    fn delete_task_requires_matching_column() {
        let mut board = Board::seed();
        assert!(!board.delete_task(ColumnId::Done, "task-1"));
        assert!(board.delete_task(ColumnId::Todo, "task-1"));
        assert_eq!(ids(&board, ColumnId::Todo), vec!["task-2", "task-3"]);
    }

    #[test]
    fn move_task_inserts_before_over_task() {
        let mut board = Board::seed();
        assert!(board.move_task("task-1", "task-7"));
        assert_eq!(ids(&board, ColumnId::Todo), vec!["task-2", "task-3"]);
        assert_eq!(ids(&board, ColumnId::Done), vec!["task-6", "task-1", "task-7"]);
    }

    #[test]
    fn move_task_onto_column_id_appends() {
        let mut board = Board::seed();
        assert!(board.move_task("task-4", "done"));
        assert_eq!(ids(&board, ColumnId::Done), vec!["task-6", "task-7", "task-4"]);
    }

    #[test]
    fn move_task_into_empty_column() {
        let mut board = Board::seed();
        assert!(board.delete_task(ColumnId::Done, "task-6"));
        assert!(board.delete_task(ColumnId::Done, "task-7"));
        assert!(board.move_task("task-2", "done"));
        assert_eq!(ids(&board, ColumnId::Done), vec!["task-2"]);
    }

    #[test]
    fn move_task_within_same_column_is_noop() {
        let mut board = Board::seed();
        assert!(!board.move_task("task-1", "task-3"));
        assert!(!board.move_task("task-1", "todo"));
        assert_eq!(board, Board::seed());
    }

    #[test]
    fn move_and_reorder_ignore_unknown_ids() {
        let mut board = Board::seed();
        assert!(!board.move_task("missing", "done"));
        assert!(!board.move_task("task-1", "missing"));
        assert!(!board.reorder_task("missing", "task-1"));
        assert!(!board.reorder_task("task-1", "missing"));
        assert_eq!(board, Board::seed());
    }

    #[test]
    fn reorder_task_moves_down_and_up() {
        let mut board = Board::seed();
        assert!(board.reorder_task("task-1", "task-3"));
        assert_eq!(ids(&board, ColumnId::Todo), vec!["task-2", "task-3", "task-1"]);
        assert!(board.reorder_task("task-1", "task-2"));
        assert_eq!(ids(&board, ColumnId::Todo), vec!["task-1", "task-2", "task-3"]);
    }

    #[test]
    fn reorder_task_across_columns_is_noop() {
        let mut board = Board::seed();
        assert!(!board.reorder_task("task-1", "task-6"));
        assert_eq!(board, Board::seed());
    }

    #[test]
    fn validate_rejects_duplicates_and_wrong_columns() {
        let mut columns: Vec<Column> = Board::seed().into();
        columns[2].tasks.push(Task::with_id("task-1", "again"));
        assert_eq!(
            Board::from_columns(columns).unwrap_err(),
            BoardValidationError::DuplicateTaskId("task-1".to_string())
        );

        let mut columns: Vec<Column> = Board::seed().into();
        columns.swap(0, 1);
        assert_eq!(
            Board::from_columns(columns).unwrap_err(),
            BoardValidationError::ColumnOrder {
                index: 0,
                expected: ColumnId::Todo
            }
        );

        let mut columns: Vec<Column> = Board::seed().into();
        columns.pop();
        assert_eq!(
            Board::from_columns(columns).unwrap_err(),
            BoardValidationError::ColumnCount { found: 2 }
        );
    }
}
