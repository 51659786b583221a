//! Column domain model.
//!
//! # Responsibility
//! - Define the fixed set of board columns and their wire names.
//! - Provide ordered task-sequence helpers used by board transitions.
//!
//! # Invariants
//! - The column set is closed: `todo`, `in-progress`, `done`.
//! - Task order inside a column is exactly insertion/move order.

use crate::model::task::Task;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Fixed identity of a board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnId {
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "in-progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl ColumnId {
    /// All columns in board display order.
    pub const ALL: [ColumnId; 3] = [ColumnId::Todo, ColumnId::InProgress, ColumnId::Done];

    /// Wire/storage name of this column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl Display for ColumnId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name one of the fixed columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIdParseError(pub String);

impl Display for ColumnIdParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown column id `{}`; expected todo|in-progress|done",
            self.0
        )
    }
}

impl Error for ColumnIdParseError {}

impl FromStr for ColumnId {
    type Err = ColumnIdParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "todo" => Ok(Self::Todo),
            "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(ColumnIdParseError(other.to_string())),
        }
    }
}

/// One board column with its ordered tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub id: ColumnId,
    pub title: String,
    /// Serialized as `color` to match the stored board format.
    #[serde(rename = "color")]
    pub color_tag: String,
    pub tasks: Vec<Task>,
}

impl Column {
    pub fn new(id: ColumnId, title: impl Into<String>, color_tag: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            color_tag: color_tag.into(),
            tasks: Vec::new(),
        }
    }

    /// Builder-style helper used by the seed board.
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Index of `task_id` within this column, if present.
    pub fn position_of(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == task_id)
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.position_of(task_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::ColumnId;

    #[test]
    fn column_id_parses_wire_names() {
        for id in ColumnId::ALL {
            assert_eq!(id.as_str().parse::<ColumnId>().unwrap(), id);
        }
    }

    #[test]
    fn column_id_rejects_unknown_names() {
        let err = "backlog".parse::<ColumnId>().unwrap_err();
        assert!(err.to_string().contains("backlog"));
        assert!("In-Progress".parse::<ColumnId>().is_err());
    }
}
