//! Task domain model.
//!
//! # Responsibility
//! - Define the unit of work rendered as one card on the board.
//! - Generate fresh, board-unique identifiers for newly added tasks.
//!
//! # Invariants
//! - `id` is never empty and never reused for another task.
//! - A task is immutable after creation; it is only ever moved or removed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for a task card.
///
/// Kept as a plain string because persisted seed data uses readable ids
/// (`task-1`, `task-2`, ...) alongside generated ones.
pub type TaskId = String;

const GENERATED_ID_PREFIX: &str = "task-";

/// One card on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub content: String,
}

impl Task {
    /// Creates a task with a freshly generated id.
    pub fn new(content: impl Into<String>) -> Self {
        Self::with_id(generate_task_id(), content)
    }

    /// Creates a task with a caller-provided id.
    ///
    /// Used for the fixed seed board where ids are well known.
    pub fn with_id(id: impl Into<TaskId>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

/// Returns a new `task-<uuid>` identifier.
pub fn generate_task_id() -> TaskId {
    format!("{GENERATED_ID_PREFIX}{}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::{generate_task_id, Task};

    #[test]
    fn generated_ids_are_prefixed_and_distinct() {
        let first = generate_task_id();
        let second = generate_task_id();
        assert!(first.starts_with("task-"));
        assert_ne!(first, second);
    }

    #[test]
    fn new_task_keeps_content_verbatim() {
        let task = Task::new("Write tests");
        assert_eq!(task.content, "Write tests");
        assert!(!task.id.is_empty());
    }
}
