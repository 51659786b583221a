//! Core domain logic for the Kanban board.
//! This crate is the single source of truth for board invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::board::{Board, BoardStats, BoardValidationError};
pub use model::column::{Column, ColumnId, ColumnIdParseError};
pub use model::task::{Task, TaskId};
pub use repo::board_repo::{BoardRepository, BOARD_STORAGE_KEY};
pub use repo::kv_store::{KeyValueStore, MemoryKvStore, SqliteKvStore};
pub use repo::{RepoError, RepoResult};
pub use service::board_service::{
    BoardOrigin, BoardService, BoardServiceError, BoardServiceResult, PendingGesture,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
