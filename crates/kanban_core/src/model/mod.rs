//! Kanban board domain model.
//!
//! # Responsibility
//! - Define the board, column and task shapes shared by storage and service.
//! - Keep board transitions pure and storage-agnostic.
//!
//! # Invariants
//! - Columns are fixed; tasks move between them but columns never appear
//!   or disappear.
//! - Task ids are unique across the whole board.

pub mod board;
pub mod column;
pub mod task;
