//! Board snapshot repository.
//!
//! # Responsibility
//! - Store the whole board as JSON under one fixed slot key.
//! - Decode and validate a stored board on load.
//!
//! # Invariants
//! - Exactly one slot (`BOARD_STORAGE_KEY`) is ever written.
//! - A loaded board always satisfies `Board::validate()`.

use crate::model::board::Board;
use crate::repo::kv_store::KeyValueStore;
use crate::repo::{RepoError, RepoResult};

/// Slot key the board is stored under.
pub const BOARD_STORAGE_KEY: &str = "kanban-columns";

/// Reads and writes the board snapshot in a key-value store.
pub struct BoardRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> BoardRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads the stored board.
    ///
    /// Returns `Ok(None)` when nothing is stored yet and
    /// `RepoError::InvalidData` when the stored value is not a valid board.
    pub fn load(&self) -> RepoResult<Option<Board>> {
        match self.store.get(BOARD_STORAGE_KEY)? {
            Some(raw) => decode_board(&raw).map(Some),
            None => Ok(None),
        }
    }

    /// Overwrites the stored board.
    pub fn save(&self, board: &Board) -> RepoResult<()> {
        let encoded = encode_board(board)?;
        self.store.set(BOARD_STORAGE_KEY, &encoded)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Encodes a board into its stored JSON form.
pub fn encode_board(board: &Board) -> RepoResult<String> {
    serde_json::to_string(board).map_err(RepoError::Encode)
}

/// Decodes and validates a stored JSON board.
pub fn decode_board(raw: &str) -> RepoResult<Board> {
    serde_json::from_str(raw).map_err(|err| RepoError::InvalidData(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{decode_board, encode_board, BoardRepository, BOARD_STORAGE_KEY};
    use crate::model::board::Board;
    use crate::model::column::ColumnId;
    use crate::repo::kv_store::{KeyValueStore, MemoryKvStore};
    use crate::repo::RepoError;

    #[test]
    fn stored_json_keeps_original_field_names() {
        let json: serde_json::Value =
            serde_json::from_str(&encode_board(&Board::seed()).unwrap()).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["id"], "todo");
        assert_eq!(json[0]["title"], "To Do");
        assert_eq!(json[0]["color"], "neon-pink");
        assert_eq!(json[1]["id"], "in-progress");
        assert_eq!(json[0]["tasks"][0]["id"], "task-1");
        assert_eq!(json[0]["tasks"][0]["content"], "Research new technologies");
    }

    #[test]
    fn decode_accepts_any_field_order() {
        let raw = r#"[
            {"tasks": [], "color": "c1", "title": "To Do", "id": "todo"},
            {"id": "in-progress", "tasks": [{"content": "x", "id": "t-1"}], "title": "In Progress", "color": "c2"},
            {"color": "c3", "id": "done", "title": "Done", "tasks": []}
        ]"#;
        let board = decode_board(raw).unwrap();
        assert_eq!(board.find_column("t-1").unwrap().id, ColumnId::InProgress);
    }

    #[test]
    fn decode_rejects_malformed_and_invalid_boards() {
        assert!(matches!(
            decode_board("{not json"),
            Err(RepoError::InvalidData(_))
        ));
        assert!(matches!(decode_board("[]"), Err(RepoError::InvalidData(_))));
    }

    #[test]
    fn save_then_load_returns_equal_board() {
        let repo = BoardRepository::new(MemoryKvStore::new());
        assert!(repo.load().unwrap().is_none());

        let mut board = Board::seed();
        board.add_task(ColumnId::Done, "Ship it").unwrap();
        repo.save(&board).unwrap();

        assert_eq!(repo.load().unwrap(), Some(board));
        assert!(repo.store().get(BOARD_STORAGE_KEY).unwrap().is_some());
    }
}
