//! Persistence layer for the board.
//!
//! # Responsibility
//! - Define the key-value slot contract the board is stored in.
//! - Encode/decode the board to and from its stored JSON form.
//!
//! # Invariants
//! - Slot writes fully overwrite the previous value.
//! - Decoded boards are structurally validated before they are returned.

pub mod board_repo;
pub mod kv_store;

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for slot access and board encoding.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Stored value exists but is not a valid board.
    InvalidData(String),
    /// Board could not be encoded for storage.
    Encode(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted board data: {message}"),
            Self::Encode(err) => write!(f, "failed to encode board: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
