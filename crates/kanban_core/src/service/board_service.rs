//! Board use-case service.
//!
//! # Responsibility
//! - Hold the live board, restored from storage or seeded.
//! - Apply add/delete/reorder/reset as committed mutations.
//! - Drive the drag gesture: snapshot, preview moves, commit or discard.
//!
//! # Invariants
//! - Every committed mutation goes through `commit`, which persists the new
//!   board before installing it. A failed write leaves the board unchanged.
//! - Preview moves (`move_task`) never touch storage.
//! - `cancel_gesture` restores the exact pre-gesture board.
//! - Lookup misses are no-ops, never errors.

use crate::model::board::{Board, BoardStats};
use crate::model::column::{Column, ColumnId};
use crate::model::task::{Task, TaskId};
use crate::repo::board_repo::BoardRepository;
use crate::repo::kv_store::KeyValueStore;
use crate::repo::RepoError;
use log::{debug, error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Errors from committing board mutations.
#[derive(Debug)]
pub enum BoardServiceError {
    /// Persisting the new board failed.
    Repo(RepoError),
}

impl Display for BoardServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "board commit failed: {err}"),
        }
    }
}

impl Error for BoardServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for BoardServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Where the board was loaded from when the service opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardOrigin {
    /// A valid stored board was found.
    Restored,
    /// Nothing was stored; the seed board is in use.
    Seeded,
    /// The stored value was unreadable or invalid; the seed board is in use.
    Recovered,
}

/// An in-flight drag: the board before the drag began plus the dragged task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingGesture {
    snapshot: Board,
    active: Task,
}

impl PendingGesture {
    /// Board value captured when the drag began.
    pub fn snapshot(&self) -> &Board {
        &self.snapshot
    }

    /// Task being dragged.
    pub fn active(&self) -> &Task {
        &self.active
    }
}

/// Live board with persistence on commit.
pub struct BoardService<S: KeyValueStore> {
    repo: BoardRepository<S>,
    board: Board,
    origin: BoardOrigin,
    gesture: Option<PendingGesture>,
}

impl<S: KeyValueStore> BoardService<S> {
    /// Opens the board stored in `store`, falling back to the seed board
    /// when nothing usable is stored.
    pub fn open(store: S) -> Self {
        let repo = BoardRepository::new(store);
        let (board, origin) = match repo.load() {
            Ok(Some(board)) => (board, BoardOrigin::Restored),
            Ok(None) => (Board::seed(), BoardOrigin::Seeded),
            Err(err) => {
                let error_code = match err {
                    RepoError::InvalidData(_) => "board_invalid_data",
                    _ => "board_read_failed",
                };
                warn!(
                    "event=board_restore module=service status=fallback error_code={error_code}"
                );
                (Board::seed(), BoardOrigin::Recovered)
            }
        };
        info!(
            "event=board_restore module=service status=ok origin={origin:?} tasks={}",
            board.task_count()
        );

        Self {
            repo,
            board,
            origin,
            gesture: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn columns(&self) -> &[Column] {
        self.board.columns()
    }

    pub fn column(&self, id: ColumnId) -> Option<&Column> {
        self.board.column(id)
    }

    /// Column currently holding `task_id`, including preview moves.
    pub fn find_column(&self, task_id: &str) -> Option<&Column> {
        self.board.find_column(task_id)
    }

    pub fn find_task(&self, task_id: &str) -> Option<&Task> {
        self.board.find_task(task_id)
    }

    pub fn stats(&self) -> BoardStats {
        self.board.stats()
    }

    pub fn origin(&self) -> BoardOrigin {
        self.origin
    }

    pub fn store(&self) -> &S {
        self.repo.store()
    }

    /// Adds a task to the end of `column_id`.
    ///
    /// Blank content is a silent no-op returning `Ok(None)`. A pending
    /// gesture is abandoned: the task is added to the pre-gesture board.
    pub fn add_task(
        &mut self,
        column_id: ColumnId,
        content: &str,
    ) -> BoardServiceResult<Option<TaskId>> {
        let mut next = self.committed_board().clone();
        let Some(task_id) = next.add_task(column_id, content) else {
            return Ok(None);
        };
        self.commit("add_task", next)?;
        self.gesture = None;
        Ok(Some(task_id))
    }

    /// Deletes `task_id` from `column_id`. Returns whether a task was removed.
    ///
    /// A miss leaves the board and storage untouched. A pending gesture is
    /// abandoned: the task is removed from the pre-gesture board.
    pub fn delete_task(&mut self, column_id: ColumnId, task_id: &str) -> BoardServiceResult<bool> {
        let mut next = self.committed_board().clone();
        if !next.delete_task(column_id, task_id) {
            return Ok(false);
        }
        self.commit("delete_task", next)?;
        self.gesture = None;
        Ok(true)
    }

    /// Starts a drag of `active_id`, capturing the current board.
    ///
    /// A gesture left pending by an earlier drag is discarded first.
    /// Returns `false` when `active_id` is not on the board.
    pub fn begin_gesture(&mut self, active_id: &str) -> bool {
        if self.gesture.is_some() {
            warn!("event=gesture_begin module=service status=discard_stale");
            self.cancel_gesture();
        }
        let Some(active) = self.board.find_task(active_id).cloned() else {
            return false;
        };
        self.gesture = Some(PendingGesture {
            snapshot: self.board.clone(),
            active,
        });
        debug!("event=gesture_begin module=service status=ok");
        true
    }

    /// Preview move of `active_id` into the column of `over_id` (a task or
    /// column id). Never persisted.
    ///
    /// Starts a gesture implicitly when none is pending, so the move can
    /// still be discarded. Returns whether the board changed.
    pub fn move_task(&mut self, active_id: &str, over_id: &str) -> bool {
        if self.gesture.is_none() && !self.begin_gesture(active_id) {
            return false;
        }
        let moved = self.board.move_task(active_id, over_id);
        if moved {
            debug!("event=gesture_move module=service status=ok");
        }
        moved
    }

    /// Completes a gesture by moving `active_id` to the index of `over_id`
    /// within their shared column, then commits the board.
    ///
    /// When the ids are missing or sit in different columns the board is
    /// committed as it stands, finalizing any preview moves. Returns whether
    /// the intra-column order changed.
    pub fn reorder_task(&mut self, active_id: &str, over_id: &str) -> BoardServiceResult<bool> {
        let mut next = self.board.clone();
        let reordered = next.reorder_task(active_id, over_id);
        self.commit("reorder_task", next)?;
        self.gesture = None;
        Ok(reordered)
    }

    /// Drop handler for the pending gesture.
    ///
    /// `Some(over)` commits through [`Self::reorder_task`]. `None` means the
    /// task was dropped outside any target and the gesture is cancelled.
    /// Without a pending gesture this does nothing.
    pub fn finish_gesture(&mut self, over_id: Option<&str>) -> BoardServiceResult<bool> {
        let Some(active_id) = self.gesture.as_ref().map(|g| g.active.id.clone()) else {
            return Ok(false);
        };
        match over_id {
            Some(over_id) => self.reorder_task(&active_id, over_id),
            None => {
                self.cancel_gesture();
                Ok(false)
            }
        }
    }

    /// Discards the pending gesture, restoring the pre-gesture board.
    ///
    /// Returns `false` when no gesture was pending.
    pub fn cancel_gesture(&mut self) -> bool {
        match self.gesture.take() {
            Some(gesture) => {
                self.board = gesture.snapshot;
                debug!("event=gesture_cancel module=service status=ok");
                true
            }
            None => false,
        }
    }

    pub fn pending_gesture(&self) -> Option<&PendingGesture> {
        self.gesture.as_ref()
    }

    /// Task being dragged, for the drag overlay.
    pub fn active_task(&self) -> Option<&Task> {
        self.gesture.as_ref().map(PendingGesture::active)
    }

    /// Replaces the board with the seed board and drops any pending gesture.
    pub fn reset_board(&mut self) -> BoardServiceResult<()> {
        self.commit("reset_board", Board::seed())?;
        self.gesture = None;
        Ok(())
    }

    // Last committed board; preview moves of a pending gesture excluded.
    fn committed_board(&self) -> &Board {
        self.gesture
            .as_ref()
            .map_or(&self.board, PendingGesture::snapshot)
    }

    fn commit(&mut self, op: &'static str, next: Board) -> BoardServiceResult<()> {
        let started_at = Instant::now();
        if let Err(err) = self.repo.save(&next) {
            error!(
                "event=board_commit module=service status=error op={op} duration_ms={} error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(err.into());
        }
        self.board = next;
        info!(
            "event=board_commit module=service status=ok op={op} tasks={} duration_ms={}",
            self.board.task_count(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}
