//! Board API for the presentation layer.
//!
//! # Responsibility
//! - Expose the board model as sync, use-case-level calls via FRB.
//! - Translate drag callbacks (start/over/end/cancel) into gesture calls.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - One board session per process, opened lazily on first use.
//! - Column ids cross the boundary as their wire names.

use kanban_core::db::open_db;
use kanban_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, Board,
    BoardService, ColumnId, KeyValueStore, RepoResult, SqliteKvStore,
};
use log::warn;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const BOARD_DB_FILE_NAME: &str = "kanban_board.sqlite3";
const BOARD_DB_PATH_ENV: &str = "KANBAN_DB_PATH";

static BOARD_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static BOARD_SESSION: Mutex<Option<BoardService<SessionStore>>> = Mutex::new(None);

/// Slot store owning its connection so the session can live in a static.
struct SessionStore {
    conn: Connection,
}

impl KeyValueStore for SessionStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        SqliteKvStore::new(&self.conn).get(key)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        SqliteKvStore::new(&self.conn).set(key, value)
    }
}

/// Expose core crate version.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Sets the board database file path.
///
/// Must be called before the first board call; afterwards only the same
/// path is accepted. Returns empty string on success, else an error message.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_board_db_path(path: String) -> String {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return "board db path cannot be empty".to_string();
    }
    let requested = PathBuf::from(trimmed);
    let active = BOARD_DB_PATH.get_or_init(|| requested.clone());
    if *active == requested {
        String::new()
    } else {
        format!(
            "board db path already set to `{}`; refusing to switch to `{}`",
            active.display(),
            requested.display()
        )
    }
}

/// One task card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskView {
    pub id: String,
    pub content: String,
}

/// One column with its cards in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    /// `todo|in-progress|done`.
    pub id: String,
    pub title: String,
    pub color: String,
    pub tasks: Vec<TaskView>,
}

/// Whole-board snapshot for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardView {
    pub columns: Vec<ColumnView>,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    /// Task currently being dragged, for the drag overlay.
    pub dragging_task_id: Option<String>,
}

/// Result envelope for board actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardActionResponse {
    /// Whether the call completed without a storage failure or bad input.
    pub ok: bool,
    /// Whether the board changed.
    pub changed: bool,
    /// Created task ID, for `board_add_task`.
    pub task_id: Option<String>,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
    /// Board after the call.
    pub board: BoardView,
}

/// Returns the current board.
#[flutter_rust_bridge::frb(sync)]
pub fn board_snapshot() -> BoardView {
    with_session(|service| board_view(service)).unwrap_or_default()
}

/// Adds a task to the end of `column_id`. Blank content is ignored.
#[flutter_rust_bridge::frb(sync)]
pub fn board_add_task(column_id: String, content: String) -> BoardActionResponse {
    let column_id = match column_id.parse::<ColumnId>() {
        Ok(id) => id,
        Err(err) => return failure(format!("board_add_task failed: {err}")),
    };
    respond(|service| match service.add_task(column_id, &content) {
        Ok(Some(task_id)) => Ok((true, Some(task_id), "Task added.".to_string())),
        Ok(None) => Ok((false, None, "Empty task ignored.".to_string())),
        Err(err) => Err(format!("board_add_task failed: {err}")),
    })
}

/// Deletes `task_id` from `column_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_delete_task(column_id: String, task_id: String) -> BoardActionResponse {
    let column_id = match column_id.parse::<ColumnId>() {
        Ok(id) => id,
        Err(err) => return failure(format!("board_delete_task failed: {err}")),
    };
    respond(|service| match service.delete_task(column_id, &task_id) {
        Ok(true) => Ok((true, None, "Task deleted.".to_string())),
        Ok(false) => Ok((false, None, "Task not found.".to_string())),
        Err(err) => Err(format!("board_delete_task failed: {err}")),
    })
}

/// Drag start: snapshots the board for a possible cancel.
#[flutter_rust_bridge::frb(sync)]
pub fn board_begin_drag(task_id: String) -> BoardActionResponse {
    respond(|service| {
        if service.begin_gesture(&task_id) {
            Ok((false, None, "Drag started.".to_string()))
        } else {
            Err(format!("board_begin_drag failed: task not found: {task_id}"))
        }
    })
}

/// Drag over: previews moving `active_id` into the column of `over_id`.
///
/// `over_id` may be a task id or a column id. Not persisted.
#[flutter_rust_bridge::frb(sync)]
pub fn board_drag_over(active_id: String, over_id: String) -> BoardView {
    with_session(|service| {
        service.move_task(&active_id, &over_id);
        board_view(service)
    })
    .unwrap_or_default()
}

/// Drag end: commits the drop onto `over_id`, or cancels when `None`.
#[flutter_rust_bridge::frb(sync)]
pub fn board_drag_end(over_id: Option<String>) -> BoardActionResponse {
    respond(|service| {
        if service.pending_gesture().is_none() {
            return Ok((false, None, "No drag in progress.".to_string()));
        }
        let dropped_on_target = over_id.is_some();
        match service.finish_gesture(over_id.as_deref()) {
            Ok(reordered) if dropped_on_target => {
                Ok((reordered, None, "Drop committed.".to_string()))
            }
            Ok(_) => Ok((false, None, "Drag cancelled.".to_string())),
            Err(err) => Err(format!("board_drag_end failed: {err}")),
        }
    })
}

/// Drag cancel: restores the board as it was before the drag began.
#[flutter_rust_bridge::frb(sync)]
pub fn board_drag_cancel() -> BoardView {
    with_session(|service| {
        service.cancel_gesture();
        board_view(service)
    })
    .unwrap_or_default()
}

/// Replaces the board with the default board.
#[flutter_rust_bridge::frb(sync)]
pub fn board_reset() -> BoardActionResponse {
    respond(|service| match service.reset_board() {
        Ok(()) => Ok((true, None, "Board reset.".to_string())),
        Err(err) => Err(format!("board_reset failed: {err}")),
    })
}

fn resolve_board_db_path() -> PathBuf {
    BOARD_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(BOARD_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(BOARD_DB_FILE_NAME)
        })
        .clone()
}

fn with_session<T>(f: impl FnOnce(&mut BoardService<SessionStore>) -> T) -> Result<T, String> {
    let mut guard = BOARD_SESSION
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    if guard.is_none() {
        let conn = open_db(resolve_board_db_path())
            .map_err(|err| format!("board DB open failed: {err}"))?;
        *guard = Some(BoardService::open(SessionStore { conn }));
    }
    match guard.as_mut() {
        Some(service) => Ok(f(service)),
        None => Err("board session unavailable".to_string()),
    }
}

type ActionOutcome = Result<(bool, Option<String>, String), String>;

fn respond(
    f: impl FnOnce(&mut BoardService<SessionStore>) -> ActionOutcome,
) -> BoardActionResponse {
    let result = with_session(|service| {
        let outcome = f(service);
        (outcome, board_view(service))
    });
    match result {
        Ok((Ok((changed, task_id, message)), board)) => BoardActionResponse {
            ok: true,
            changed,
            task_id,
            message,
            board,
        },
        Ok((Err(message), board)) => {
            warn!("event=ffi_action module=ffi status=error");
            BoardActionResponse {
                ok: false,
                changed: false,
                task_id: None,
                message,
                board,
            }
        }
        Err(message) => failure(message),
    }
}

fn failure(message: String) -> BoardActionResponse {
    BoardActionResponse {
        ok: false,
        changed: false,
        task_id: None,
        message,
        board: board_snapshot(),
    }
}

fn board_view(service: &BoardService<SessionStore>) -> BoardView {
    let mut view = to_board_view(service.board());
    view.dragging_task_id = service.active_task().map(|task| task.id.clone());
    view
}

fn to_board_view(board: &Board) -> BoardView {
    let stats = board.stats();
    BoardView {
        columns: board
            .columns()
            .iter()
            .map(|column| ColumnView {
                id: column.id.as_str().to_string(),
                title: column.title.clone(),
                color: column.color_tag.clone(),
                tasks: column
                    .tasks
                    .iter()
                    .map(|task| TaskView {
                        id: task.id.clone(),
                        content: task.content.clone(),
                    })
                    .collect(),
            })
            .collect(),
        total_tasks: u32::try_from(stats.total_tasks).unwrap_or(u32::MAX),
        completed_tasks: u32::try_from(stats.completed_tasks).unwrap_or(u32::MAX),
        dragging_task_id: None,
    }
}
